//! Lint: key hints like `[C]` or `[1]` must be clickable.
//!
//! A hint rendered through a plain `push(` shows the key but registers no
//! click target, so it cannot be tapped on a touch screen. Hints belong in
//! `push_clickable(` rows or in a `TabBar` `.tab(`.
//!
//! Scans every `render.rs` under `src/games/`.

use std::fs;
use std::path::Path;

/// True if `s` contains a bracketed single-key hint such as `[S]` or `[1]`.
fn contains_key_hint(s: &str) -> bool {
    s.as_bytes().windows(3).any(|w| {
        w[0] == b'[' && w[2] == b']' && (w[1].is_ascii_alphanumeric() || b"-=!~".contains(&w[1]))
    })
}

/// `(line_number, line)` for each non-clickable push carrying a key hint.
fn find_unclickable_hints(source: &str) -> Vec<(usize, String)> {
    source
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.starts_with("//")
                && contains_key_hint(line)
                && line.contains(".push(")
                && !line.contains("push_clickable(")
        })
        .map(|(i, line)| (i + 1, line.trim().to_string()))
        .collect()
}

fn visit_render_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_render_files(&path, violations);
        } else if path.file_name().is_some_and(|n| n == "render.rs") {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            for (line_num, line) in find_unclickable_hints(&source) {
                violations.push((path.display().to_string(), line_num, line));
            }
        }
    }
}

#[test]
fn key_hints_are_clickable() {
    let games_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/games");
    let mut violations = Vec::new();
    visit_render_files(&games_dir, &mut violations);

    if !violations.is_empty() {
        let mut msg = String::from(
            "Key hints rendered without a click target.\n\
             Use push_clickable() or a TabBar tab instead of push().\n\n",
        );
        for (file, line_num, line) in &violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

#[test]
fn render_files_exist() {
    let render = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/games/code_clicker/render.rs");
    assert!(render.is_file(), "{} missing", render.display());
}

mod tests {
    use super::*;

    #[test]
    fn flags_hint_in_plain_push() {
        let source = r#"cl.push(Line::from(" [S] Save  [X] Reset"));"#;
        assert_eq!(find_unclickable_hints(source).len(), 1);
    }

    #[test]
    fn allows_push_clickable() {
        let source = r#"cl.push_clickable(Line::from(" [C] Write code"), CLICK_COMPUTER);"#;
        assert!(find_unclickable_hints(source).is_empty());
    }

    #[test]
    fn allows_tab_bar_hints() {
        let source = r#".tab("[U] Upgrades", style, TAB_UPGRADES)"#;
        assert!(find_unclickable_hints(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = r#"// cl.push(Line::from(" [S] Save"));"#;
        assert!(find_unclickable_hints(source).is_empty());
    }

    #[test]
    fn hint_detection() {
        assert!(contains_key_hint("[C]"));
        assert!(contains_key_hint("[1]"));
        assert!(contains_key_hint("press [y] now"));
        assert!(!contains_key_hint("[]"));
        assert!(!contains_key_hint("[OK]"));
        assert!(!contains_key_hint("[1-9]"));
        assert!(!contains_key_hint("ab"));
    }
}
