//! Cosmetic presentation state: flashes, floating particles, notifications,
//! the scrolling code display and the message log.
//!
//! None of this is persisted and none of it feeds back into progression.

use std::collections::VecDeque;

use super::catalog::{Catalog, Category};
use super::events::EngineEvent;
use super::format::{format_number, format_rate};

/// Seconds a notification stays on screen.
pub const NOTIFICATION_SECS: f64 = 3.0;
/// Lines kept in the code display.
pub const CODE_LINES_KEPT: usize = 50;
/// Lines the code display starts with.
const CODE_LINES_SEEDED: usize = 20;
/// Entries kept in the log panel.
const LOG_ENTRIES_KEPT: usize = 50;
/// Programmers get a chance to type a line once per this many seconds.
const TYPING_WINDOW_SECS: f64 = 0.5;
/// Chance per window that a programmer line appears, in percent.
const TYPING_CHANCE_PCT: u32 = 70;
/// Chance that a generated line comes from the advanced pool, in percent.
const ADVANCED_CHANCE_PCT: u32 = 20;
const CLICK_FLASH_SECS: f64 = 0.3;
const PURCHASE_FLASH_SECS: f64 = 0.5;
const MAX_PARTICLES: usize = 20;

const SNIPPETS: &[&str] = &[
    "fn main() {",
    "    let mut count = 0;",
    "}",
    "let app = App::new();",
    "app.initialize()?;",
    "for i in 0..10 {",
    "    count += i;",
    "if condition {",
    "    do_something();",
    "struct Game {",
    "    score: u64,",
    "impl Game {",
    "const API_URL: &str = \"https://api.example.com\";",
    "async fn fetch_data() -> Result<Data> {",
    "    let response = client.get(API_URL).send().await?;",
    "    response.json().await",
    "// TODO: fix this hack later",
    "document.add_event_listener(\"click\", handle_click);",
    "pub use component::Component;",
    "let data: Data = serde_json::from_str(&raw)?;",
    "self.loading = false;",
    "let sum: i32 = values.iter().sum();",
    "println!(\"debug: {:?}\", variable);",
    "match risky_operation() { Ok(v) => v, Err(e) => return Err(e.into()) }",
    "let square = |n| n * n;",
    "let max = numbers.iter().max();",
    "self.dispatch(Action::Refresh);",
];

const ADVANCED_SNIPPETS: &[&str] = &[
    "fn memoize<F: Fn(u64) -> u64>(f: F) -> impl FnMut(u64) -> u64 {",
    "    let mut cache = HashMap::new();",
    "    move |arg| *cache.entry(arg).or_insert_with(|| f(arg))",
    "#[derive(Clone, Debug, Serialize, Deserialize)]",
    "pub struct DataService<C: HttpClient> {",
    "    client: C,",
    "    async fn get_data(&self) -> Result<Vec<Record>, Error> {",
    "        self.client.get(&self.api_url).await",
    "fn sequence() -> impl Iterator<Item = u64> {",
    "    (0..).map(|i| i * i)",
    "let (tx, rx) = mpsc::channel();",
    "tx.send(Message::Process(data))?;",
    "impl<T> Deref for Wrapper<T> {",
    "    fn deref(&self) -> &T { &self.inner }",
    "unsafe impl Send for Handle {}",
];

/// Colour of a line in the code display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CodeColor {
    Green,
    Gray,
    Blue,
    Yellow,
    Orange,
}

const CODE_COLORS: [CodeColor; 5] = [
    CodeColor::Green,
    CodeColor::Gray,
    CodeColor::Blue,
    CodeColor::Yellow,
    CodeColor::Orange,
];

#[derive(Clone, Debug, PartialEq)]
pub struct CodeLine {
    pub text: &'static str,
    pub color: CodeColor,
}

/// A floating "+N lines" text rising from the computer.
#[derive(Clone, Debug)]
pub struct Particle {
    pub text: String,
    /// Column offset from the center of the computer art.
    pub col_offset: i16,
    /// Remaining lifetime in seconds.
    pub life: f64,
    /// Lifetime at spawn, for computing vertical position.
    pub max_life: f64,
}

#[derive(Clone, Debug)]
pub struct Notification {
    pub text: String,
    pub remaining: f64,
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub text: String,
    pub is_important: bool,
}

pub struct Feedback {
    /// Seconds left on the computer flash.
    pub click_flash: f64,
    /// Seconds left on the purchase flash.
    pub purchase_flash: f64,
    pub particles: Vec<Particle>,
    pub notifications: Vec<Notification>,
    pub code_lines: VecDeque<CodeLine>,
    pub log: Vec<LogEntry>,
    typing_elapsed: f64,
    rng_state: u32,
}

impl Feedback {
    pub fn new() -> Self {
        Self::with_seed(0x2545_F491)
    }

    pub fn with_seed(seed: u32) -> Self {
        let mut fb = Self {
            click_flash: 0.0,
            purchase_flash: 0.0,
            particles: Vec::new(),
            notifications: Vec::new(),
            code_lines: VecDeque::with_capacity(CODE_LINES_KEPT),
            log: Vec::new(),
            typing_elapsed: 0.0,
            // xorshift has a fixed point at zero
            rng_state: seed.max(1),
        };
        fb.add_code_lines(CODE_LINES_SEEDED);
        fb.add_log("Welcome to Code Clicker. Click the computer to write code!", true);
        fb
    }

    /// xorshift32.
    fn next_random(&mut self) -> u32 {
        let mut x = self.rng_state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng_state = x;
        x
    }

    fn roll_percent(&mut self, pct: u32) -> bool {
        self.next_random() % 100 < pct
    }

    fn random_code_line(&mut self) -> CodeLine {
        let pool = if self.roll_percent(ADVANCED_CHANCE_PCT) {
            ADVANCED_SNIPPETS
        } else {
            SNIPPETS
        };
        let text = pool[self.next_random() as usize % pool.len()];
        let color = CODE_COLORS[self.next_random() as usize % CODE_COLORS.len()];
        CodeLine { text, color }
    }

    pub fn add_code_lines(&mut self, count: usize) {
        for _ in 0..count {
            let line = self.random_code_line();
            self.code_lines.push_back(line);
            if self.code_lines.len() > CODE_LINES_KEPT {
                self.code_lines.pop_front();
            }
        }
    }

    pub fn add_log(&mut self, text: &str, is_important: bool) {
        self.log.push(LogEntry {
            text: text.to_string(),
            is_important,
        });
        if self.log.len() > LOG_ENTRIES_KEPT {
            self.log.remove(0);
        }
    }

    pub fn notify(&mut self, text: &str) {
        self.notifications.push(Notification {
            text: text.to_string(),
            remaining: NOTIFICATION_SECS,
        });
    }

    /// Manual click landed: flash, particle and one or two new code lines.
    pub fn on_click(&mut self, gained: f64) {
        self.click_flash = CLICK_FLASH_SECS;

        let col_offset = (self.next_random() % 13) as i16 - 6; // -6..+6
        let life = 0.8 + f64::from(self.next_random() % 5) / 10.0; // 0.8-1.2s
        self.particles.push(Particle {
            text: format!("+{} lines", format_rate(gained)),
            col_offset,
            life,
            max_life: life,
        });
        if self.particles.len() > MAX_PARTICLES {
            self.particles.remove(0);
        }

        self.add_code_lines(if gained > 5.0 { 2 } else { 1 });
    }

    /// React to an engine event.
    pub fn on_event(&mut self, event: &EngineEvent, catalog: &Catalog) {
        match event {
            EngineEvent::Purchased { item_id, new_level } => {
                let Some(item) = catalog.get(item_id) else {
                    return;
                };
                self.purchase_flash = PURCHASE_FLASH_SECS;
                let verb = match item.category {
                    Category::Generator => "Hired",
                    Category::ClickUpgrade | Category::OfficeUpgrade => "Purchased",
                };
                self.notify(&format!("{} {}!", verb, item.title));
                let cap = item
                    .max_level
                    .map(|m| format!("/{}", m))
                    .unwrap_or_default();
                self.add_log(
                    &format!("{} {} (level {}{})", verb, item.title, new_level, cap),
                    false,
                );
            }
            EngineEvent::RateChanged {
                resource_per_second,
            } => {
                self.add_log(
                    &format!("Now writing {} lines/s", format_rate(*resource_per_second)),
                    false,
                );
            }
        }
    }

    /// Log a load or save with a notification.
    pub fn on_loaded(&mut self, lines: f64) {
        self.notify("Game loaded successfully!");
        self.add_log(
            &format!("Save loaded: {} lines written so far", format_number(lines)),
            true,
        );
    }

    pub fn on_saved(&mut self, manual: bool) {
        if manual {
            self.notify("Game saved!");
        }
        self.add_log("Game saved", false);
    }

    /// Advance timers. `hired` is the number of programmers on staff.
    pub fn tick(&mut self, delta_seconds: f64, hired: u32) {
        if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
            return;
        }

        self.click_flash = (self.click_flash - delta_seconds).max(0.0);
        self.purchase_flash = (self.purchase_flash - delta_seconds).max(0.0);

        for p in &mut self.particles {
            p.life -= delta_seconds;
        }
        self.particles.retain(|p| p.life > 0.0);

        for n in &mut self.notifications {
            n.remaining -= delta_seconds;
        }
        self.notifications.retain(|n| n.remaining > 0.0);

        // One roll per window, however long the frame was
        self.typing_elapsed += delta_seconds;
        if self.typing_elapsed >= TYPING_WINDOW_SECS {
            self.typing_elapsed = 0.0;
            if hired > 0 && self.roll_percent(TYPING_CHANCE_PCT) {
                self.add_code_lines(1);
            }
        }
    }

    /// Drop transient effects after a reset. The code display stays.
    pub fn clear_transient(&mut self) {
        self.click_flash = 0.0;
        self.purchase_flash = 0.0;
        self.particles.clear();
        self.notifications.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_seeded_code() {
        let fb = Feedback::new();
        assert_eq!(fb.code_lines.len(), CODE_LINES_SEEDED);
        assert_eq!(fb.log.len(), 1);
    }

    #[test]
    fn code_display_is_bounded() {
        let mut fb = Feedback::new();
        fb.add_code_lines(200);
        assert_eq!(fb.code_lines.len(), CODE_LINES_KEPT);
    }

    #[test]
    fn click_adds_one_or_two_lines() {
        let mut fb = Feedback::new();
        fb.on_click(1.0);
        assert_eq!(fb.code_lines.len(), CODE_LINES_SEEDED + 1);
        fb.on_click(6.0);
        assert_eq!(fb.code_lines.len(), CODE_LINES_SEEDED + 3);
        assert_eq!(fb.particles.len(), 2);
        assert_eq!(fb.particles[1].text, "+6 lines");
        assert!(fb.click_flash > 0.0);
    }

    #[test]
    fn particle_offsets_stay_in_range() {
        let mut fb = Feedback::new();
        for _ in 0..100 {
            fb.on_click(1.0);
            let p = fb.particles.last().unwrap();
            assert!((-6..=6).contains(&p.col_offset));
        }
        assert!(fb.particles.len() <= MAX_PARTICLES);
    }

    #[test]
    fn timers_decay() {
        let mut fb = Feedback::new();
        fb.on_click(1.0);
        fb.notify("hello");
        fb.tick(2.0, 0);
        assert_eq!(fb.click_flash, 0.0);
        assert!(fb.particles.is_empty());
        assert_eq!(fb.notifications.len(), 1);
        fb.tick(1.0, 0);
        assert!(fb.notifications.is_empty());
    }

    #[test]
    fn no_typing_without_programmers() {
        let mut fb = Feedback::new();
        for _ in 0..100 {
            fb.tick(0.5, 0);
        }
        assert_eq!(fb.code_lines.len(), CODE_LINES_SEEDED);
    }

    #[test]
    fn programmers_type_most_windows() {
        let mut fb = Feedback::new();
        fb.code_lines.clear();
        for _ in 0..40 {
            fb.tick(0.5, 3);
        }
        // ~70% of 40 windows
        assert!(fb.code_lines.len() >= 15, "got {}", fb.code_lines.len());
        assert!(fb.code_lines.len() < 40, "got {}", fb.code_lines.len());
    }

    #[test]
    fn long_gap_types_at_most_one_line() {
        let mut fb = Feedback::new();
        fb.tick(3_600.0, 10);
        assert!(fb.code_lines.len() <= CODE_LINES_SEEDED + 1);
    }

    #[test]
    fn purchase_event_notifies_and_logs() {
        let catalog = Catalog::standard().unwrap();
        let mut fb = Feedback::new();
        fb.on_event(
            &EngineEvent::Purchased {
                item_id: "better-keyboard".into(),
                new_level: 2,
            },
            &catalog,
        );
        assert_eq!(fb.notifications[0].text, "Purchased Better Keyboard!");
        assert_eq!(fb.log.last().unwrap().text, "Purchased Better Keyboard (level 2/10)");
        assert!(fb.purchase_flash > 0.0);

        fb.on_event(
            &EngineEvent::Purchased {
                item_id: "intern".into(),
                new_level: 1,
            },
            &catalog,
        );
        assert_eq!(fb.notifications[1].text, "Hired Intern!");
    }

    #[test]
    fn rate_event_logs() {
        let catalog = Catalog::standard().unwrap();
        let mut fb = Feedback::new();
        fb.on_event(
            &EngineEvent::RateChanged {
                resource_per_second: 0.5,
            },
            &catalog,
        );
        assert_eq!(fb.log.last().unwrap().text, "Now writing 0.5 lines/s");
        assert!(fb.notifications.is_empty());
    }

    #[test]
    fn log_is_bounded() {
        let mut fb = Feedback::new();
        for i in 0..120 {
            fb.add_log(&format!("msg {}", i), false);
        }
        assert_eq!(fb.log.len(), LOG_ENTRIES_KEPT);
        assert_eq!(fb.log.last().unwrap().text, "msg 119");
    }

    #[test]
    fn same_seed_same_code() {
        let a = Feedback::with_seed(7);
        let b = Feedback::with_seed(7);
        assert_eq!(a.code_lines, b.code_lines);
    }
}
