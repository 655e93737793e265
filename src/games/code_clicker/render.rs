//! Code Clicker rendering: stats header, clickable computer, code display,
//! shop tabs and the message log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::catalog::Category;
use super::feedback::CodeColor;
use super::format::{format_number, format_rate};
use super::purchase::Availability;
use super::CodeClickerGame;

/// Monitor frame drawn around the last few code lines.
const MONITOR_TOP: &str = "╭────────────────────╮";
const MONITOR_BOTTOM: &str = "╰────────────────────╯";
const MONITOR_STAND: &str = "      ╞════════╡      ";
const MONITOR_KEYBOARD: &str = "  ▟▀▀▀▀▀▀▀▀▀▀▀▀▀▀▀▙  ";
const SCREEN_WIDTH: usize = 20;
const SCREEN_ROWS: usize = 3;

pub fn render(
    game: &CodeClickerGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let mut cs = click_state.borrow_mut();

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // stats
            Constraint::Min(10),   // body
            Constraint::Length(3), // help
        ])
        .split(area);

    render_stats(game, f, outer[0]);

    if is_narrow_layout(area.width) {
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10), // computer
                Constraint::Length(3),  // tabs
                Constraint::Min(6),     // shop
                Constraint::Length(6),  // log
            ])
            .split(outer[1]);
        render_computer(game, f, body[0], &mut cs);
        render_tab_bar(game, f, body[1], &mut cs);
        render_shop(game, f, body[2], &mut cs);
        render_log(game, f, body[3]);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(outer[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(4)])
            .split(columns[0]);
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(8),
            ])
            .split(columns[1]);
        render_computer(game, f, left[0], &mut cs);
        render_code_display(game, f, left[1]);
        render_tab_bar(game, f, right[0], &mut cs);
        render_shop(game, f, right[1], &mut cs);
        render_log(game, f, right[2]);
    }

    render_help(game, f, outer[2], &mut cs);
}

fn render_stats(game: &CodeClickerGame, f: &mut Frame, area: Rect) {
    let state = game.engine.state();
    let label = Style::default().fg(Color::DarkGray);
    let line = Line::from(vec![
        Span::styled(" Lines ", label),
        Span::styled(
            format_number(state.resource_total()),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  ", label),
        Span::styled(
            format!("{}/s", format_rate(state.resource_per_second())),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  │  Cash ", label),
        Span::styled(
            format!("${}", format_number(state.currency_total())),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    ]);

    let border_color = if game.feedback.purchase_flash > 0.0 {
        Color::White
    } else {
        Color::Green
    };
    let widget = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Code Clicker "),
    );
    f.render_widget(widget, area);
}

fn code_color(color: CodeColor) -> Color {
    match color {
        CodeColor::Green => Color::Green,
        CodeColor::Gray => Color::Gray,
        CodeColor::Blue => Color::LightBlue,
        CodeColor::Yellow => Color::LightYellow,
        CodeColor::Orange => Color::LightRed,
    }
}

/// Clip `text` to `width` columns, padding the rest with spaces.
fn fit(text: &str, width: usize) -> String {
    let mut s: String = text.chars().take(width).collect();
    let len = s.chars().count();
    s.extend(std::iter::repeat(' ').take(width - len));
    s
}

/// The computer: a monitor showing the newest code, the click button, and
/// the "+N lines" particles rising over it. The whole panel is a target.
fn render_computer(game: &CodeClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let flashing = game.feedback.click_flash > 0.0;
    let frame_style = Style::default().fg(if flashing { Color::White } else { Color::Green });
    let screen_style = if flashing {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::Green).bg(Color::Black)
    };

    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(MONITOR_TOP, frame_style)));
    let newest: Vec<&str> = game
        .feedback
        .code_lines
        .iter()
        .rev()
        .take(SCREEN_ROWS)
        .map(|l| l.text)
        .collect();
    for row in 0..SCREEN_ROWS {
        let text = newest
            .get(SCREEN_ROWS - 1 - row)
            .map(|t| t.trim_start())
            .unwrap_or("");
        cl.push(Line::from(vec![
            Span::styled("│", frame_style),
            Span::styled(fit(text, SCREEN_WIDTH), screen_style),
            Span::styled("│", frame_style),
        ]));
    }
    cl.push(Line::from(Span::styled(MONITOR_BOTTOM, frame_style)));
    cl.push(Line::from(Span::styled(MONITOR_STAND, frame_style)));
    cl.push(Line::from(Span::styled(MONITOR_KEYBOARD, frame_style)));

    let per_click = game.engine.state().resource_per_click();
    let button_style = if flashing {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    };
    cl.push_clickable(
        Line::from(Span::styled(
            format!(" [C] Write code  +{} ", format_rate(per_click)),
            button_style,
        )),
        CLICK_COMPUTER,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(format!(" {} clicks ", game.engine.state().total_clicks()));
    let inner = block.inner(area);

    cl.register_targets(area, cs, 1, 1, 0);
    cs.add_click_target(inner, CLICK_COMPUTER);

    let widget = Paragraph::new(cl.into_lines())
        .block(block)
        .alignment(ratzilla::ratatui::layout::Alignment::Center);
    f.render_widget(widget, area);

    // Particles rise from the bottom of the panel as their life runs out
    if inner.height == 0 || inner.width == 0 {
        return;
    }
    let center = i32::from(inner.x) + i32::from(inner.width) / 2;
    for p in &game.feedback.particles {
        let frac = (p.life / p.max_life).clamp(0.0, 1.0);
        let row = inner.y + (frac * f64::from(inner.height - 1)).round() as u16;
        let width = p.text.chars().count() as u16;
        let width = width.min(inner.width);
        let x = (center + i32::from(p.col_offset) - i32::from(width) / 2)
            .clamp(i32::from(inner.x), i32::from(inner.x + inner.width - width));
        let style = if frac > 0.5 {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        f.render_widget(
            Paragraph::new(Span::styled(p.text.as_str(), style)),
            Rect::new(x as u16, row, width, 1),
        );
    }
}

/// Scrolling code, newest at the bottom.
fn render_code_display(game: &CodeClickerGame, f: &mut Frame, area: Rect) {
    let lines: Vec<Line> = game
        .feedback
        .code_lines
        .iter()
        .map(|l| Line::from(Span::styled(l.text, Style::default().fg(code_color(l.color)))))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" main.rs ");
    let inner = block.inner(area);

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    let total = paragraph.line_count(inner.width) as u16;
    let scroll = total.saturating_sub(inner.height);
    f.render_widget(paragraph.scroll((scroll, 0)).block(block), area);
}

fn render_tab_bar(game: &CodeClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let tab_style = |category: Category, color: Color| -> Style {
        if category == game.tab {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    };

    TabBar::new(" │ ")
        .tab("[U] Upgrades", tab_style(Category::ClickUpgrade, Color::Magenta), TAB_UPGRADES)
        .tab("[P] Programmers", tab_style(Category::Generator, Color::Cyan), TAB_PROGRAMMERS)
        .tab("[O] Office", tab_style(Category::OfficeUpgrade, Color::Yellow), TAB_OFFICE)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .render(f, area, cs);
}

fn render_shop(game: &CodeClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let engine = &game.engine;
    let mut cl = ClickableList::new();

    for (idx, item) in engine.catalog().in_category(game.tab).enumerate() {
        let level = engine.state().level(&item.id);
        let availability = engine.availability(&item.id).unwrap_or(Availability::TooExpensive);
        let (title_style, cost_style) = match availability {
            Availability::Affordable => (
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                Style::default().fg(Color::Green),
            ),
            Availability::TooExpensive => (
                Style::default().fg(Color::Gray),
                Style::default().fg(Color::Red),
            ),
            Availability::Maxed => (
                Style::default().fg(Color::DarkGray),
                Style::default().fg(Color::DarkGray),
            ),
        };

        let key = if idx < 9 {
            format!("[{}]", idx + 1)
        } else {
            "   ".to_string()
        };
        let cost = match engine.next_cost(&item.id) {
            Some(c) => format!("${}", format_number(c)),
            None => "MAX".to_string(),
        };
        let level_text = match item.max_level {
            Some(max) => format!("Lv {}/{}", level, max),
            None => format!("×{}", level),
        };

        let action = BUY_ITEM_BASE + idx as u16;
        cl.push_clickable(
            Line::from(vec![
                Span::styled(
                    format!(" {} ", key),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(item.title.as_str(), title_style),
                Span::styled(format!("  {}", cost), cost_style),
                Span::styled(format!("  {}", level_text), Style::default().fg(Color::Cyan)),
            ]),
            action,
        );
        cl.push_clickable(
            Line::from(Span::styled(
                format!("     {}", item.effect.summary()),
                Style::default().fg(Color::DarkGray),
            )),
            action,
        );
    }

    if cl.is_empty() {
        cl.push(Line::from(Span::styled(
            " Nothing for sale here",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = match game.tab {
        Category::Generator => format!(" Programmers ({} hired) ", engine.hired_generators()),
        other => format!(" {} ", other.label()),
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Blue))
        .title(title);

    cl.register_targets(area, cs, 1, 1, 0);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

/// Notifications on top, then log entries newest first.
fn render_log(game: &CodeClickerGame, f: &mut Frame, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = game
        .feedback
        .notifications
        .iter()
        .rev()
        .map(|n| {
            Line::from(Span::styled(
                format!("★ {}", n.text),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    let remaining = visible.saturating_sub(lines.len());
    lines.extend(game.feedback.log.iter().rev().take(remaining).map(|entry| {
        let style = if entry.is_important {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        Line::from(Span::styled(entry.text.as_str(), style))
    }));

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

fn render_help(game: &CodeClickerGame, f: &mut Frame, area: Rect, cs: &mut ClickState) {
    let key_style = Style::default().fg(Color::DarkGray);
    let bar = if game.reset_pending {
        TabBar::new("   ")
            .tab(
                "[Y] Wipe all progress",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                RESET_CONFIRM,
            )
            .tab("[N] Keep playing", Style::default().fg(Color::Green), RESET_CANCEL)
    } else {
        TabBar::new("   ")
            .tab("[S] Save", key_style, SAVE_NOW)
            .tab("[X] Reset", key_style, RESET_REQUEST)
    };
    bar.block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .render(f, area, cs);
}
