/// Game trait shared by the entry point and the game.

pub mod code_clicker;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

pub trait Game {
    /// Handle an input event. Returns true if the event was consumed.
    fn handle_input(&mut self, event: &InputEvent) -> bool;

    /// Advance by `delta_seconds` of elapsed time.
    fn tick(&mut self, delta_seconds: f64);

    /// Render into `area`, registering click targets as it goes.
    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>);
}
