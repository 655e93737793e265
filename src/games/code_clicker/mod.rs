//! Code Clicker: write lines of code, sell them for cash, hire programmers.
//!
//! The progression engine (`catalog`, `state`, `rates`, `purchase`, `tick`,
//! `engine`) is pure and headless. `feedback`, `render` and this module are
//! the presentation layer on top of it.

pub mod actions;
pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
pub mod feedback;
pub mod format;
pub mod purchase;
pub mod rates;
pub mod render;
pub mod save;
pub mod state;
pub mod tick;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;
use tracing::{debug, info, warn};

use crate::games::Game;
use crate::input::{ClickState, InputEvent};
use crate::time::{wall_clock_ms, IntervalTimer};

use actions::*;
use catalog::{Catalog, Category};
use engine::Engine;
use error::{CatalogError, PurchaseError};
use feedback::Feedback;
use format::format_number;
use save::{SaveStore, AUTOSAVE_INTERVAL_SECS};

pub struct CodeClickerGame {
    engine: Engine,
    feedback: Feedback,
    /// Shop tab on display.
    tab: Category,
    autosave: IntervalTimer,
    store: Box<dyn SaveStore>,
    /// Waiting for the player to confirm a reset.
    reset_pending: bool,
}

impl CodeClickerGame {
    /// Start with the platform store, loading any existing save.
    pub fn new() -> Result<Self, CatalogError> {
        Self::with_store(save::default_store())
    }

    /// Fails only when the built-in catalog does not validate.
    pub fn with_store(store: Box<dyn SaveStore>) -> Result<Self, CatalogError> {
        let catalog = Catalog::standard()?;
        let mut game = Self {
            engine: Engine::new(catalog),
            feedback: Feedback::new(),
            tab: Category::ClickUpgrade,
            autosave: IntervalTimer::new(AUTOSAVE_INTERVAL_SECS),
            store,
            reset_pending: false,
        };
        if let Some(snapshot) = save::load_game(game.store.as_ref()) {
            game.engine.restore(&snapshot);
            game.feedback.on_loaded(snapshot.resource_total);
            game.forward_events();
        }
        Ok(game)
    }

    fn forward_events(&mut self) {
        for event in self.engine.drain_events() {
            self.feedback.on_event(&event, self.engine.catalog());
        }
    }

    fn click(&mut self) {
        let gained = self.engine.on_click();
        self.feedback.on_click(gained);
    }

    /// Buy the `index`-th item of the current tab.
    fn buy(&mut self, index: usize) {
        let Some(id) = self
            .engine
            .catalog()
            .in_category(self.tab)
            .nth(index)
            .map(|item| item.id.clone())
        else {
            return;
        };

        match self.engine.on_purchase(&id) {
            Ok(receipt) => {
                debug!(
                    item_id = %receipt.item_id,
                    new_level = receipt.new_level,
                    next_cost = ?receipt.next_cost,
                    "purchase applied"
                );
                self.forward_events();
                self.save(false);
            }
            Err(e) => {
                debug!(item_id = %id, error = %e, "purchase refused");
                let message = self.refusal_message(&e);
                self.feedback.notify(&message);
            }
        }
    }

    fn refusal_message(&self, error: &PurchaseError) -> String {
        match error {
            PurchaseError::InsufficientFunds { have, need } => format!(
                "Need ${} more cash",
                format_number((need - have).max(0.0).ceil())
            ),
            PurchaseError::MaxLevelReached { id, .. } => {
                let title = self.engine.catalog().get(id).map_or(id.as_str(), |i| i.title.as_str());
                format!("{} is at maximum level", title)
            }
            PurchaseError::UnknownItemId(id) => format!("No such item: {}", id),
        }
    }

    /// Stamp the wall clock and write a snapshot.
    fn save(&mut self, manual: bool) {
        self.engine.mark_persisted(wall_clock_ms());
        match save::save_game(self.store.as_ref(), &self.engine.snapshot()) {
            Ok(()) => {
                self.autosave.reset();
                self.feedback.on_saved(manual);
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                self.feedback.notify("Save failed!");
                self.feedback.add_log(&format!("Save failed: {}", e), true);
            }
        }
    }

    fn reset(&mut self) {
        self.reset_pending = false;
        self.engine.reset();
        self.store.clear();
        self.feedback.clear_transient();
        self.forward_events();
        self.feedback.notify("Progress wiped. Back to hello world.");
        self.feedback.add_log("Progress reset", true);
        info!("player reset the game");
    }

    fn handle_reset_prompt(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::Key('y') | InputEvent::Click(RESET_CONFIRM) => {
                self.reset();
                true
            }
            InputEvent::Key('n') | InputEvent::Key('x') | InputEvent::Click(RESET_CANCEL) => {
                self.reset_pending = false;
                self.feedback.add_log("Reset cancelled", false);
                true
            }
            _ => {
                self.reset_pending = false;
                false
            }
        }
    }
}

impl Game for CodeClickerGame {
    fn handle_input(&mut self, event: &InputEvent) -> bool {
        if self.reset_pending && self.handle_reset_prompt(event) {
            return true;
        }

        match *event {
            InputEvent::Key('c') | InputEvent::Key(' ') | InputEvent::Click(CLICK_COMPUTER) => {
                self.click();
                true
            }
            InputEvent::Key('u') | InputEvent::Click(TAB_UPGRADES) => {
                self.tab = Category::ClickUpgrade;
                true
            }
            InputEvent::Key('p') | InputEvent::Click(TAB_PROGRAMMERS) => {
                self.tab = Category::Generator;
                true
            }
            InputEvent::Key('o') | InputEvent::Click(TAB_OFFICE) => {
                self.tab = Category::OfficeUpgrade;
                true
            }
            InputEvent::Key(c @ '1'..='9') => {
                self.buy((c as u8 - b'1') as usize);
                true
            }
            InputEvent::Click(id) if (BUY_ITEM_BASE..RESET_REQUEST).contains(&id) => {
                self.buy((id - BUY_ITEM_BASE) as usize);
                true
            }
            InputEvent::Key('s') | InputEvent::Click(SAVE_NOW) => {
                self.save(true);
                true
            }
            InputEvent::Key('x') | InputEvent::Click(RESET_REQUEST) => {
                self.reset_pending = true;
                self.feedback.notify("Press Y to wipe all progress, N to cancel");
                true
            }
            _ => false,
        }
    }

    fn tick(&mut self, delta_seconds: f64) {
        self.engine.on_tick(delta_seconds);
        self.feedback.tick(delta_seconds, self.engine.hired_generators());
        self.forward_events();
        if delta_seconds.is_finite() && delta_seconds > 0.0 && self.autosave.advance(delta_seconds) {
            self.save(false);
        }
    }

    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(self, f, area, click_state);
    }
}
