//! Semantic action IDs for Code Clicker click targets.
//!
//! These IDs are registered during render and dispatched via `InputEvent::Click`.

// ── Core actions ────────────────────────────────────────────────
pub const CLICK_COMPUTER: u16 = 0;
pub const SAVE_NOW: u16 = 1;

// ── Shop tabs ───────────────────────────────────────────────────
pub const TAB_UPGRADES: u16 = 10;
pub const TAB_PROGRAMMERS: u16 = 11;
pub const TAB_OFFICE: u16 = 12;

// ── Purchase (base + row index within the current tab) ──────────
pub const BUY_ITEM_BASE: u16 = 100;

// ── Reset (request, then confirm or cancel) ─────────────────────
pub const RESET_REQUEST: u16 = 900;
pub const RESET_CONFIRM: u16 = 901;
pub const RESET_CANCEL: u16 = 902;
