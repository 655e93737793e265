//! Error types for the Code Clicker engine.

use thiserror::Error;

use super::catalog::Category;

/// Why a purchase was refused. None of these mutate state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PurchaseError {
    /// Not enough cash for the next level.
    #[error("not enough cash: have {have}, need {need}")]
    InsufficientFunds {
        /// Cash on hand.
        have: f64,
        /// Cost of the next level.
        need: f64,
    },

    /// The item is capped and already at its cap.
    #[error("{id} is already at max level {max_level}")]
    MaxLevelReached { id: String, max_level: u32 },

    /// The id does not name any catalog item.
    #[error("unknown item id: {0}")]
    UnknownItemId(String),
}

/// Rejected catalog definitions.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("duplicate item id: {0}")]
    DuplicateId(String),

    #[error("{id}: base cost must be a positive number (got {base_cost})")]
    InvalidBaseCost { id: String, base_cost: f64 },

    #[error("{id}: cost multiplier must be greater than 1 (got {cost_multiplier})")]
    InvalidCostMultiplier { id: String, cost_multiplier: f64 },

    #[error("{0}: max level must be at least 1")]
    ZeroMaxLevel(String),

    #[error("{id}: effect does not apply to a {category:?}")]
    EffectMismatch { id: String, category: Category },

    #[error("catalog json: {0}")]
    Parse(String),
}

/// Persistence failures. Loading never fails hard; these only surface from
/// writing a save.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SaveError {
    #[error("serialization: {0}")]
    Serialization(String),

    #[cfg(target_arch = "wasm32")]
    #[error("storage: {0}")]
    Storage(String),
}

impl From<serde_json::Error> for SaveError {
    fn from(e: serde_json::Error) -> Self {
        SaveError::Serialization(e.to_string())
    }
}
