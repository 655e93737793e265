//! Purchase engine: the only place cash is spent.
//!
//! Each item is a small state machine over its level, `0..=max_level` (or
//! unbounded). A successful purchase is the only transition, and there is no
//! transition out of the capped state.

use tracing::debug;

use super::catalog::{Catalog, Effect};
use super::error::PurchaseError;
use super::events::EngineEvent;
use super::rates;
use super::state::ProgressionState;

/// Result of a successful purchase.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseReceipt {
    pub item_id: String,
    pub new_level: u32,
    /// Cost of the following level; `None` once the item is capped.
    pub next_cost: Option<f64>,
}

/// Whether a shop row can be bought right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Affordable,
    TooExpensive,
    Maxed,
}

/// Cost of the next level, or `None` for unknown or capped items.
pub fn next_cost(catalog: &Catalog, state: &ProgressionState, item_id: &str) -> Option<f64> {
    let item = catalog.get(item_id)?;
    let level = state.level(item_id);
    if item.is_maxed(level) {
        None
    } else {
        Some(item.cost_at(level))
    }
}

pub fn availability(
    catalog: &Catalog,
    state: &ProgressionState,
    item_id: &str,
) -> Option<Availability> {
    let item = catalog.get(item_id)?;
    let level = state.level(item_id);
    Some(if item.is_maxed(level) {
        Availability::Maxed
    } else if state.currency_total >= item.cost_at(level) {
        Availability::Affordable
    } else {
        Availability::TooExpensive
    })
}

/// Try to buy one level of `item_id`. On failure nothing is mutated and no
/// event is pushed.
pub fn purchase(
    catalog: &Catalog,
    state: &mut ProgressionState,
    item_id: &str,
    events: &mut Vec<EngineEvent>,
) -> Result<PurchaseReceipt, PurchaseError> {
    let item = catalog
        .get(item_id)
        .ok_or_else(|| PurchaseError::UnknownItemId(item_id.to_string()))?;

    let level = state.level(item_id);
    if let Some(max_level) = item.max_level {
        if level >= max_level {
            return Err(PurchaseError::MaxLevelReached {
                id: item.id.clone(),
                max_level,
            });
        }
    }

    let cost = item.cost_at(level);
    if state.currency_total < cost {
        return Err(PurchaseError::InsufficientFunds {
            have: state.currency_total,
            need: cost,
        });
    }

    state.currency_total -= cost;
    let new_level = level + 1;
    state.item_levels.insert(item.id.clone(), new_level);
    events.push(EngineEvent::Purchased {
        item_id: item.id.clone(),
        new_level,
    });

    match item.effect {
        Effect::LinesPerClick(delta) => {
            state.resource_per_click += delta;
        }
        Effect::LinesPerSecond(_) | Effect::GeneratorMultiplier(_) => {
            let rate = rates::recompute(catalog, state);
            events.push(EngineEvent::RateChanged {
                resource_per_second: rate,
            });
        }
        Effect::CashPerLineMultiplier(delta) => {
            state.currency_per_resource_unit *= 1.0 + delta;
        }
    }

    let next_cost = if item.is_maxed(new_level) {
        None
    } else {
        Some(item.cost_at(new_level))
    };
    debug!(item_id = %item.id, new_level, cost, "purchase committed");

    Ok(PurchaseReceipt {
        item_id: item.id.clone(),
        new_level,
        next_cost,
    })
}
