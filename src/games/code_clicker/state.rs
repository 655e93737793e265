//! Progression state: the canonical counters the engine owns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::catalog::Catalog;
use super::rates;

/// Lines gained per click before any upgrade.
pub const BASE_RESOURCE_PER_CLICK: f64 = 1.0;

/// Cash earned per line before any office upgrade.
pub const BASE_CURRENCY_PER_RESOURCE_UNIT: f64 = 0.1;

/// Mutable progression counters.
///
/// Fields are only writable from inside the engine modules so the derived
/// rates cannot drift from `item_levels`.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressionState {
    pub(super) resource_total: f64,
    pub(super) currency_total: f64,
    pub(super) resource_per_click: f64,
    pub(super) resource_per_second: f64,
    pub(super) currency_per_resource_unit: f64,
    pub(super) item_levels: BTreeMap<String, u32>,
    pub(super) last_persist_timestamp: f64,
    pub(super) total_clicks: u64,
}

/// Read-only flat copy of [`ProgressionState`], handed to the UI and to
/// persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub resource_total: f64,
    pub currency_total: f64,
    pub resource_per_click: f64,
    pub resource_per_second: f64,
    pub currency_per_resource_unit: f64,
    pub item_levels: BTreeMap<String, u32>,
    pub last_persist_timestamp: f64,
    pub total_clicks: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        ProgressionState::new().snapshot()
    }
}

impl Snapshot {
    /// Level of an item, 0 when never bought.
    pub fn level(&self, id: &str) -> u32 {
        self.item_levels.get(id).copied().unwrap_or(0)
    }
}

impl ProgressionState {
    pub fn new() -> Self {
        Self {
            resource_total: 0.0,
            currency_total: 0.0,
            resource_per_click: BASE_RESOURCE_PER_CLICK,
            resource_per_second: 0.0,
            currency_per_resource_unit: BASE_CURRENCY_PER_RESOURCE_UNIT,
            item_levels: BTreeMap::new(),
            last_persist_timestamp: 0.0,
            total_clicks: 0,
        }
    }

    pub fn resource_total(&self) -> f64 {
        self.resource_total
    }

    pub fn currency_total(&self) -> f64 {
        self.currency_total
    }

    pub fn resource_per_click(&self) -> f64 {
        self.resource_per_click
    }

    pub fn resource_per_second(&self) -> f64 {
        self.resource_per_second
    }

    pub fn currency_per_resource_unit(&self) -> f64 {
        self.currency_per_resource_unit
    }

    pub fn item_levels(&self) -> &BTreeMap<String, u32> {
        &self.item_levels
    }

    pub fn last_persist_timestamp(&self) -> f64 {
        self.last_persist_timestamp
    }

    pub fn total_clicks(&self) -> u64 {
        self.total_clicks
    }

    /// Level of an item, 0 when never bought.
    pub fn level(&self, id: &str) -> u32 {
        self.item_levels.get(id).copied().unwrap_or(0)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            resource_total: self.resource_total,
            currency_total: self.currency_total,
            resource_per_click: self.resource_per_click,
            resource_per_second: self.resource_per_second,
            currency_per_resource_unit: self.currency_per_resource_unit,
            item_levels: self.item_levels.clone(),
            last_persist_timestamp: self.last_persist_timestamp,
            total_clicks: self.total_clicks,
        }
    }

    /// Replace this state with a snapshot, keeping only what is valid.
    ///
    /// Unknown ids are dropped, levels above a cap are clamped, negative or
    /// non-finite totals fall back to zero. The three rates are re-derived
    /// from the restored levels; the snapshot's copies are ignored.
    pub fn restore(&mut self, catalog: &Catalog, snapshot: &Snapshot) {
        let mut fresh = ProgressionState::new();
        fresh.resource_total = non_negative("resource_total", snapshot.resource_total);
        fresh.currency_total = non_negative("currency_total", snapshot.currency_total);
        fresh.last_persist_timestamp =
            non_negative("last_persist_timestamp", snapshot.last_persist_timestamp);
        fresh.total_clicks = snapshot.total_clicks;

        for (id, &level) in &snapshot.item_levels {
            let Some(item) = catalog.get(id) else {
                warn!(item_id = %id, "dropping unknown item from snapshot");
                continue;
            };
            let clamped = item.max_level.map_or(level, |max| level.min(max));
            if clamped != level {
                warn!(item_id = %id, level, clamped, "clamping level to max");
            }
            if clamped > 0 {
                fresh.item_levels.insert(item.id.clone(), clamped);
            }
        }

        fresh.resource_per_click = rates::resource_per_click(catalog, &fresh.item_levels);
        fresh.currency_per_resource_unit =
            rates::currency_per_resource_unit(catalog, &fresh.item_levels);
        rates::recompute(catalog, &mut fresh);

        *self = fresh;
    }

    /// One manual click. Returns the lines gained.
    pub fn apply_click(&mut self) -> f64 {
        let lines = self.resource_per_click;
        self.resource_total += lines;
        self.currency_total += lines * self.currency_per_resource_unit;
        self.total_clicks += 1;
        lines
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

fn non_negative(field: &str, value: f64) -> f64 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        warn!(field, value, "discarding invalid snapshot value");
        0.0
    }
}
