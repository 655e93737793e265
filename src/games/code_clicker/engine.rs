//! Engine facade: owns the catalog, the progression state and the pending
//! event queue. The presentation layer talks only to this type.

use tracing::info;

use super::catalog::Catalog;
use super::error::PurchaseError;
use super::events::EngineEvent;
use super::purchase::{self, Availability, PurchaseReceipt};
use super::rates;
use super::state::{ProgressionState, Snapshot};
use super::tick;

pub struct Engine {
    catalog: Catalog,
    state: ProgressionState,
    events: Vec<EngineEvent>,
}

impl Engine {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            state: ProgressionState::new(),
            events: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Load a (possibly partial or stale) snapshot.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.state.restore(&self.catalog, snapshot);
        self.events.push(EngineEvent::RateChanged {
            resource_per_second: self.state.resource_per_second(),
        });
        info!(
            items = self.state.item_levels().len(),
            resource_per_second = self.state.resource_per_second(),
            "progression restored"
        );
    }

    /// Manual click. Returns the lines gained.
    pub fn on_click(&mut self) -> f64 {
        self.state.apply_click()
    }

    pub fn on_purchase(&mut self, item_id: &str) -> Result<PurchaseReceipt, PurchaseError> {
        purchase::purchase(&self.catalog, &mut self.state, item_id, &mut self.events)
    }

    pub fn on_tick(&mut self, delta_seconds: f64) {
        tick::advance(&mut self.state, delta_seconds);
    }

    pub fn next_cost(&self, item_id: &str) -> Option<f64> {
        purchase::next_cost(&self.catalog, &self.state, item_id)
    }

    pub fn availability(&self, item_id: &str) -> Option<Availability> {
        purchase::availability(&self.catalog, &self.state, item_id)
    }

    /// Programmers currently hired, summed over all generator items.
    pub fn hired_generators(&self) -> u32 {
        rates::hired_generators(&self.catalog, self.state.item_levels())
    }

    /// Take all events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Wipe progress back to a new game.
    pub fn reset(&mut self) {
        let had_rate = self.state.resource_per_second() > 0.0;
        self.state = ProgressionState::new();
        if had_rate {
            self.events.push(EngineEvent::RateChanged {
                resource_per_second: 0.0,
            });
        }
        info!("progression reset");
    }

    /// Record when the state was last written out.
    pub fn mark_persisted(&mut self, timestamp_ms: f64) {
        self.state.last_persist_timestamp = timestamp_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_engine() -> Engine {
        Engine::new(Catalog::standard().unwrap())
    }

    #[test]
    fn click_then_buy_intern() {
        let mut engine = new_engine();
        for _ in 0..160 {
            engine.on_click();
        }
        // 160 lines → 16 cash
        assert!((engine.state().currency_total() - 16.0).abs() < 1e-9);
        assert_eq!(engine.state().total_clicks(), 160);
        let receipt = engine.on_purchase("intern").unwrap();
        assert_eq!(receipt.new_level, 1);
        assert_eq!(receipt.next_cost, Some(18.0));
        assert!((engine.state().resource_per_second() - 0.5).abs() < 1e-12);

        let events = engine.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], EngineEvent::Purchased { new_level: 1, .. }));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn tick_produces_after_hiring() {
        let mut engine = new_engine();
        let mut snap = Snapshot::default();
        snap.item_levels.insert("junior-dev".into(), 3);
        engine.restore(&snap);

        engine.on_tick(2.0);
        assert!((engine.state().resource_total() - 6.0).abs() < 1e-9);
        assert!((engine.state().currency_total() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn restore_emits_rate_changed() {
        let mut engine = new_engine();
        let mut snap = Snapshot::default();
        snap.item_levels.insert("intern".into(), 2);
        engine.restore(&snap);
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::RateChanged {
                resource_per_second: 1.0
            }]
        );
    }

    #[test]
    fn failed_purchase_emits_nothing() {
        let mut engine = new_engine();
        assert!(engine.on_purchase("senior-dev").is_err());
        assert!(engine.on_purchase("nope").is_err());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn snapshot_restore_roundtrip_preserves_progress() {
        let mut engine = new_engine();
        let mut snap = Snapshot::default();
        snap.currency_total = 5_000.0;
        engine.restore(&snap);
        engine.on_purchase("intern").unwrap();
        engine.on_purchase("better-keyboard").unwrap();
        engine.on_purchase("code-optimization").unwrap();
        engine.on_tick(10.0);

        let saved = engine.snapshot();
        let mut other = new_engine();
        other.restore(&saved);
        assert_eq!(other.state().item_levels(), engine.state().item_levels());
        assert!((other.state().resource_total() - engine.state().resource_total()).abs() < 1e-9);
        assert!((other.state().currency_total() - engine.state().currency_total()).abs() < 1e-9);
        assert!(
            (other.state().resource_per_click() - engine.state().resource_per_click()).abs()
                < 1e-9
        );
        assert!(
            (other.state().currency_per_resource_unit()
                - engine.state().currency_per_resource_unit())
            .abs()
                < 1e-12
        );
    }

    #[test]
    fn reset_clears_progress() {
        let mut engine = new_engine();
        let mut snap = Snapshot::default();
        snap.item_levels.insert("intern".into(), 4);
        snap.resource_total = 100.0;
        engine.restore(&snap);
        engine.drain_events();

        engine.reset();
        assert!((engine.state().resource_total() - 0.0).abs() < f64::EPSILON);
        assert!(engine.state().item_levels().is_empty());
        assert_eq!(
            engine.drain_events(),
            vec![EngineEvent::RateChanged {
                resource_per_second: 0.0
            }]
        );
    }

    #[test]
    fn mark_persisted_updates_timestamp() {
        let mut engine = new_engine();
        engine.mark_persisted(123.0);
        assert!((engine.snapshot().last_persist_timestamp - 123.0).abs() < f64::EPSILON);
    }

    #[test]
    fn hired_generators_sums_programmers() {
        let mut engine = new_engine();
        let mut snap = Snapshot::default();
        snap.item_levels.insert("intern".into(), 2);
        snap.item_levels.insert("senior-dev".into(), 1);
        engine.restore(&snap);
        assert_eq!(engine.hired_generators(), 3);
    }
}
