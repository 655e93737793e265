//! Time-based production, independent of frame rate.

use tracing::warn;

use super::state::ProgressionState;

/// Advance production by `delta_seconds` of wall-clock time.
///
/// Output is linear in elapsed time, so a long gap (a backgrounded tab) is
/// credited in full.
pub fn advance(state: &mut ProgressionState, delta_seconds: f64) {
    if !delta_seconds.is_finite() || delta_seconds < 0.0 {
        warn!(delta_seconds, "ignoring invalid tick delta");
        return;
    }
    if state.resource_per_second <= 0.0 || delta_seconds == 0.0 {
        return;
    }

    let resource = state.resource_per_second * delta_seconds;
    let currency = resource * state.currency_per_resource_unit;
    state.resource_total += resource;
    state.currency_total += currency;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producing(rate: f64, cash_per_line: f64) -> ProgressionState {
        let mut state = ProgressionState::new();
        state.resource_per_second = rate;
        state.currency_per_resource_unit = cash_per_line;
        state
    }

    #[test]
    fn advance_example() {
        let mut state = producing(3.0, 0.1);
        advance(&mut state, 2.0);
        assert!((state.resource_total() - 6.0).abs() < 1e-9);
        assert!((state.currency_total() - 0.6).abs() < 1e-9);
    }

    #[test]
    fn advance_zero_is_noop() {
        let mut state = producing(3.0, 0.1);
        let before = state.clone();
        advance(&mut state, 0.0);
        assert_eq!(state, before);
    }

    #[test]
    fn advance_without_production_is_noop() {
        let mut state = ProgressionState::new();
        let before = state.clone();
        advance(&mut state, 100.0);
        assert_eq!(state, before);
    }

    #[test]
    fn advance_rejects_negative_and_nan() {
        let mut state = producing(3.0, 0.1);
        let before = state.clone();
        advance(&mut state, -1.0);
        advance(&mut state, f64::NAN);
        advance(&mut state, f64::INFINITY);
        assert_eq!(state, before);
    }

    #[test]
    fn large_gap_is_extrapolated_linearly() {
        let mut state = producing(2.0, 0.1);
        // one hour in a background tab
        advance(&mut state, 3_600.0);
        assert!((state.resource_total() - 7_200.0).abs() < 1e-6);
        assert!((state.currency_total() - 720.0).abs() < 1e-6);
    }
}
