//! Derived-rate calculations. Every rate is a pure function of item levels,
//! always recomputed from scratch.

use std::collections::BTreeMap;

use tracing::debug;

use super::catalog::{Catalog, Category, Effect};
use super::state::{ProgressionState, BASE_CURRENCY_PER_RESOURCE_UNIT, BASE_RESOURCE_PER_CLICK};

fn level_of(levels: &BTreeMap<String, u32>, id: &str) -> f64 {
    levels.get(id).copied().unwrap_or(0) as f64
}

/// Lines per second: programmer output summed, then scaled by every
/// generator multiplier in catalog order.
pub fn resource_per_second(catalog: &Catalog, levels: &BTreeMap<String, u32>) -> f64 {
    let mut base = 0.0;
    let mut multiplier = 1.0;
    for item in catalog.items() {
        let level = level_of(levels, &item.id);
        match item.effect {
            Effect::LinesPerSecond(delta) => base += delta * level,
            Effect::GeneratorMultiplier(delta) => multiplier *= 1.0 + delta * level,
            Effect::LinesPerClick(_) | Effect::CashPerLineMultiplier(_) => {}
        }
    }
    base * multiplier
}

/// Lines per click implied by the click upgrade levels.
pub fn resource_per_click(catalog: &Catalog, levels: &BTreeMap<String, u32>) -> f64 {
    catalog
        .items()
        .iter()
        .filter_map(|item| match item.effect {
            Effect::LinesPerClick(delta) => Some(delta * level_of(levels, &item.id)),
            _ => None,
        })
        .fold(BASE_RESOURCE_PER_CLICK, |acc, bonus| acc + bonus)
}

/// Cash per line: each purchased level multiplies by `1 + delta`.
pub fn currency_per_resource_unit(catalog: &Catalog, levels: &BTreeMap<String, u32>) -> f64 {
    catalog
        .items()
        .iter()
        .filter_map(|item| match item.effect {
            Effect::CashPerLineMultiplier(delta) => {
                let level = levels.get(&item.id).copied().unwrap_or(0);
                Some((1.0 + delta).powi(level.min(i32::MAX as u32) as i32))
            }
            _ => None,
        })
        .fold(BASE_CURRENCY_PER_RESOURCE_UNIT, |acc, factor| acc * factor)
}

/// Total programmers hired across all generator items.
pub fn hired_generators(catalog: &Catalog, levels: &BTreeMap<String, u32>) -> u32 {
    catalog
        .in_category(Category::Generator)
        .map(|item| levels.get(&item.id).copied().unwrap_or(0))
        .fold(0u32, u32::saturating_add)
}

/// Store a fresh lines-per-second value into `state` and return it.
pub fn recompute(catalog: &Catalog, state: &mut ProgressionState) -> f64 {
    let rate = resource_per_second(catalog, &state.item_levels);
    state.resource_per_second = rate;
    debug!(resource_per_second = rate, "recomputed production rate");
    rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::code_clicker::catalog::CatalogItem;

    fn generator(id: &str, lps: f64) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            category: Category::Generator,
            base_cost: 10.0,
            cost_multiplier: 1.2,
            max_level: None,
            effect: Effect::LinesPerSecond(lps),
        }
    }

    fn multiplier(id: &str, delta: f64) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            category: Category::OfficeUpgrade,
            base_cost: 500.0,
            cost_multiplier: 3.0,
            max_level: Some(5),
            effect: Effect::GeneratorMultiplier(delta),
        }
    }

    fn levels(pairs: &[(&str, u32)]) -> BTreeMap<String, u32> {
        pairs.iter().map(|(id, l)| (id.to_string(), *l)).collect()
    }

    #[test]
    fn two_generators_with_multiplier() {
        let catalog = Catalog::new(vec![
            generator("a", 0.5),
            generator("b", 1.0),
            multiplier("m", 0.25),
        ])
        .unwrap();
        let lv = levels(&[("a", 2), ("b", 1), ("m", 2)]);
        // base = 0.5*2 + 1*1 = 2, multiplier = 1 + 0.25*2 = 1.5
        assert!((resource_per_second(&catalog, &lv) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn every_generator_multiplier_applies() {
        let catalog = Catalog::new(vec![
            generator("a", 1.0),
            multiplier("m1", 0.5),
            multiplier("m2", 1.0),
        ])
        .unwrap();
        let lv = levels(&[("a", 4), ("m1", 1), ("m2", 1)]);
        // 4 * 1.5 * 2.0
        assert!((resource_per_second(&catalog, &lv) - 12.0).abs() < 1e-12);
    }

    #[test]
    fn zero_levels_zero_rate() {
        let catalog = Catalog::standard().unwrap();
        assert!((resource_per_second(&catalog, &BTreeMap::new()) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn multiplier_without_generators_is_zero() {
        let catalog = Catalog::standard().unwrap();
        let lv = levels(&[("better-monitors", 2)]);
        assert!((resource_per_second(&catalog, &lv) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn click_rate_sums_click_upgrades() {
        let catalog = Catalog::standard().unwrap();
        let lv = levels(&[("better-keyboard", 3), ("autocomplete", 1)]);
        // 1 + 3*1 + 1*5
        assert!((resource_per_click(&catalog, &lv) - 9.0).abs() < 1e-12);
    }

    #[test]
    fn cash_rate_compounds_per_level() {
        let catalog = Catalog::standard().unwrap();
        let lv = levels(&[("code-optimization", 2)]);
        // 0.1 * 1.5 * 1.5
        assert!((currency_per_resource_unit(&catalog, &lv) - 0.225).abs() < 1e-12);
    }

    #[test]
    fn hired_generators_counts_levels() {
        let catalog = Catalog::standard().unwrap();
        let lv = levels(&[("intern", 3), ("senior-dev", 2), ("coffee", 4)]);
        assert_eq!(hired_generators(&catalog, &lv), 5);
    }

    #[test]
    fn recompute_is_idempotent() {
        let catalog = Catalog::standard().unwrap();
        let mut state = ProgressionState::new();
        state.item_levels = levels(&[("intern", 5), ("junior-dev", 2), ("better-monitors", 1)]);
        let first = recompute(&catalog, &mut state);
        let second = recompute(&catalog, &mut state);
        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(state.resource_per_second().to_bits(), first.to_bits());
    }
}
