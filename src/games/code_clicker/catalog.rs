//! Shop catalog: the immutable definitions of everything the player can buy.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::CatalogError;

/// Shop section an item belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Raises lines per click.
    ClickUpgrade,
    /// Programmers: raise lines per second.
    Generator,
    /// Multipliers on programmer output or on cash per line.
    OfficeUpgrade,
}

impl Category {
    /// Shop tab label.
    pub fn label(&self) -> &str {
        match self {
            Category::ClickUpgrade => "Upgrades",
            Category::Generator => "Programmers",
            Category::OfficeUpgrade => "Office",
        }
    }
}

/// What buying one level of an item does.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "delta", rename_all = "snake_case")]
pub enum Effect {
    /// Adds to lines per click.
    LinesPerClick(f64),
    /// Adds to lines per second, per level.
    LinesPerSecond(f64),
    /// Programmer output multiplier of `1 + delta * level`.
    GeneratorMultiplier(f64),
    /// Multiplies cash per line by `1 + delta` on every purchase.
    CashPerLineMultiplier(f64),
}

impl Effect {
    /// Whether this effect is allowed on an item of `category`.
    pub fn belongs_to(&self, category: Category) -> bool {
        matches!(
            (self, category),
            (Effect::LinesPerClick(_), Category::ClickUpgrade)
                | (Effect::LinesPerSecond(_), Category::Generator)
                | (Effect::GeneratorMultiplier(_), Category::OfficeUpgrade)
                | (Effect::CashPerLineMultiplier(_), Category::OfficeUpgrade)
        )
    }

    /// Short per-level description, e.g. "+5 lines/click".
    pub fn summary(&self) -> String {
        match self {
            Effect::LinesPerClick(d) => format!("+{} lines/click", d),
            Effect::LinesPerSecond(d) => format!("+{} lines/s", d),
            Effect::GeneratorMultiplier(d) => format!("programmers +{:.0}%", d * 100.0),
            Effect::CashPerLineMultiplier(d) => format!("cash/line +{:.0}%", d * 100.0),
        }
    }
}

/// A purchasable item definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub base_cost: f64,
    pub cost_multiplier: f64,
    /// Level cap; `None` means unbounded.
    #[serde(default)]
    pub max_level: Option<u32>,
    pub effect: Effect,
}

impl CatalogItem {
    /// Cost of buying the level after `level`: `floor(base * mult^level)`.
    pub fn cost_at(&self, level: u32) -> f64 {
        (self.base_cost * self.cost_multiplier.powf(f64::from(level))).floor()
    }

    /// True when `level` has reached the cap.
    pub fn is_maxed(&self, level: u32) -> bool {
        self.max_level.is_some_and(|max| level >= max)
    }

    fn validate(&self) -> Result<(), CatalogError> {
        if !self.base_cost.is_finite() || self.base_cost <= 0.0 {
            return Err(CatalogError::InvalidBaseCost {
                id: self.id.clone(),
                base_cost: self.base_cost,
            });
        }
        if !self.cost_multiplier.is_finite() || self.cost_multiplier <= 1.0 {
            return Err(CatalogError::InvalidCostMultiplier {
                id: self.id.clone(),
                cost_multiplier: self.cost_multiplier,
            });
        }
        if self.max_level == Some(0) {
            return Err(CatalogError::ZeroMaxLevel(self.id.clone()));
        }
        if !self.effect.belongs_to(self.category) {
            return Err(CatalogError::EffectMismatch {
                id: self.id.clone(),
                category: self.category,
            });
        }
        Ok(())
    }
}

/// Validated, ordered set of catalog items. Declaration order is kept and is
/// the order multipliers are applied in.
#[derive(Clone, Debug)]
pub struct Catalog {
    items: Vec<CatalogItem>,
}

impl Catalog {
    /// Build a catalog, rejecting invalid or duplicate definitions.
    pub fn new(items: Vec<CatalogItem>) -> Result<Self, CatalogError> {
        {
            let mut seen = HashSet::new();
            for item in &items {
                if !seen.insert(item.id.as_str()) {
                    return Err(CatalogError::DuplicateId(item.id.clone()));
                }
                item.validate()?;
            }
        }
        Ok(Self { items })
    }

    /// Parse a JSON array of item definitions.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<CatalogItem> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(items)
    }

    /// The game's built-in shop, validated like any other catalog.
    pub fn standard() -> Result<Self, CatalogError> {
        Self::from_json(STANDARD_CATALOG)
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Items of one section, in declaration order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &CatalogItem> {
        self.items.iter().filter(move |i| i.category == category)
    }
}

const STANDARD_CATALOG: &str = include_str!("catalog.json");

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: &str) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            category: Category::ClickUpgrade,
            base_cost: 10.0,
            cost_multiplier: 1.5,
            max_level: Some(10),
            effect: Effect::LinesPerClick(1.0),
        }
    }

    #[test]
    fn standard_catalog_passes_validation() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.items().len(), 8);
        assert_eq!(catalog.get("intern").unwrap().max_level, None);
        assert_eq!(
            catalog.get("code-optimization").unwrap().effect,
            Effect::CashPerLineMultiplier(0.5)
        );
    }

    #[test]
    fn standard_catalog_sections() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.in_category(Category::ClickUpgrade).count(), 3);
        assert_eq!(catalog.in_category(Category::Generator).count(), 3);
        assert_eq!(catalog.in_category(Category::OfficeUpgrade).count(), 2);
    }

    #[test]
    fn cost_at_follows_geometric_floor() {
        let item = sample("kb");
        assert!((item.cost_at(0) - 10.0).abs() < f64::EPSILON);
        assert!((item.cost_at(1) - 15.0).abs() < f64::EPSILON);
        // 10 * 1.5^2 = 22.5 → 22
        assert!((item.cost_at(2) - 22.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cost_at_high_levels_matches_pow() {
        let catalog = Catalog::standard().unwrap();
        let intern = catalog.get("intern").unwrap();
        assert_eq!(intern.cost_at(157), 40_508_567_778_466.0);
        let coffee = catalog.get("coffee").unwrap();
        assert_eq!(coffee.cost_at(52), 940_026_874_181_146.0);
    }

    #[test]
    fn is_maxed_respects_cap() {
        let mut item = sample("kb");
        assert!(!item.is_maxed(9));
        assert!(item.is_maxed(10));
        item.max_level = None;
        assert!(!item.is_maxed(u32::MAX));
    }

    #[test]
    fn lookup_by_id() {
        let catalog = Catalog::standard().unwrap();
        assert_eq!(catalog.get("intern").unwrap().category, Category::Generator);
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = Catalog::new(vec![sample("a"), sample("a")]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateId("a".into()));
    }

    #[test]
    fn rejects_bad_costs() {
        let mut item = sample("a");
        item.base_cost = 0.0;
        assert!(matches!(
            Catalog::new(vec![item]),
            Err(CatalogError::InvalidBaseCost { .. })
        ));

        let mut item = sample("b");
        item.cost_multiplier = 1.0;
        assert!(matches!(
            Catalog::new(vec![item]),
            Err(CatalogError::InvalidCostMultiplier { .. })
        ));

        let mut item = sample("c");
        item.base_cost = f64::NAN;
        assert!(Catalog::new(vec![item]).is_err());
    }

    #[test]
    fn rejects_zero_max_level() {
        let mut item = sample("a");
        item.max_level = Some(0);
        assert_eq!(
            Catalog::new(vec![item]).unwrap_err(),
            CatalogError::ZeroMaxLevel("a".into())
        );
    }

    #[test]
    fn rejects_effect_in_wrong_category() {
        let mut item = sample("a");
        item.category = Category::Generator;
        assert!(matches!(
            Catalog::new(vec![item]),
            Err(CatalogError::EffectMismatch { .. })
        ));
    }

    #[test]
    fn from_json_parses_and_validates() {
        let json = r#"[
            {
                "id": "intern",
                "title": "Intern",
                "category": "Generator",
                "base_cost": 15.0,
                "cost_multiplier": 1.2,
                "effect": { "kind": "lines_per_second", "delta": 0.5 }
            },
            {
                "id": "monitors",
                "title": "Monitors",
                "category": "OfficeUpgrade",
                "base_cost": 500.0,
                "cost_multiplier": 3.0,
                "max_level": 2,
                "effect": { "kind": "generator_multiplier", "delta": 0.25 }
            }
        ]"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.items().len(), 2);
        assert_eq!(catalog.items()[0].max_level, None);
        assert_eq!(
            catalog.items()[1].effect,
            Effect::GeneratorMultiplier(0.25)
        );
    }

    #[test]
    fn from_json_reports_parse_errors() {
        assert!(matches!(
            Catalog::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn effect_summary_text() {
        assert_eq!(Effect::LinesPerClick(5.0).summary(), "+5 lines/click");
        assert_eq!(Effect::LinesPerSecond(0.5).summary(), "+0.5 lines/s");
        assert_eq!(
            Effect::GeneratorMultiplier(0.25).summary(),
            "programmers +25%"
        );
    }
}
