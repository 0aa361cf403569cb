//! Categorized table construction: turns `NormalizedRatios` into display rows
//! ready for the HTML report or terminal output.
//!
//! Rows are rebuilt from the normalized structure on every render and never
//! mutated in place.

use super::format::format_value;
use super::normalize::NormalizedRatios;
use super::schema::{self, RatioCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
    pub badge: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTable {
    pub category: RatioCategory,
    pub label: String,
    pub icon: String,
    pub description: String,
    pub expanded: bool,
    pub rows: Vec<DisplayRow>,
}

/// Per-category expand/collapse state. Each category toggles independently;
/// only liquidity starts expanded.
#[derive(Debug, Clone)]
pub struct ExpandState {
    expanded: BTreeSet<RatioCategory>,
}

impl Default for ExpandState {
    fn default() -> Self {
        let mut expanded = BTreeSet::new();
        expanded.insert(RatioCategory::Liquidity);
        Self { expanded }
    }
}

impl ExpandState {
    pub fn is_expanded(&self, category: RatioCategory) -> bool {
        self.expanded.contains(&category)
    }

    pub fn toggle(&mut self, category: RatioCategory) {
        if !self.expanded.remove(&category) {
            self.expanded.insert(category);
        }
    }
}

pub fn build_tables(ratios: &NormalizedRatios, state: &ExpandState) -> Vec<CategoryTable> {
    ratios
        .categories
        .iter()
        .map(|cat| CategoryTable {
            category: cat.category,
            label: cat.category.label().to_string(),
            icon: cat.category.icon().to_string(),
            description: cat.category.description().to_string(),
            expanded: state.is_expanded(cat.category),
            rows: cat
                .entries
                .iter()
                .map(|entry| DisplayRow {
                    label: display_label(&entry.key),
                    value: format_value(&entry.key, entry.value),
                    badge: badge_for(ratios, &entry.key, entry.value),
                })
                .collect(),
        })
        .collect()
}

/// The backend's own interpretation label wins over the static benchmark
/// ladder when both exist.
fn badge_for(ratios: &NormalizedRatios, key: &str, value: Option<f64>) -> Option<String> {
    if let Some(label) = ratios.interpretation_for(key) {
        return Some(label.to_string());
    }
    let v = value?;
    schema::lookup(key)
        .and_then(|spec| spec.benchmark)
        .map(|b| b.rate(v).to_string())
}

/// Title-cased label: underscores to spaces, each word capitalized, financial
/// acronyms uppercased.
pub fn display_label(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| match word {
            "roa" => "ROA".to_string(),
            "roe" => "ROE".to_string(),
            "ebitda" => "EBITDA".to_string(),
            "ebit" => "EBIT".to_string(),
            "dupont" => "DuPont".to_string(),
            _ => {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ratio::normalize::normalize;
    use serde_json::json;

    #[test]
    fn labels_are_title_cased_with_acronyms() {
        assert_eq!(display_label("current_ratio"), "Current Ratio");
        assert_eq!(display_label("roe_dupont"), "ROE DuPont");
        assert_eq!(display_label("ebitda_margin"), "EBITDA Margin");
        assert_eq!(display_label("days_sales_outstanding"), "Days Sales Outstanding");
    }

    #[test]
    fn only_liquidity_starts_expanded() {
        let state = ExpandState::default();
        assert!(state.is_expanded(RatioCategory::Liquidity));
        for category in RatioCategory::ALL {
            if category != RatioCategory::Liquidity {
                assert!(!state.is_expanded(category));
            }
        }
    }

    #[test]
    fn toggling_one_category_leaves_others_alone() {
        let mut state = ExpandState::default();
        state.toggle(RatioCategory::Solvency);
        assert!(state.is_expanded(RatioCategory::Solvency));
        assert!(state.is_expanded(RatioCategory::Liquidity));
        state.toggle(RatioCategory::Liquidity);
        assert!(!state.is_expanded(RatioCategory::Liquidity));
        assert!(state.is_expanded(RatioCategory::Solvency));
    }

    #[test]
    fn end_to_end_scenario_rows() {
        let n = normalize(&json!({
            "current_ratio": 2.1, "quick_ratio": 0.9, "debt_ratio": 0.45,
            "roe": 0.18, "asset_turnover": 1.3
        }));
        let tables = build_tables(&n, &ExpandState::default());
        assert_eq!(tables.len(), 4);

        assert_eq!(tables[0].label, "Liquidity Ratios");
        assert!(tables[0].expanded);
        assert_eq!(tables[0].rows[0].value, "2.10");
        assert_eq!(tables[0].rows[1].value, "0.90");

        assert_eq!(tables[1].category, RatioCategory::Profitability);
        assert!(!tables[1].expanded);
        assert_eq!(tables[1].rows[0].value, "18.00%");

        assert_eq!(tables[2].category, RatioCategory::Solvency);
        assert_eq!(tables[2].rows[0].value, "45.00%");

        assert_eq!(tables[3].category, RatioCategory::Efficiency);
        assert_eq!(tables[3].rows[0].value, "1.30");
    }

    #[test]
    fn benchmark_badges_attach() {
        let n = normalize(&json!({"current_ratio": 2.1, "leverage_ratio": 1.0}));
        let tables = build_tables(&n, &ExpandState::default());
        assert_eq!(tables[0].rows[0].badge.as_deref(), Some("Strong"));
        // No ladder for leverage_ratio.
        assert_eq!(tables[1].rows[0].badge, None);
    }

    #[test]
    fn interpretation_label_overrides_benchmark() {
        let n = normalize(&json!({
            "current_ratio": 2.1,
            "interpretation": {"current_ratio": "Solid"}
        }));
        let tables = build_tables(&n, &ExpandState::default());
        assert_eq!(tables[0].rows[0].badge.as_deref(), Some("Solid"));
    }

    #[test]
    fn absent_values_render_na_without_badge() {
        let n = normalize(&json!({"current_ratio": null}));
        let tables = build_tables(&n, &ExpandState::default());
        assert_eq!(tables[0].rows[0].value, "N/A");
        assert_eq!(tables[0].rows[0].badge, None);
    }
}
