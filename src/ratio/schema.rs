//! The fixed ratio schema: which keys exist, which category each belongs to,
//! how each is formatted, and the benchmark ladder behind its status badge.
//!
//! The key set is small and versioned with the backend, so membership is a
//! static table rather than runtime heuristics.

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RatioCategory {
    Liquidity,
    Profitability,
    Solvency,
    Efficiency,
    Activity,
    WorkingCapital,
    Dupont,
}

impl RatioCategory {
    /// Fixed display order: liquidity → profitability → solvency → efficiency
    /// → activity → working_capital → dupont.
    pub const ALL: [RatioCategory; 7] = [
        RatioCategory::Liquidity,
        RatioCategory::Profitability,
        RatioCategory::Solvency,
        RatioCategory::Efficiency,
        RatioCategory::Activity,
        RatioCategory::WorkingCapital,
        RatioCategory::Dupont,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Liquidity => "liquidity",
            Self::Profitability => "profitability",
            Self::Solvency => "solvency",
            Self::Efficiency => "efficiency",
            Self::Activity => "activity",
            Self::WorkingCapital => "working_capital",
            Self::Dupont => "dupont",
        }
    }

    /// Property name carrying this category in already-nested payloads,
    /// e.g. `liquidity_ratios`.
    pub fn nested_key(&self) -> &'static str {
        match self {
            Self::Liquidity => "liquidity_ratios",
            Self::Profitability => "profitability_ratios",
            Self::Solvency => "solvency_ratios",
            Self::Efficiency => "efficiency_ratios",
            Self::Activity => "activity_ratios",
            Self::WorkingCapital => "working_capital_ratios",
            Self::Dupont => "dupont_analysis",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Liquidity => "Liquidity Ratios",
            Self::Profitability => "Profitability Ratios",
            Self::Solvency => "Solvency Ratios",
            Self::Efficiency => "Efficiency Ratios",
            Self::Activity => "Activity Ratios",
            Self::WorkingCapital => "Working Capital",
            Self::Dupont => "DuPont Analysis",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Liquidity => "💧",
            Self::Profitability => "📈",
            Self::Solvency => "🏛️",
            Self::Efficiency => "⚙️",
            Self::Activity => "🔄",
            Self::WorkingCapital => "💼",
            Self::Dupont => "🧮",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Liquidity => "Ability to meet short-term obligations",
            Self::Profitability => "Earnings relative to revenue, assets and equity",
            Self::Solvency => "Long-term debt burden and coverage",
            Self::Efficiency => "How effectively assets generate revenue",
            Self::Activity => "Turnover and collection cycles",
            Self::WorkingCapital => "Operating cash against current liabilities",
            Self::Dupont => "ROE decomposed into margin, turnover and leverage",
        }
    }
}

/// How a ratio value renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// Fraction shown as a percentage (`0.1523` → `15.23%`).
    Percentage,
    /// Plain multiple, two decimals.
    Ratio,
    /// Absolute amount in Indian Rupees, lakh/crore grouping.
    Currency,
}

/// Qualitative badge thresholds, taken from the backend's interpretation
/// tables. `HigherIsBetter` picks the first threshold the value meets or
/// exceeds; `LowerIsBetter` the first it stays at or under.
#[derive(Debug, Clone, Copy)]
pub struct Benchmark {
    pub kind: BenchmarkKind,
    pub thresholds: &'static [(f64, &'static str)],
    pub fallback: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchmarkKind {
    HigherIsBetter,
    LowerIsBetter,
}

impl Benchmark {
    pub fn rate(&self, value: f64) -> &'static str {
        for &(threshold, label) in self.thresholds {
            let hit = match self.kind {
                BenchmarkKind::HigherIsBetter => value >= threshold,
                BenchmarkKind::LowerIsBetter => value <= threshold,
            };
            if hit {
                return label;
            }
        }
        self.fallback
    }
}

pub struct RatioSpec {
    pub key: &'static str,
    pub category: RatioCategory,
    pub unit: Unit,
    pub benchmark: Option<Benchmark>,
}

const fn higher(
    thresholds: &'static [(f64, &'static str)],
    fallback: &'static str,
) -> Option<Benchmark> {
    Some(Benchmark {
        kind: BenchmarkKind::HigherIsBetter,
        thresholds,
        fallback,
    })
}

const fn lower(
    thresholds: &'static [(f64, &'static str)],
    fallback: &'static str,
) -> Option<Benchmark> {
    Some(Benchmark {
        kind: BenchmarkKind::LowerIsBetter,
        thresholds,
        fallback,
    })
}

/// Every known ratio key, in fixed intra-category display order.
pub static SPECS: &[RatioSpec] = &[
    // Liquidity
    RatioSpec {
        key: "current_ratio",
        category: RatioCategory::Liquidity,
        unit: Unit::Ratio,
        benchmark: higher(
            &[(2.0, "Strong"), (1.5, "Adequate"), (1.0, "Tight")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "quick_ratio",
        category: RatioCategory::Liquidity,
        unit: Unit::Ratio,
        benchmark: higher(&[(1.0, "Strong"), (0.8, "Adequate")], "Weak"),
    },
    RatioSpec {
        key: "cash_ratio",
        category: RatioCategory::Liquidity,
        unit: Unit::Ratio,
        benchmark: higher(&[(0.2, "Good"), (0.1, "Fair")], "Weak"),
    },
    RatioSpec {
        key: "working_capital",
        category: RatioCategory::Liquidity,
        unit: Unit::Currency,
        benchmark: None,
    },
    RatioSpec {
        key: "working_capital_ratio",
        category: RatioCategory::Liquidity,
        unit: Unit::Ratio,
        benchmark: None,
    },
    // Profitability
    RatioSpec {
        key: "gross_margin",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.40, "Excellent"), (0.30, "Good"), (0.20, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "gross_profit",
        category: RatioCategory::Profitability,
        unit: Unit::Currency,
        benchmark: None,
    },
    RatioSpec {
        key: "operating_margin",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.15, "Excellent"), (0.10, "Good"), (0.05, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "operating_profit",
        category: RatioCategory::Profitability,
        unit: Unit::Currency,
        benchmark: None,
    },
    RatioSpec {
        key: "net_margin",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.10, "Excellent"), (0.07, "Good"), (0.03, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "net_profit",
        category: RatioCategory::Profitability,
        unit: Unit::Currency,
        benchmark: None,
    },
    RatioSpec {
        key: "roa",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.10, "Excellent"), (0.05, "Good"), (0.02, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "roe",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.20, "Excellent"), (0.15, "Good"), (0.10, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "ebitda_margin",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.20, "Excellent"), (0.15, "Good"), (0.10, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "ebit_margin",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.15, "Excellent"), (0.10, "Good"), (0.05, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "return_on_sales",
        category: RatioCategory::Profitability,
        unit: Unit::Percentage,
        benchmark: None,
    },
    // Solvency
    RatioSpec {
        key: "debt_to_equity",
        category: RatioCategory::Solvency,
        unit: Unit::Ratio,
        benchmark: lower(&[(1.0, "Conservative"), (2.0, "Moderate")], "Aggressive"),
    },
    RatioSpec {
        key: "debt_ratio",
        category: RatioCategory::Solvency,
        unit: Unit::Percentage,
        benchmark: lower(&[(0.4, "Low Risk"), (0.6, "Moderate Risk")], "High Risk"),
    },
    RatioSpec {
        key: "equity_ratio",
        category: RatioCategory::Solvency,
        unit: Unit::Percentage,
        benchmark: higher(&[(0.5, "Strong"), (0.3, "Fair")], "Weak"),
    },
    RatioSpec {
        key: "interest_coverage",
        category: RatioCategory::Solvency,
        unit: Unit::Ratio,
        benchmark: higher(&[(2.5, "Strong"), (1.5, "Adequate")], "Weak"),
    },
    RatioSpec {
        key: "debt_service_coverage",
        category: RatioCategory::Solvency,
        unit: Unit::Ratio,
        benchmark: higher(&[(2.5, "Strong"), (1.5, "Adequate")], "Weak"),
    },
    RatioSpec {
        key: "leverage_ratio",
        category: RatioCategory::Solvency,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "long_term_debt_to_equity",
        category: RatioCategory::Solvency,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "assets_to_liabilities",
        category: RatioCategory::Solvency,
        unit: Unit::Ratio,
        benchmark: None,
    },
    // Efficiency
    RatioSpec {
        key: "asset_turnover",
        category: RatioCategory::Efficiency,
        unit: Unit::Ratio,
        benchmark: higher(
            &[(2.0, "Excellent"), (1.5, "Good"), (1.0, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "current_assets_ratio",
        category: RatioCategory::Efficiency,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "fixed_assets_ratio",
        category: RatioCategory::Efficiency,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "receivables_to_current_assets",
        category: RatioCategory::Efficiency,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "asset_base",
        category: RatioCategory::Efficiency,
        unit: Unit::Currency,
        benchmark: None,
    },
    // Activity
    RatioSpec {
        key: "fixed_asset_turnover",
        category: RatioCategory::Activity,
        unit: Unit::Ratio,
        benchmark: higher(&[(1.5, "Good"), (1.0, "Fair")], "Weak"),
    },
    RatioSpec {
        key: "current_asset_turnover",
        category: RatioCategory::Activity,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "receivables_turnover",
        category: RatioCategory::Activity,
        unit: Unit::Ratio,
        benchmark: higher(
            &[(12.0, "Excellent"), (6.0, "Good"), (3.0, "Fair")],
            "Weak",
        ),
    },
    RatioSpec {
        key: "days_sales_outstanding",
        category: RatioCategory::Activity,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "inventory_turnover",
        category: RatioCategory::Activity,
        unit: Unit::Ratio,
        benchmark: None,
    },
    // Working capital
    RatioSpec {
        key: "operating_cash_ratio",
        category: RatioCategory::WorkingCapital,
        unit: Unit::Ratio,
        benchmark: None,
    },
    // DuPont
    RatioSpec {
        key: "net_profit_margin",
        category: RatioCategory::Dupont,
        unit: Unit::Percentage,
        benchmark: None,
    },
    RatioSpec {
        key: "equity_multiplier",
        category: RatioCategory::Dupont,
        unit: Unit::Ratio,
        benchmark: None,
    },
    RatioSpec {
        key: "roe_dupont",
        category: RatioCategory::Dupont,
        unit: Unit::Percentage,
        benchmark: higher(
            &[(0.20, "Excellent"), (0.15, "Good"), (0.10, "Fair")],
            "Weak",
        ),
    },
];

/// Envelope and side-channel keys that are never ratios.
pub static RESERVED_KEYS: &[&str] = &[
    "_extracted_numbers",
    "ratios",
    "ratios_grouped",
    "interpretation",
    "summary",
    "status",
    "balance_sheet_summary",
];

pub fn lookup(key: &str) -> Option<&'static RatioSpec> {
    SPECS.iter().find(|s| s.key == key)
}

/// Category for a flat ratio key; `None` for unknown keys, which are dropped
/// from categorized display.
pub fn categorize(key: &str) -> Option<RatioCategory> {
    lookup(key).map(|s| s.category)
}

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Known keys of one category, in fixed display order.
pub fn category_keys(category: RatioCategory) -> impl Iterator<Item = &'static RatioSpec> {
    SPECS.iter().filter(move |s| s.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_maps_to_its_category() {
        let expected: &[(&str, RatioCategory)] = &[
            ("current_ratio", RatioCategory::Liquidity),
            ("quick_ratio", RatioCategory::Liquidity),
            ("cash_ratio", RatioCategory::Liquidity),
            ("working_capital", RatioCategory::Liquidity),
            ("working_capital_ratio", RatioCategory::Liquidity),
            ("gross_margin", RatioCategory::Profitability),
            ("gross_profit", RatioCategory::Profitability),
            ("operating_margin", RatioCategory::Profitability),
            ("operating_profit", RatioCategory::Profitability),
            ("net_margin", RatioCategory::Profitability),
            ("net_profit", RatioCategory::Profitability),
            ("roa", RatioCategory::Profitability),
            ("roe", RatioCategory::Profitability),
            ("ebitda_margin", RatioCategory::Profitability),
            ("ebit_margin", RatioCategory::Profitability),
            ("return_on_sales", RatioCategory::Profitability),
            ("debt_to_equity", RatioCategory::Solvency),
            ("debt_ratio", RatioCategory::Solvency),
            ("equity_ratio", RatioCategory::Solvency),
            ("interest_coverage", RatioCategory::Solvency),
            ("debt_service_coverage", RatioCategory::Solvency),
            ("leverage_ratio", RatioCategory::Solvency),
            ("long_term_debt_to_equity", RatioCategory::Solvency),
            ("assets_to_liabilities", RatioCategory::Solvency),
            ("asset_turnover", RatioCategory::Efficiency),
            ("current_assets_ratio", RatioCategory::Efficiency),
            ("fixed_assets_ratio", RatioCategory::Efficiency),
            ("receivables_to_current_assets", RatioCategory::Efficiency),
            ("asset_base", RatioCategory::Efficiency),
            ("fixed_asset_turnover", RatioCategory::Activity),
            ("current_asset_turnover", RatioCategory::Activity),
            ("receivables_turnover", RatioCategory::Activity),
            ("days_sales_outstanding", RatioCategory::Activity),
            ("inventory_turnover", RatioCategory::Activity),
            ("operating_cash_ratio", RatioCategory::WorkingCapital),
            ("net_profit_margin", RatioCategory::Dupont),
            ("equity_multiplier", RatioCategory::Dupont),
            ("roe_dupont", RatioCategory::Dupont),
        ];
        assert_eq!(expected.len(), SPECS.len());
        for (key, category) in expected {
            assert_eq!(categorize(key), Some(*category), "key {key}");
        }
    }

    #[test]
    fn unknown_keys_are_uncategorized() {
        assert_eq!(categorize("total_assets"), None);
        assert_eq!(categorize("nonsense"), None);
        assert_eq!(categorize(""), None);
    }

    #[test]
    fn reserved_keys_are_not_ratios() {
        for key in RESERVED_KEYS {
            assert!(is_reserved(key));
            assert_eq!(categorize(key), None);
        }
    }

    #[test]
    fn category_key_sets_do_not_overlap() {
        let mut seen = std::collections::HashSet::new();
        for spec in SPECS {
            assert!(seen.insert(spec.key), "duplicate key {}", spec.key);
        }
    }

    #[test]
    fn benchmark_ladders_rate_both_directions() {
        let cr = lookup("current_ratio").unwrap().benchmark.unwrap();
        assert_eq!(cr.rate(2.5), "Strong");
        assert_eq!(cr.rate(1.6), "Adequate");
        assert_eq!(cr.rate(1.2), "Tight");
        assert_eq!(cr.rate(0.4), "Weak");

        let de = lookup("debt_to_equity").unwrap().benchmark.unwrap();
        assert_eq!(de.rate(0.5), "Conservative");
        assert_eq!(de.rate(1.5), "Moderate");
        assert_eq!(de.rate(3.0), "Aggressive");
    }

    #[test]
    fn nested_keys_cover_all_categories() {
        for category in RatioCategory::ALL {
            assert!(category.nested_key().ends_with("_ratios") || category == RatioCategory::Dupont);
        }
        assert_eq!(RatioCategory::Dupont.nested_key(), "dupont_analysis");
    }
}
