use finlens::ratio::{self, RatioCategory};
use serde_json::Value;

fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn flat_backend_payload_normalizes_fully() {
    let n = ratio::normalize(&fixture("flat_ratios.json"));

    let categories: Vec<RatioCategory> = n.categories.iter().map(|c| c.category).collect();
    assert_eq!(
        categories,
        vec![
            RatioCategory::Liquidity,
            RatioCategory::Profitability,
            RatioCategory::Solvency,
            RatioCategory::Efficiency,
            RatioCategory::Activity,
            RatioCategory::WorkingCapital,
            RatioCategory::Dupont,
        ]
    );

    // Numeric string coerced.
    let liquidity = &n.categories[0];
    assert_eq!(liquidity.entries[2].key, "cash_ratio");
    assert_eq!(liquidity.entries[2].value, Some(0.0037));

    // Null value kept as an Absent entry.
    let wc = n
        .categories
        .iter()
        .find(|c| c.category == RatioCategory::WorkingCapital)
        .unwrap();
    assert_eq!(wc.entries[0].value, None);

    // Side channels split out.
    assert_eq!(n.extracted_numbers.len(), 4);
    assert!(n
        .extracted_numbers
        .iter()
        .any(|(k, v)| k == "total_assets" && *v == 10532.81));
    assert_eq!(n.interpretation_for("current_ratio"), Some("Tight"));
}

#[test]
fn nested_payload_keeps_sections_without_recategorizing() {
    let n = ratio::normalize(&fixture("nested_ratios.json"));

    let categories: Vec<RatioCategory> = n.categories.iter().map(|c| c.category).collect();
    assert_eq!(
        categories,
        vec![
            RatioCategory::Liquidity,
            RatioCategory::Profitability,
            RatioCategory::Solvency,
            RatioCategory::Dupont,
        ]
    );

    // Zero inside a section is a real value.
    assert_eq!(n.categories[0].entries[2].value, Some(0.0));
    // Wrapper object coerces to its first numeric property.
    assert_eq!(n.categories[1].entries[1].value, Some(0.2182));
    // Numeric string inside a section.
    assert_eq!(n.categories[2].entries[0].value, Some(0.52));
}

#[test]
fn renderer_produces_scenario_tables() {
    let payload = serde_json::json!({
        "current_ratio": 2.1,
        "quick_ratio": 0.9,
        "debt_ratio": 0.45,
        "roe": 0.18,
        "asset_turnover": 1.3
    });
    let n = ratio::normalize(&payload);
    let tables = ratio::build_tables(&n, &ratio::ExpandState::default());

    let summary: Vec<(&str, Vec<&str>)> = tables
        .iter()
        .map(|t| {
            (
                t.label.as_str(),
                t.rows.iter().map(|r| r.value.as_str()).collect(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Liquidity Ratios", vec!["2.10", "0.90"]),
            ("Profitability Ratios", vec!["18.00%"]),
            ("Solvency Ratios", vec!["45.00%"]),
            ("Efficiency Ratios", vec!["1.30"]),
        ]
    );
}

#[test]
fn insertion_order_does_not_change_output() {
    let forward: Value = serde_json::from_str(
        r#"{"current_ratio": 2.1, "roe": 0.18, "asset_turnover": 1.3}"#,
    )
    .unwrap();
    let reversed: Value = serde_json::from_str(
        r#"{"asset_turnover": 1.3, "roe": 0.18, "current_ratio": 2.1}"#,
    )
    .unwrap();
    assert_eq!(ratio::normalize(&forward), ratio::normalize(&reversed));
}

#[test]
fn degenerate_payloads_never_panic() {
    for raw in ["null", "\"not json\"", "{}", "[]", "3.14", "false"] {
        let value: Value = serde_json::from_str(raw).unwrap();
        assert!(ratio::normalize(&value).is_empty(), "payload {raw}");
    }
}
