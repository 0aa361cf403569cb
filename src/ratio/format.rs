//! Value formatting for display.
//!
//! Known keys carry an explicit `Unit` in the schema table. The substring
//! heuristic only backs up unknown keys carried as-is inside already-nested
//! payloads.

use super::schema::{self, Unit};

/// Render a ratio value for display. `None` (Absent) renders as `N/A`.
pub fn format_value(key: &str, value: Option<f64>) -> String {
    let Some(v) = value else {
        return "N/A".into();
    };
    match unit_for_key(key) {
        Unit::Percentage => format!("{:.2}%", v * 100.0),
        Unit::Ratio => format!("{v:.2}"),
        Unit::Currency => format_inr(v),
    }
}

fn unit_for_key(key: &str) -> Unit {
    if let Some(spec) = schema::lookup(key) {
        return spec.unit;
    }
    // Fallback heuristic for keys outside the schema.
    if key.contains("margin") || key.contains("quality") {
        Unit::Percentage
    } else if key.contains("ratio") || key.contains("turnover") || key.contains("coverage") {
        Unit::Ratio
    } else if key.contains("assets")
        || key.contains("liabilit")
        || key.contains("equity")
        || key.contains("income")
        || key.contains("profit")
        || key.contains("capital")
    {
        Unit::Currency
    } else {
        Unit::Ratio
    }
}

/// Indian Rupee amount with `en-IN` grouping: the last three digits form one
/// group, every group before that has two digits (lakh/crore convention).
/// Zero fractional digits.
pub fn format_inr(value: f64) -> String {
    let negative = value < 0.0;
    let rounded = value.abs().round();
    // Beyond integer precision of f64 the grouping is meaningless anyway.
    let n = if rounded >= u64::MAX as f64 {
        u64::MAX
    } else {
        rounded as u64
    };
    let digits = n.to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<&str> = Vec::new();
        let bytes = head.as_bytes();
        let mut start = 0;
        let first = bytes.len() % 2;
        if first == 1 {
            parts.push(&head[..1]);
            start = 1;
        }
        while start < head.len() {
            parts.push(&head[start..start + 2]);
            start += 2;
        }
        parts.push(tail);
        parts.join(",")
    };

    if negative {
        format!("-₹{grouped}")
    } else {
        format!("₹{grouped}")
    }
}
