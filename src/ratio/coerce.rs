//! Numeric coercion of heterogeneous backend values.
//!
//! The backend mixes numbers, numeric strings with thousands separators,
//! single-element arrays and `{value: ...}`-style wrapper objects in the same
//! positions. `coerce` flattens all of them to `Option<f64>`, where `None` is
//! the Absent sentinel.
//!
//! A coerced value of exactly `0` is a real zero (for example zero debt), not
//! Absent. The two states are only ever distinguished through the `Option`.

use serde_json::Value;

pub fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Null | Value::Bool(_) => None,
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_string(s),
        Value::Array(items) => items.first().and_then(coerce),
        // First property that coerces wins; key order is the object's own.
        Value::Object(map) => map.values().find_map(coerce),
    }
}

fn parse_numeric_string(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('₹')
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}
