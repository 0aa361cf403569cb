//! Shape normalization of raw ratio payloads.
//!
//! The backend returns the same logical data in several shapes: a flat
//! key → value map, a category-nested map (`liquidity_ratios`, ...), and
//! either wrapped in `{response: ...}` / `{ratios: ..., status: ...}`
//! envelopes. `normalize` classifies the shape once and converts to a single
//! `NormalizedRatios` with a fixed category order, instead of shape-sniffing
//! at every display site.
//!
//! Normalization never fails: malformed input degrades to an empty result.

use super::coerce::coerce;
use super::schema::{self, RatioCategory};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRatios {
    /// Populated categories in fixed display order.
    pub categories: Vec<CategoryRatios>,
    /// Raw input amounts from the `_extracted_numbers` side channel.
    #[serde(default)]
    pub extracted_numbers: Vec<(String, f64)>,
    /// Qualitative labels from the `interpretation` side channel.
    #[serde(default)]
    pub interpretations: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRatios {
    pub category: RatioCategory,
    pub entries: Vec<RatioEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioEntry {
    pub key: String,
    /// `None` is the Absent sentinel; `Some(0.0)` is a genuine zero.
    pub value: Option<f64>,
}

impl NormalizedRatios {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn interpretation_for(&self, key: &str) -> Option<&str> {
        self.interpretations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Payload shape after envelope unwrapping.
enum Shape<'a> {
    CategoryNested(&'a Map<String, Value>),
    Flat(&'a Map<String, Value>),
    Malformed,
}

pub fn normalize(payload: &Value) -> NormalizedRatios {
    let unwrapped = unwrap_envelopes(payload);

    let mut out = NormalizedRatios::default();
    let obj = match unwrapped.as_object() {
        Some(obj) => obj,
        None => return out,
    };

    collect_side_channels(obj, &mut out);

    match classify(obj) {
        Shape::CategoryNested(obj) => {
            for category in RatioCategory::ALL {
                let section = nested_section(obj, category);
                let entries: Vec<RatioEntry> = section
                    .map(|sec| {
                        sec.iter()
                            .map(|(key, value)| RatioEntry {
                                key: key.clone(),
                                value: coerce(value),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                if !entries.is_empty() {
                    out.categories.push(CategoryRatios { category, entries });
                }
            }
        }
        Shape::Flat(obj) => {
            for category in RatioCategory::ALL {
                // Schema order, not input order: two payloads with the same
                // pairs in different insertion order normalize identically.
                let entries: Vec<RatioEntry> = schema::category_keys(category)
                    .filter_map(|spec| {
                        obj.get(spec.key).map(|value| RatioEntry {
                            key: spec.key.to_string(),
                            value: coerce(value),
                        })
                    })
                    .collect();
                if !entries.is_empty() {
                    out.categories.push(CategoryRatios { category, entries });
                }
            }
        }
        Shape::Malformed => {}
    }

    out
}

/// Strip backend envelopes: `{response: X}` and `{ratios: X, status: ...}`,
/// applied to a fixpoint so doubly-wrapped payloads and already-unwrapped
/// payloads both land in the same place.
fn unwrap_envelopes(payload: &Value) -> &Value {
    let mut current = payload;
    // Bounded: real payloads nest at most two envelopes deep.
    for _ in 0..4 {
        let Some(obj) = current.as_object() else {
            break;
        };
        if let Some(inner) = obj.get("response").filter(|v| v.is_object()) {
            current = inner;
            continue;
        }
        if obj.contains_key("status") {
            if let Some(inner) = obj.get("ratios").filter(|v| v.is_object()) {
                current = inner;
                continue;
            }
        }
        break;
    }
    current
}

fn classify<'a>(obj: &'a Map<String, Value>) -> Shape<'a> {
    let nested = RatioCategory::ALL
        .iter()
        .any(|c| nested_section(obj, *c).is_some());
    if nested {
        Shape::CategoryNested(obj)
    } else if obj.is_empty() {
        Shape::Malformed
    } else {
        Shape::Flat(obj)
    }
}

fn nested_section(obj: &Map<String, Value>, category: RatioCategory) -> Option<&Map<String, Value>> {
    if let Some(sec) = obj.get(category.nested_key()).and_then(Value::as_object) {
        return Some(sec);
    }
    // Some backend revisions emit `dupont_ratios` instead of `dupont_analysis`.
    if category == RatioCategory::Dupont {
        return obj.get("dupont_ratios").and_then(Value::as_object);
    }
    None
}

fn collect_side_channels(obj: &Map<String, Value>, out: &mut NormalizedRatios) {
    if let Some(numbers) = obj.get("_extracted_numbers").and_then(Value::as_object) {
        out.extracted_numbers = numbers
            .iter()
            .filter_map(|(k, v)| coerce(v).map(|n| (k.clone(), n)))
            .collect();
    }
    if let Some(labels) = obj.get("interpretation").and_then(Value::as_object) {
        out.interpretations = labels
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect();
    }
}
