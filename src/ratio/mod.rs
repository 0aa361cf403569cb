//! Ratio payload normalization and categorized rendering.
//!
//! Pipeline: raw backend JSON → shape normalization → per-key categorization
//! and numeric coercion → value formatting → categorized tables.

pub mod coerce;
pub mod format;
pub mod normalize;
pub mod schema;
pub mod table;

pub use coerce::coerce;
pub use format::{format_inr, format_value};
pub use normalize::{CategoryRatios, NormalizedRatios, RatioEntry, normalize};
pub use schema::{RatioCategory, Unit, categorize};
pub use table::{CategoryTable, DisplayRow, ExpandState, build_tables, display_label};
