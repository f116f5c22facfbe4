//! Structured filters and their translation to OData filter strings.
//!
//! A [`FilterExpression`] is a small tree of logical connectives,
//! comparisons, string predicates, collection quantifiers, and a raw escape
//! hatch. [`translate`] renders it as the `$filter` syntax understood by the
//! search service.
//!
//! # Rendering
//!
//! | Expression | Output |
//! |---|---|
//! | `eq("category", "books")` | `category eq 'books'` |
//! | `and([a, b])` | `(a and b)` |
//! | `or([a, b])` | `(a or b)` |
//! | `negate(a)` | `not (a)` |
//! | `contains("description", "adventure")` | `search.ismatch('adventure', 'description')` |
//! | `starts_with("title", "The")` | `startswith(title, 'The')` |
//! | `any("tags", "t: t eq 'sale'")` | `tags/any(t: t eq 'sale')` |
//! | `raw("x eq 1")` | `x eq 1` |
//!
//! # Example
//!
//! ```
//! use azure_vector_store_rs::filter::{translate, FilterExpression};
//!
//! let filter: FilterExpression = serde_json::from_str(
//!     r#"{"not": {"eq": {"category": "electronics"}}}"#,
//! ).unwrap();
//!
//! assert_eq!(
//!     translate(Some(&filter)).as_deref(),
//!     Some("not (category eq 'electronics')")
//! );
//! ```

mod expression;
mod translate;
mod value;

pub use expression::{
    CollectionPredicate, ComparisonOp, Conditions, FilterExpression, Quantifier, TextOp,
};
pub use translate::{escape_field_name, format_value, translate};
pub use value::FilterValue;
