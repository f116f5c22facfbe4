//! Rendering of filter expressions as OData `$filter` strings.
//!
//! Rendering is a single recursive pass with no validation: field names,
//! raw filters, and lambda predicates are inserted as given.

use super::expression::{FilterExpression, TextOp};
use super::value::{quote, FilterValue};

/// Translates an optional filter into an OData filter string.
///
/// Returns `None` when there is no filter or when the tree renders to nothing
/// (for example an empty `and`). A top-level [`FilterExpression::Raw`] is
/// returned unchanged.
///
/// # Example
///
/// ```
/// use azure_vector_store_rs::filter::{translate, FilterExpression};
///
/// let filter = FilterExpression::and(vec![
///     FilterExpression::eq("category", "electronics"),
///     FilterExpression::gt("price", 10),
/// ]);
///
/// assert_eq!(
///     translate(Some(&filter)).as_deref(),
///     Some("(category eq 'electronics' and price gt 10)")
/// );
/// ```
pub fn translate(expr: Option<&FilterExpression>) -> Option<String> {
    match expr? {
        FilterExpression::Raw(raw) => Some(raw.clone()),
        expr => {
            let rendered = render(expr);
            (!rendered.is_empty()).then_some(rendered)
        }
    }
}

impl FilterExpression {
    /// Renders this expression; see [`translate`].
    pub fn to_odata(&self) -> Option<String> {
        translate(Some(self))
    }
}

fn render(expr: &FilterExpression) -> String {
    match expr {
        FilterExpression::Raw(raw) => raw.clone(),
        FilterExpression::And(children) => group(children, " and "),
        FilterExpression::Or(children) => group(children, " or "),
        FilterExpression::Not(child) => {
            let inner = render(child);
            if inner.is_empty() {
                inner
            } else {
                format!("not ({inner})")
            }
        }
        FilterExpression::Compare { op, conditions } => {
            join_and(conditions.iter().map(|(field, value)| {
                format!(
                    "{} {} {}",
                    escape_field_name(field),
                    op.keyword(),
                    format_value(value)
                )
            }))
        }
        FilterExpression::Text { op, conditions } => {
            join_and(conditions.iter().map(|(field, value)| {
                let value = quote(value);
                match op {
                    // Filters have no substring operator; use a full-text match
                    // scoped to the field instead.
                    TextOp::Contains => format!("search.ismatch({value}, '{field}')"),
                    TextOp::StartsWith => {
                        format!("startswith({}, {value})", escape_field_name(field))
                    }
                    TextOp::EndsWith => format!("endswith({}, {value})", escape_field_name(field)),
                }
            }))
        }
        FilterExpression::Quantified {
            quantifier,
            predicate,
        } => format!(
            "{}/{}({})",
            escape_field_name(&predicate.collection_field),
            quantifier.keyword(),
            predicate.predicate
        ),
        FilterExpression::Fields(parts) => join_and(parts.iter().map(render)),
    }
}

/// Renders children, drops empty ones, and parenthesizes the joined result.
fn group(children: &[FilterExpression], separator: &str) -> String {
    let rendered: Vec<String> = children
        .iter()
        .map(render)
        .filter(|s| !s.is_empty())
        .collect();
    if rendered.is_empty() {
        String::new()
    } else {
        format!("({})", rendered.join(separator))
    }
}

fn join_and(conditions: impl Iterator<Item = String>) -> String {
    conditions
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Formats a comparison value as an OData literal.
pub fn format_value(value: &FilterValue) -> String {
    value.to_odata_literal()
}

/// Field names are trusted and emitted as-is; callers must pass valid
/// unquoted OData field paths.
pub fn escape_field_name(field: &str) -> &str {
    field
}
