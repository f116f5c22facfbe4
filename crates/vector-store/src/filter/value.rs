//! Scalar values used in filter comparisons and their OData literal form.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Number;

/// A scalar compared against a field.
///
/// On the JSON wire, dates are written as `{"$date": "<rfc3339>"}` so they can
/// be told apart from plain strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Date {
        #[serde(rename = "$date")]
        at: DateTime<Utc>,
    },
}

impl FilterValue {
    /// Renders the value as an OData literal.
    ///
    /// Strings are single-quoted with embedded quotes doubled, dates become
    /// unquoted ISO-8601 timestamps, and numbers use their plain decimal form.
    pub fn to_odata_literal(&self) -> String {
        match self {
            FilterValue::Null => "null".to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Number(n) => number_literal(n),
            FilterValue::String(s) => quote(s),
            FilterValue::Date { at } => at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Integers print as-is; floats use `f64` display, so `10.0` renders as `10`
/// and large magnitudes are written out without an exponent.
fn number_literal(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

/// Wraps a string in single quotes, doubling every embedded quote.
pub(crate) fn quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        FilterValue::Number(value.into())
    }
}

/// Non-finite floats have no OData literal and become `null`.
impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value)
            .map(FilterValue::Number)
            .unwrap_or(FilterValue::Null)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(at: DateTime<Utc>) -> Self {
        FilterValue::Date { at }
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}
