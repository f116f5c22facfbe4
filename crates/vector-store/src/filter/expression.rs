//! Filter expression tree.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use super::value::FilterValue;

/// Comparison operators. Each renders as its OData keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOp {
    /// Returns the OData operator keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "eq",
            ComparisonOp::Ne => "ne",
            ComparisonOp::Gt => "gt",
            ComparisonOp::Ge => "ge",
            ComparisonOp::Lt => "lt",
            ComparisonOp::Le => "le",
        }
    }
}

/// String predicates on a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextOp {
    /// Full-text match, rendered as `search.ismatch`.
    Contains,
    StartsWith,
    EndsWith,
}

/// Collection quantifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    Any,
    All,
}

impl Quantifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Quantifier::Any => "any",
            Quantifier::All => "all",
        }
    }
}

/// Field/value pairs in the order the caller wrote them.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions<V>(pub Vec<(String, V)>);

impl<V> Conditions<V> {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(field, value)| (field.as_str(), value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V, K: Into<String>, T: Into<V>> FromIterator<(K, T)> for Conditions<V> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Conditions(
            iter.into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}

// serde_json's default map type sorts keys, so the pairs are read straight
// off the map to keep the caller's order.
impl<'de, V: Deserialize<'de>> Deserialize<'de> for Conditions<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ConditionsVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for ConditionsVisitor<V> {
            type Value = Conditions<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((field, value)) = map.next_entry::<String, V>()? {
                    pairs.push((field, value));
                }
                Ok(Conditions(pairs))
            }
        }

        deserializer.deserialize_map(ConditionsVisitor(PhantomData))
    }
}

/// A raw lambda predicate over a collection field, e.g.
/// `tags/any(t: t eq 'sale')`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPredicate {
    pub collection_field: String,
    /// Native lambda body, inserted verbatim.
    pub predicate: String,
}

/// A structured filter.
///
/// Built with the constructor functions or deserialized from the JSON record
/// form (`{"eq": {"category": "books"}, "gt": {"price": 10}}`). A record with
/// several populated keys becomes [`FilterExpression::Fields`], whose parts are
/// conjoined.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "FilterRecord")]
pub enum FilterExpression {
    /// Native filter text used verbatim.
    Raw(String),
    And(Vec<FilterExpression>),
    Or(Vec<FilterExpression>),
    Not(Box<FilterExpression>),
    Compare {
        op: ComparisonOp,
        conditions: Conditions<FilterValue>,
    },
    Text {
        op: TextOp,
        conditions: Conditions<String>,
    },
    Quantified {
        quantifier: Quantifier,
        predicate: CollectionPredicate,
    },
    /// Several predicates on one node, joined with `and` without grouping.
    Fields(Vec<FilterExpression>),
}

impl FilterExpression {
    pub fn raw(filter: impl Into<String>) -> Self {
        FilterExpression::Raw(filter.into())
    }

    pub fn and(children: Vec<FilterExpression>) -> Self {
        FilterExpression::And(children)
    }

    pub fn or(children: Vec<FilterExpression>) -> Self {
        FilterExpression::Or(children)
    }

    pub fn negate(inner: FilterExpression) -> Self {
        FilterExpression::Not(Box::new(inner))
    }

    pub fn fields(parts: Vec<FilterExpression>) -> Self {
        FilterExpression::Fields(parts)
    }

    /// Single-field comparison.
    pub fn compare(op: ComparisonOp, field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        FilterExpression::Compare {
            op,
            conditions: Conditions(vec![(field.into(), value.into())]),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(ComparisonOp::Eq, field, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(ComparisonOp::Ne, field, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(ComparisonOp::Gt, field, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(ComparisonOp::Ge, field, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(ComparisonOp::Lt, field, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::compare(ComparisonOp::Le, field, value)
    }

    fn text(op: TextOp, field: impl Into<String>, value: impl Into<String>) -> Self {
        FilterExpression::Text {
            op,
            conditions: Conditions(vec![(field.into(), value.into())]),
        }
    }

    pub fn contains(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::text(TextOp::Contains, field, value)
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::text(TextOp::StartsWith, field, value)
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::text(TextOp::EndsWith, field, value)
    }

    fn quantified(
        quantifier: Quantifier,
        collection_field: impl Into<String>,
        predicate: impl Into<String>,
    ) -> Self {
        FilterExpression::Quantified {
            quantifier,
            predicate: CollectionPredicate {
                collection_field: collection_field.into(),
                predicate: predicate.into(),
            },
        }
    }

    pub fn any(collection_field: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::quantified(Quantifier::Any, collection_field, predicate)
    }

    pub fn all(collection_field: impl Into<String>, predicate: impl Into<String>) -> Self {
        Self::quantified(Quantifier::All, collection_field, predicate)
    }
}

/// JSON record form of a filter node: every key optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct FilterRecord {
    raw: Option<String>,
    and: Option<Vec<FilterExpression>>,
    or: Option<Vec<FilterExpression>>,
    not: Option<Box<FilterExpression>>,
    eq: Option<Conditions<FilterValue>>,
    ne: Option<Conditions<FilterValue>>,
    gt: Option<Conditions<FilterValue>>,
    ge: Option<Conditions<FilterValue>>,
    lt: Option<Conditions<FilterValue>>,
    le: Option<Conditions<FilterValue>>,
    contains: Option<Conditions<String>>,
    starts_with: Option<Conditions<String>>,
    ends_with: Option<Conditions<String>>,
    any: Option<CollectionPredicate>,
    all: Option<CollectionPredicate>,
}

impl From<FilterRecord> for FilterExpression {
    fn from(record: FilterRecord) -> Self {
        if let Some(raw) = record.raw {
            return FilterExpression::Raw(raw);
        }

        let mut parts = Vec::new();
        if let Some(children) = record.and {
            parts.push(FilterExpression::And(children));
        }
        if let Some(children) = record.or {
            parts.push(FilterExpression::Or(children));
        }
        if let Some(child) = record.not {
            parts.push(FilterExpression::Not(child));
        }

        let comparisons = [
            (ComparisonOp::Eq, record.eq),
            (ComparisonOp::Ne, record.ne),
            (ComparisonOp::Gt, record.gt),
            (ComparisonOp::Ge, record.ge),
            (ComparisonOp::Lt, record.lt),
            (ComparisonOp::Le, record.le),
        ];
        for (op, conditions) in comparisons {
            if let Some(conditions) = conditions {
                parts.push(FilterExpression::Compare { op, conditions });
            }
        }

        let text = [
            (TextOp::Contains, record.contains),
            (TextOp::StartsWith, record.starts_with),
            (TextOp::EndsWith, record.ends_with),
        ];
        for (op, conditions) in text {
            if let Some(conditions) = conditions {
                parts.push(FilterExpression::Text { op, conditions });
            }
        }

        if let Some(predicate) = record.any {
            parts.push(FilterExpression::Quantified {
                quantifier: Quantifier::Any,
                predicate,
            });
        }
        if let Some(predicate) = record.all {
            parts.push(FilterExpression::Quantified {
                quantifier: Quantifier::All,
                predicate,
            });
        }

        if parts.len() == 1 {
            parts.remove(0)
        } else {
            FilterExpression::Fields(parts)
        }
    }
}
