//! FILENAME: search-types/src/metric.rs
//! Aggregate column keys.
//!
//! The last element of a value's key path is a synthetic column name of
//! the form `function(field)`: `count()`, `avg(took_ms)`. This module
//! parses those names into a typed form so renderers can label columns
//! without re-parsing strings.

use serde::{Deserialize, Serialize};

/// Aggregation functions the backend reports.
///
/// Functions this crate does not know parse as `Other` instead of
/// failing conversion; the raw column name always survives alongside
/// the parsed form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Avg,
    Cardinality,
    Count,
    Max,
    Min,
    Sum,
    Other(String),
}

impl AggregateFunction {
    fn from_name(name: &str) -> Self {
        match name {
            "avg" => AggregateFunction::Avg,
            "card" | "cardinality" => AggregateFunction::Cardinality,
            "count" => AggregateFunction::Count,
            "max" => AggregateFunction::Max,
            "min" => AggregateFunction::Min,
            "sum" => AggregateFunction::Sum,
            other => AggregateFunction::Other(other.to_string()),
        }
    }

    /// Wire name of the function.
    pub fn name(&self) -> &str {
        match self {
            AggregateFunction::Avg => "avg",
            AggregateFunction::Cardinality => "card",
            AggregateFunction::Count => "count",
            AggregateFunction::Max => "max",
            AggregateFunction::Min => "min",
            AggregateFunction::Sum => "sum",
            AggregateFunction::Other(name) => name,
        }
    }
}

/// A parsed aggregate column name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricSpec {
    /// The aggregation function.
    pub function: AggregateFunction,

    /// The field the function ran on; `None` for field-less aggregates
    /// such as `count()`.
    pub field: Option<String>,
}

impl MetricSpec {
    /// Parses a synthetic column name.
    ///
    /// Names without a well-formed `(...)` suffix are kept whole as an
    /// `Other` function with no field.
    pub fn parse(name: &str) -> MetricSpec {
        let malformed = || MetricSpec {
            function: AggregateFunction::Other(name.to_string()),
            field: None,
        };

        let Some(open) = name.find('(') else {
            return malformed();
        };
        let Some(inner) = name[open + 1..].strip_suffix(')') else {
            return malformed();
        };

        MetricSpec {
            function: AggregateFunction::from_name(&name[..open]),
            field: if inner.is_empty() {
                None
            } else {
                Some(inner.to_string())
            },
        }
    }

    /// Canonical column-name form of the spec, e.g. `avg(took_ms)`.
    ///
    /// Bare `Other` names (parsed from input without parentheses) stay
    /// bare.
    pub fn column_name(&self) -> String {
        match (&self.function, &self.field) {
            (AggregateFunction::Other(name), None) => name.clone(),
            (function, None) => format!("{}()", function.name()),
            (function, Some(field)) => format!("{}({})", function.name(), field),
        }
    }
}
