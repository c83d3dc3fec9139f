//! FILENAME: search-types/src/result.rs
//! Pivot Result - the serializable wire model.
//!
//! These types mirror the JSON payload the search backend emits for a
//! pivot search type: a flat list of rows, each carrying the ordered
//! dimension-key path it aggregates and a set of metric values tagged by
//! provenance. The serde derives are the shape boundary: missing fields
//! and unknown source tags are rejected during deserialization, never
//! coerced.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use uuid::Uuid;

/// Ordered key path. Dimension paths (country -> city) and metric
/// column paths are both short in practice, so they live inline.
pub type KeyPath = SmallVec<[String; 4]>;

// ============================================================================
// SOURCE TAGS
// ============================================================================

/// Provenance of a row: a full-depth leaf or a partial-depth rollup.
///
/// The zero-depth grand-total row is `NonLeaf` with an empty key path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RowSource {
    /// The key path reaches the full dimension depth of the result.
    Leaf,
    /// An aggregate over a strict prefix of the dimension path.
    NonLeaf,
}

/// Provenance of a single value within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueSource {
    /// A genuine cell for one concrete column-dimension combination.
    ColLeaf,
    /// The rollup total of a leaf row, aggregated across columns.
    RowLeaf,
    /// The rollup total of a non-leaf (ancestor) row.
    RowInner,
}

// ============================================================================
// VALUES
// ============================================================================

/// A single metric value reported for a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotValue {
    /// Metric/column key path: the column-dimension values followed by
    /// the synthetic aggregate column name, e.g. `["TCP", "count()"]`.
    /// Rollup values carry the aggregate name alone.
    pub key: KeyPath,

    /// The aggregated number.
    pub value: f64,

    /// True when this value was aggregated across one or more
    /// column-dimension values rather than read from a single cell.
    pub rollup: bool,

    /// Provenance tag.
    pub source: ValueSource,
}

impl PivotValue {
    /// Creates a genuine cell value for one column-dimension combination.
    pub fn col_leaf<I, S>(key: I, value: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PivotValue {
            key: key.into_iter().map(Into::into).collect(),
            value,
            rollup: false,
            source: ValueSource::ColLeaf,
        }
    }

    /// Creates the rollup total of a leaf row for the given metric.
    pub fn row_leaf<S: Into<String>>(metric: S, value: f64) -> Self {
        PivotValue {
            key: smallvec![metric.into()],
            value,
            rollup: true,
            source: ValueSource::RowLeaf,
        }
    }

    /// Creates the rollup total of a non-leaf row for the given metric.
    pub fn row_inner<S: Into<String>>(metric: S, value: f64) -> Self {
        PivotValue {
            key: smallvec![metric.into()],
            value,
            rollup: true,
            source: ValueSource::RowInner,
        }
    }

    /// The synthetic aggregate column name (last key element).
    pub fn metric(&self) -> Option<&str> {
        self.key.last().map(String::as_str)
    }

    /// The column-dimension values leading up to the metric name.
    pub fn column_path(&self) -> &[String] {
        match self.key.split_last() {
            Some((_, path)) => path,
            None => &[],
        }
    }
}

// ============================================================================
// ROWS
// ============================================================================

/// One aggregation row of a pivot result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    /// Ordered dimension labels from the root to this row. Empty for
    /// the grand-total row.
    pub key: KeyPath,

    /// Metric values reported for this row. Leaf rows may report
    /// several metric columns; rollup rows typically report a single
    /// synthetic aggregate.
    pub values: Vec<PivotValue>,

    /// Provenance tag.
    pub source: RowSource,
}

impl PivotRow {
    /// Creates a full-depth leaf row.
    pub fn leaf<I, S>(key: I, values: Vec<PivotValue>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PivotRow {
            key: key.into_iter().map(Into::into).collect(),
            values,
            source: RowSource::Leaf,
        }
    }

    /// Creates a partial-depth rollup row.
    pub fn non_leaf<I, S>(key: I, values: Vec<PivotValue>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PivotRow {
            key: key.into_iter().map(Into::into).collect(),
            values,
            source: RowSource::NonLeaf,
        }
    }

    /// Creates the zero-depth grand-total row.
    pub fn grand_total(values: Vec<PivotValue>) -> Self {
        PivotRow {
            key: KeyPath::new(),
            values,
            source: RowSource::NonLeaf,
        }
    }

    /// Key-path depth of this row.
    pub fn depth(&self) -> usize {
        self.key.len()
    }

    /// Whether this is the zero-depth grand-total row.
    pub fn is_grand_total(&self) -> bool {
        self.key.is_empty() && self.source == RowSource::NonLeaf
    }

    /// Row-total rollup values (empty column path, `rollup = true`).
    pub fn rollup_values(&self) -> impl Iterator<Item = &PivotValue> {
        self.values
            .iter()
            .filter(|v| v.rollup && v.column_path().is_empty())
    }
}

// ============================================================================
// RESULT
// ============================================================================

/// Discriminator carried in the `type` field of result payloads. Only
/// pivot results are modeled by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Pivot,
}

/// A complete pivot search-type result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotResult {
    /// Identifier the backend assigned to this search-type result.
    pub id: Uuid,

    /// Aggregation rows, in whatever order the backend emitted them.
    /// Rollup rows may precede or follow their constituent leaf rows;
    /// consumers must not treat list order as the hierarchy.
    pub rows: Vec<PivotRow>,

    /// Document total reported for the whole search. Reconciled against
    /// the grand-total row during validation.
    pub total: f64,

    /// Payload discriminator; always `pivot` here.
    #[serde(rename = "type")]
    pub kind: ResultKind,
}

impl PivotResult {
    /// Creates a pivot result from its parts.
    pub fn new(id: Uuid, rows: Vec<PivotRow>, total: f64) -> Self {
        PivotResult {
            id,
            rows,
            total,
            kind: ResultKind::Pivot,
        }
    }

    /// Maximum key-path depth observed across all rows.
    pub fn max_depth(&self) -> usize {
        self.rows.iter().map(|r| r.key.len()).max().unwrap_or(0)
    }

    /// The zero-depth grand-total row, if present.
    pub fn grand_total_row(&self) -> Option<&PivotRow> {
        self.rows.iter().find(|r| r.is_grand_total())
    }
}
