//! FILENAME: pivot-render/src/view.rs
//! Pivot table view - renderable output for the frontend.
//!
//! A flattened list of display rows with resolved indentation, plus the
//! resolved column set. Hierarchy metadata (parent/children indices)
//! rides along so the renderer can group and fold rows without
//! re-deriving the tree.

use serde::{Deserialize, Serialize};
use search_types::{KeyPath, MetricSpec, PivotRow, PivotValue, RowSource, Uuid, ValueSource};

// ============================================================================
// ROW AND COLUMN TYPES
// ============================================================================

/// The type of a display row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowType {
    /// Full-depth data row.
    Data,
    /// Partial-depth rollup (subtotal) row.
    Rollup,
    /// The zero-depth grand-total row.
    GrandTotal,
}

/// One column of the rendered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHeader {
    /// Column-dimension values, empty for row-total columns.
    pub column_path: KeyPath,

    /// Raw aggregate column name, e.g. `count()`.
    pub metric: String,

    /// Parsed form of `metric`, for labeling.
    pub spec: MetricSpec,

    /// True for row-total columns aggregated across the column
    /// dimension.
    pub rollup: bool,
}

impl ColumnHeader {
    /// Header label: the column-dimension values followed by the metric
    /// name, e.g. `TCP count()`. Row-total columns show the metric
    /// alone.
    pub fn label(&self) -> String {
        if self.column_path.is_empty() {
            self.metric.clone()
        } else {
            format!("{} {}", self.column_path.join(" "), self.metric)
        }
    }
}

/// One row of the rendered table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRow {
    /// Dimension path, empty for the grand total.
    pub path: KeyPath,

    /// Label for the row-header column: the innermost dimension value,
    /// or "Grand Total" for the zero-depth row.
    pub label: String,

    /// Indent level for compact rendering (= path depth).
    pub indent: usize,

    /// The type of this row.
    pub row_type: RowType,

    /// True when the backend emitted no row for this path and it exists
    /// only as a grouping prefix of deeper rows.
    pub synthetic: bool,

    /// Index of the rollup row this row is grouped under, if any.
    pub parent: Option<usize>,

    /// Indices of the rows grouped under this one.
    pub children: Vec<usize>,

    /// One cell per table column; `None` where the backend reported no
    /// value for that combination.
    pub cells: Vec<Option<f64>>,
}

// ============================================================================
// MAIN VIEW STRUCT
// ============================================================================

/// The complete rendered table for one pivot result.
/// This is what gets handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Identifier of the result this table was converted from.
    pub id: Uuid,

    /// Resolved column set: genuine column-dimension/metric
    /// combinations first (first-seen order), row-total columns last.
    pub columns: Vec<ColumnHeader>,

    /// Display rows, depth-first with rollup rows after their children
    /// and the grand total last.
    pub rows: Vec<DisplayRow>,

    /// Document total echoed from the validated result.
    pub total: f64,

    /// Full dimension depth of the result.
    pub depth: usize,
}

impl PivotTable {
    /// Number of display rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Cell lookup by row and column index.
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(col).copied().flatten())
    }

    /// Finds a display row by its dimension path.
    pub fn row_by_path(&self, path: &[&str]) -> Option<&DisplayRow> {
        self.rows
            .iter()
            .find(|r| r.path.iter().map(String::as_str).eq(path.iter().copied()))
    }

    /// Finds a column index by path, metric, and rollup flag.
    pub fn column_index(&self, column_path: &[&str], metric: &str, rollup: bool) -> Option<usize> {
        self.columns.iter().position(|c| {
            c.rollup == rollup
                && c.metric == metric
                && c.column_path
                    .iter()
                    .map(String::as_str)
                    .eq(column_path.iter().copied())
        })
    }

    /// Reconstructs the flat wire rows this table was converted from,
    /// order aside. Synthetic rows are skipped; they never existed in
    /// the input.
    pub fn source_rows(&self) -> Vec<PivotRow> {
        self.rows
            .iter()
            .filter(|row| !row.synthetic)
            .map(|row| self.source_row(row))
            .collect()
    }

    fn source_row(&self, row: &DisplayRow) -> PivotRow {
        let source = match row.row_type {
            RowType::Data => RowSource::Leaf,
            RowType::Rollup | RowType::GrandTotal => RowSource::NonLeaf,
        };

        let values = row
            .cells
            .iter()
            .zip(&self.columns)
            .filter_map(|(cell, column)| {
                let value = (*cell)?;
                let mut key = column.column_path.clone();
                key.push(column.metric.clone());
                let value_source = if !column.rollup {
                    ValueSource::ColLeaf
                } else if source == RowSource::Leaf {
                    ValueSource::RowLeaf
                } else {
                    ValueSource::RowInner
                };
                Some(PivotValue {
                    key,
                    value,
                    rollup: column.rollup,
                    source: value_source,
                })
            })
            .collect();

        PivotRow {
            key: row.path.clone(),
            values,
            source,
        }
    }
}
