//! FILENAME: pivot-render/src/convert.rs
//! Result -> table conversion pipeline.
//!
//! Algorithm:
//! 1. Run structural validation (and, on request, the cross-row tier)
//! 2. Rebuild the explicit dimension tree from the flat row list
//! 3. Resolve the column set across all nodes
//! 4. Flatten the tree depth-first, children before their rollup row
//!    and the grand total last, projecting each node onto the columns

use log::{debug, warn};
use rustc_hash::FxHashSet;
use search_types::{
    validate, verify_rollups, KeyPath, MetricSpec, PivotError, PivotResult, RowSource,
};

use crate::tree::{DimensionNode, DimensionTree};
use crate::view::{ColumnHeader, DisplayRow, PivotTable, RowType};

/// Options for [`convert_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Fail conversion when rollup rows do not reconcile with the leaf
    /// rows beneath them. Off by default: the backend reports document
    /// totals over the whole search, which legitimately exceed the rows
    /// a windowed result carries.
    pub strict_rollups: bool,
}

/// Converts a pivot result with default options.
pub fn convert(result: &PivotResult) -> Result<PivotTable, PivotError> {
    convert_with(result, ConvertOptions::default())
}

/// Converts a validated pivot result into a renderable table.
pub fn convert_with(
    result: &PivotResult,
    options: ConvertOptions,
) -> Result<PivotTable, PivotError> {
    validate(result)?;
    if options.strict_rollups {
        verify_rollups(result)?;
    } else if let Err(err) = verify_rollups(result) {
        warn!("pivot result {}: rollups do not reconcile: {err}", result.id);
    }

    let tree = DimensionTree::build(result);
    let columns = resolve_columns(&tree);
    let mut rows = Vec::with_capacity(result.rows.len());
    flatten(&tree.root, &columns, &mut rows);

    debug!(
        "converted pivot result {} into {} rows x {} columns",
        result.id,
        rows.len(),
        columns.len()
    );

    Ok(PivotTable {
        id: result.id,
        columns,
        rows,
        total: result.total,
        depth: tree.depth,
    })
}

// ============================================================================
// COLUMN RESOLUTION
// ============================================================================

/// Collects the union of (column path, metric, rollup) combinations
/// across the tree: genuine cell columns in first-seen order, row-total
/// columns appended last.
fn resolve_columns(tree: &DimensionTree) -> Vec<ColumnHeader> {
    let mut seen: FxHashSet<(KeyPath, String, bool)> = FxHashSet::default();
    let mut cells = Vec::new();
    let mut totals = Vec::new();
    collect_columns(&tree.root, &mut seen, &mut cells, &mut totals);
    cells.append(&mut totals);
    cells
}

fn collect_columns(
    node: &DimensionNode,
    seen: &mut FxHashSet<(KeyPath, String, bool)>,
    cells: &mut Vec<ColumnHeader>,
    totals: &mut Vec<ColumnHeader>,
) {
    for value in &node.values {
        let key = (value.column_path.clone(), value.metric.clone(), value.rollup);
        if !seen.insert(key) {
            continue;
        }
        let header = ColumnHeader {
            column_path: value.column_path.clone(),
            metric: value.metric.clone(),
            spec: MetricSpec::parse(&value.metric),
            rollup: value.rollup,
        };
        if value.rollup {
            totals.push(header);
        } else {
            cells.push(header);
        }
    }
    for child in &node.children {
        collect_columns(child, seen, cells, totals);
    }
}

// ============================================================================
// FLATTENING
// ============================================================================

/// Emits a node's subtree into `rows` and returns the node's own row
/// index. Children land before their rollup row, so the grand-total
/// root lands last.
fn flatten(node: &DimensionNode, columns: &[ColumnHeader], rows: &mut Vec<DisplayRow>) -> usize {
    let child_indices: Vec<usize> = node
        .children
        .iter()
        .map(|child| flatten(child, columns, rows))
        .collect();

    let index = rows.len();
    rows.push(DisplayRow {
        path: node.path.clone(),
        label: if node.path.is_empty() {
            "Grand Total".to_string()
        } else {
            node.label.clone()
        },
        indent: node.depth(),
        row_type: row_type_for(node),
        synthetic: !node.is_explicit(),
        parent: None,
        children: child_indices.clone(),
        cells: project_cells(node, columns),
    });

    for child in child_indices {
        rows[child].parent = Some(index);
    }
    index
}

fn row_type_for(node: &DimensionNode) -> RowType {
    if node.path.is_empty() {
        RowType::GrandTotal
    } else if node.source == Some(RowSource::Leaf) {
        RowType::Data
    } else {
        RowType::Rollup
    }
}

fn project_cells(node: &DimensionNode, columns: &[ColumnHeader]) -> Vec<Option<f64>> {
    columns
        .iter()
        .map(|column| {
            node.values
                .iter()
                .find(|v| {
                    v.rollup == column.rollup
                        && v.metric == column.metric
                        && v.column_path == column.column_path
                })
                .map(|v| v.value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::{PivotRow, PivotValue, Uuid};

    fn two_city_result() -> PivotResult {
        PivotResult::new(
            Uuid::nil(),
            vec![
                PivotRow::leaf(
                    ["US", "Seattle"],
                    vec![
                        PivotValue::col_leaf(["TCP", "count()"], 18.0),
                        PivotValue::row_leaf("count()", 18.0),
                    ],
                ),
                PivotRow::leaf(
                    ["US", "Mountain View"],
                    vec![
                        PivotValue::col_leaf(["UDP", "count()"], 4.0),
                        PivotValue::row_leaf("count()", 4.0),
                    ],
                ),
                PivotRow::non_leaf(["US"], vec![PivotValue::row_inner("count()", 22.0)]),
                PivotRow::grand_total(vec![PivotValue::row_inner("count()", 22.0)]),
            ],
            22.0,
        )
    }

    #[test]
    fn orders_rows_children_first_grand_total_last() {
        let table = convert(&two_city_result()).unwrap();
        let labels: Vec<&str> = table.rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Seattle", "Mountain View", "US", "Grand Total"]);
        assert_eq!(table.rows[3].row_type, RowType::GrandTotal);
        assert_eq!(table.rows[2].row_type, RowType::Rollup);
        assert_eq!(table.rows[0].row_type, RowType::Data);
    }

    #[test]
    fn orders_cell_columns_before_total_columns() {
        let table = convert(&two_city_result()).unwrap();
        let labels: Vec<String> = table.columns.iter().map(|c| c.label()).collect();
        assert_eq!(labels, ["TCP count()", "UDP count()", "count()"]);
        assert!(table.columns[2].rollup);
    }

    #[test]
    fn links_parents_and_children() {
        let table = convert(&two_city_result()).unwrap();
        let us = table.row_by_path(&["US"]).unwrap();
        assert_eq!(us.children, vec![0, 1]);
        assert_eq!(table.rows[0].parent, Some(2));
        assert_eq!(table.rows[1].parent, Some(2));
        assert_eq!(us.parent, Some(3));
        assert_eq!(table.rows[3].parent, None);
    }

    #[test]
    fn strict_rollups_rejects_inconsistent_subtotal() {
        let mut result = two_city_result();
        result.rows[2].values = vec![PivotValue::row_inner("count()", 23.0)];
        // Structurally fine, so lenient conversion still succeeds.
        convert(&result).unwrap();
        let err = convert_with(&result, ConvertOptions { strict_rollups: true }).unwrap_err();
        assert!(matches!(err, PivotError::RollupMismatch { .. }));
    }

    #[test]
    fn rejects_structurally_broken_result_before_building() {
        let mut result = two_city_result();
        result.rows.pop();
        assert_eq!(convert(&result).unwrap_err(), PivotError::MissingGrandTotal);
    }

    #[test]
    fn converts_grand_total_only_result() {
        let result = PivotResult::new(
            Uuid::nil(),
            vec![PivotRow::grand_total(vec![PivotValue::row_inner(
                "count()",
                539.0,
            )])],
            539.0,
        );
        let table = convert(&result).unwrap();
        assert_eq!(table.depth, 0);
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.rows[0].label, "Grand Total");
        assert_eq!(table.value(0, 0), Some(539.0));
    }

    #[test]
    fn marks_missing_prefix_rows_as_synthetic() {
        let result = PivotResult::new(
            Uuid::nil(),
            vec![
                PivotRow::leaf(
                    ["US", "Seattle"],
                    vec![PivotValue::row_leaf("count()", 18.0)],
                ),
                PivotRow::grand_total(vec![PivotValue::row_inner("count()", 18.0)]),
            ],
            18.0,
        );
        let table = convert(&result).unwrap();
        let us = table.row_by_path(&["US"]).unwrap();
        assert!(us.synthetic);
        assert_eq!(us.row_type, RowType::Rollup);
        assert!(us.cells.iter().all(Option::is_none));
        assert!(!table.row_by_path(&["US", "Seattle"]).unwrap().synthetic);
    }
}
