//! FILENAME: search-types/src/validate.rs
//! Structural and reconciliation checks for pivot results.
//!
//! Validation runs in two tiers. The structural tier rejects results
//! whose tags, depths, or per-row sums are internally inconsistent; the
//! converter always runs it. The cross-row tier (`verify_rollups`)
//! additionally reconciles every rollup row against the leaf rows it
//! aggregates. Well-formed backends can still fail the cross-row tier:
//! the document total covers the whole search while a windowed result
//! carries only the top N rows, so callers opt into it.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::PivotError;
use crate::result::{PivotResult, PivotRow, RowSource, ValueSource};

/// Relative-epsilon comparison used for all rollup reconciliation.
pub fn approx_eq(a: f64, b: f64) -> bool {
    let scale = a.abs().max(b.abs()).max(1.0);
    (a - b).abs() <= scale * 1e-9
}

fn key_display(key: &[String]) -> String {
    key.join("/")
}

// ============================================================================
// STRUCTURAL TIER
// ============================================================================

/// Checks a result's internal consistency: source tags against key
/// depths, rollup flags against value provenance, per-row cell sums
/// against row rollups, and the document total against the grand-total
/// row.
pub fn validate(result: &PivotResult) -> Result<(), PivotError> {
    let grand_total = result
        .grand_total_row()
        .ok_or(PivotError::MissingGrandTotal)?;
    let depth = result.max_depth();

    let mut seen: FxHashSet<&[String]> = FxHashSet::default();
    for row in &result.rows {
        if !seen.insert(row.key.as_slice()) {
            return Err(PivotError::DuplicateRow {
                key: key_display(&row.key),
            });
        }
        check_row_depth(row, depth)?;
        check_row_values(row)?;
    }

    let candidates: Vec<f64> = grand_total.rollup_values().map(|v| v.value).collect();
    if candidates.is_empty() {
        return Err(PivotError::MissingGrandTotalRollup);
    }
    if !candidates.iter().any(|&v| approx_eq(v, result.total)) {
        return Err(PivotError::TotalMismatch {
            total: result.total,
            candidates,
        });
    }

    Ok(())
}

fn check_row_depth(row: &PivotRow, depth: usize) -> Result<(), PivotError> {
    match row.source {
        RowSource::Leaf => {
            if row.key.len() != depth {
                return Err(PivotError::LeafDepthMismatch {
                    key: key_display(&row.key),
                    actual: row.key.len(),
                    expected: depth,
                });
            }
        }
        RowSource::NonLeaf => {
            // The grand-total row is the whole result when no dimension
            // exists at all (depth 0).
            if row.key.len() >= depth && !(row.key.is_empty() && depth == 0) {
                return Err(PivotError::NonLeafAtFullDepth {
                    key: key_display(&row.key),
                    depth: row.key.len(),
                });
            }
        }
    }
    Ok(())
}

fn check_row_values(row: &PivotRow) -> Result<(), PivotError> {
    let mut cell_sums: FxHashMap<&str, f64> = FxHashMap::default();
    let mut rollups: FxHashMap<&str, f64> = FxHashMap::default();

    for value in &row.values {
        let Some(metric) = value.metric() else {
            return Err(PivotError::EmptyValueKey {
                key: key_display(&row.key),
            });
        };

        match (row.source, value.source) {
            (RowSource::Leaf, ValueSource::RowInner)
            | (RowSource::NonLeaf, ValueSource::RowLeaf) => {
                return Err(PivotError::ValueSourceConflict {
                    key: key_display(&row.key),
                    row_source: row.source,
                    value_source: value.source,
                });
            }
            _ => {}
        }

        let expect_rollup = value.source != ValueSource::ColLeaf;
        if value.rollup != expect_rollup {
            return Err(PivotError::RollupFlagConflict {
                key: key_display(&row.key),
                metric: metric.to_string(),
                value_source: value.source,
                rollup: value.rollup,
            });
        }

        if value.rollup {
            // Only row totals participate in the per-row check; partial
            // column rollups carry a column path.
            if value.column_path().is_empty() {
                rollups.insert(metric, value.value);
            }
        } else {
            *cell_sums.entry(metric).or_insert(0.0) += value.value;
        }
    }

    for (metric, sum) in &cell_sums {
        if let Some(rollup) = rollups.get(metric) {
            if !approx_eq(*sum, *rollup) {
                return Err(PivotError::RowRollupMismatch {
                    key: key_display(&row.key),
                    metric: metric.to_string(),
                    sum: *sum,
                    rollup: *rollup,
                });
            }
        }
    }

    Ok(())
}

// ============================================================================
// CROSS-ROW TIER
// ============================================================================

/// Reconciles every rollup row against the leaf rows beneath it: the
/// row's rollup value for a metric must equal the sum of that metric's
/// rollup values across all leaf rows sharing the row's key prefix.
///
/// Metrics no leaf row reports are skipped; there is nothing to
/// reconcile them against.
pub fn verify_rollups(result: &PivotResult) -> Result<(), PivotError> {
    let leaves: Vec<&PivotRow> = result
        .rows
        .iter()
        .filter(|r| r.source == RowSource::Leaf)
        .collect();

    for row in &result.rows {
        if row.source != RowSource::NonLeaf {
            continue;
        }
        for value in row.rollup_values() {
            let Some(metric) = value.metric() else {
                continue;
            };

            let mut sum = 0.0;
            let mut contributions = 0usize;
            for leaf in &leaves {
                if !leaf.key.starts_with(row.key.as_slice()) {
                    continue;
                }
                for leaf_value in leaf.rollup_values() {
                    if leaf_value.metric() == Some(metric) {
                        sum += leaf_value.value;
                        contributions += 1;
                    }
                }
            }

            if contributions == 0 {
                continue;
            }
            if !approx_eq(sum, value.value) {
                return Err(PivotError::RollupMismatch {
                    key: key_display(&row.key),
                    metric: metric.to_string(),
                    sum,
                    rollup: value.value,
                });
            }
        }
    }

    Ok(())
}
