//! FILENAME: search-types/src/error.rs

use thiserror::Error;

use crate::result::{RowSource, ValueSource};

/// Errors surfaced while validating or converting a pivot result.
///
/// Key paths are reported joined with `/`; the grand-total row shows as
/// an empty path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PivotError {
    #[error("result has no grand total row (empty key, source non-leaf)")]
    MissingGrandTotal,

    #[error("grand total row carries no rollup value to reconcile the total against")]
    MissingGrandTotalRollup,

    #[error("result total {total} does not match any grand total rollup value {candidates:?}")]
    TotalMismatch { total: f64, candidates: Vec<f64> },

    #[error("leaf row [{key}] has depth {actual} but the result depth is {expected}")]
    LeafDepthMismatch {
        key: String,
        actual: usize,
        expected: usize,
    },

    #[error("non-leaf row [{key}] reaches the full depth {depth}; rollup rows must cover a strict prefix")]
    NonLeafAtFullDepth { key: String, depth: usize },

    #[error("duplicate row key [{key}]")]
    DuplicateRow { key: String },

    #[error("row [{key}] carries a value with an empty key path")]
    EmptyValueKey { key: String },

    #[error("row [{key}] is tagged {row_source:?} but carries a {value_source:?} value")]
    ValueSourceConflict {
        key: String,
        row_source: RowSource,
        value_source: ValueSource,
    },

    #[error("row [{key}], value {metric}: source {value_source:?} is inconsistent with rollup={rollup}")]
    RollupFlagConflict {
        key: String,
        metric: String,
        value_source: ValueSource,
        rollup: bool,
    },

    #[error("row [{key}], metric {metric}: col-leaf values sum to {sum} but the rollup reports {rollup}")]
    RowRollupMismatch {
        key: String,
        metric: String,
        sum: f64,
        rollup: f64,
    },

    #[error("rollup row [{key}], metric {metric}: leaf rows sum to {sum} but the rollup reports {rollup}")]
    RollupMismatch {
        key: String,
        metric: String,
        sum: f64,
        rollup: f64,
    },
}
