//! FILENAME: search-types/src/lib.rs
//! Shared wire types for search-result payloads.
//!
//! This crate models the pivot search-type result emitted by the search
//! backend, plus the validation applied at that boundary. It is consumed
//! by `pivot-render`, which turns validated results into renderable
//! tables.
//!
//! Layers:
//! - `result`: Serializable wire model (what the backend SENDS)
//! - `metric`: Aggregate column key parsing (what a column MEANS)
//! - `validate`: Structural and reconciliation checks (what we ACCEPT)
//! - `error`: Error type surfaced to callers

pub mod error;
pub mod metric;
pub mod result;
pub mod validate;

pub use error::PivotError;
pub use metric::{AggregateFunction, MetricSpec};
pub use result::{KeyPath, PivotResult, PivotRow, PivotValue, ResultKind, RowSource, ValueSource};
pub use validate::{approx_eq, validate, verify_rollups};

// Re-export so downstream crates can name result ids without taking a
// direct uuid dependency.
pub use uuid::Uuid;
