//! FILENAME: pivot-render/src/lib.rs
//! Pivot rendering subsystem.
//!
//! This crate turns validated pivot results into renderable tables as a
//! standalone module. It depends on `search-types` only for the wire
//! model and validation.
//!
//! Layers:
//! - `tree`: Explicit dimension-path hierarchy (HOW the rows relate)
//! - `view`: Renderable output for the frontend (WHAT we display)
//! - `convert`: Conversion pipeline (HOW we get there)

pub mod convert;
pub mod tree;
pub mod view;

pub use convert::{convert, convert_with, ConvertOptions};
pub use tree::{DimensionNode, DimensionTree, MetricValue};
pub use view::{ColumnHeader, DisplayRow, PivotTable, RowType};
