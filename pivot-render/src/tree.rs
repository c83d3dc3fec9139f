//! FILENAME: pivot-render/src/tree.rs
//! Dimension tree - the canonical hierarchy behind a flat row list.
//!
//! The backend emits rows as a flat list with prefix keys and makes no
//! ordering promise: a rollup row may arrive before or after the leaf
//! rows it aggregates. This module rebuilds the explicit tree keyed by
//! dimension path; conversion walks the tree instead of trusting list
//! order.

use rustc_hash::FxHashMap;
use search_types::{KeyPath, PivotResult, PivotValue, RowSource, ValueSource};

/// A value recorded at a tree node, with the metric name split off the
/// column-dimension path.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// Column-dimension values, empty for row totals.
    pub column_path: KeyPath,
    /// Raw aggregate column name, e.g. `count()`.
    pub metric: String,
    pub value: f64,
    pub rollup: bool,
    pub source: ValueSource,
}

impl MetricValue {
    /// Splits a wire value into column path and metric name. Values
    /// with an empty key have no metric to file under and are dropped;
    /// validation reports them before conversion gets here.
    fn from_value(value: &PivotValue) -> Option<MetricValue> {
        let (metric, path) = value.key.split_last()?;
        Some(MetricValue {
            column_path: path.iter().cloned().collect(),
            metric: metric.clone(),
            value: value.value,
            rollup: value.rollup,
            source: value.source,
        })
    }
}

/// A node in the dimension tree. The root is the zero-depth grand
/// total; children are kept in first-seen order.
#[derive(Debug, Clone)]
pub struct DimensionNode {
    /// The dimension label that keys this node under its parent.
    /// Empty for the root.
    pub label: String,

    /// Full path from the root.
    pub path: KeyPath,

    /// Row provenance, when the backend emitted a row for this path.
    /// `None` marks a node materialized only because a deeper row
    /// needed the prefix.
    pub source: Option<RowSource>,

    /// Values reported for this path.
    pub values: Vec<MetricValue>,

    /// Child nodes, first-seen order.
    pub children: Vec<DimensionNode>,

    child_index: FxHashMap<String, usize>,
}

impl DimensionNode {
    fn new(label: String, path: KeyPath) -> Self {
        DimensionNode {
            label,
            path,
            source: None,
            values: Vec::new(),
            children: Vec::new(),
            child_index: FxHashMap::default(),
        }
    }

    /// Depth of this node (root = 0).
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Whether the backend emitted a row for this path.
    pub fn is_explicit(&self) -> bool {
        self.source.is_some()
    }

    /// Looks up a child by its dimension label.
    pub fn child(&self, label: &str) -> Option<&DimensionNode> {
        self.child_index.get(label).map(|&i| &self.children[i])
    }

    fn child_mut(&mut self, label: &str) -> &mut DimensionNode {
        let index = match self.child_index.get(label) {
            Some(&i) => i,
            None => {
                let mut path = self.path.clone();
                path.push(label.to_string());
                let i = self.children.len();
                self.children.push(DimensionNode::new(label.to_string(), path));
                self.child_index.insert(label.to_string(), i);
                i
            }
        };
        &mut self.children[index]
    }
}

/// The rebuilt hierarchy of one pivot result.
#[derive(Debug, Clone)]
pub struct DimensionTree {
    /// Zero-depth root; carries the grand-total row's values.
    pub root: DimensionNode,
    /// Maximum dimension depth observed.
    pub depth: usize,
}

impl DimensionTree {
    /// Builds the tree from a result's flat row list, in any order.
    pub fn build(result: &PivotResult) -> DimensionTree {
        let mut root = DimensionNode::new(String::new(), KeyPath::new());
        let mut depth = 0;

        for row in &result.rows {
            depth = depth.max(row.key.len());
            let mut node = &mut root;
            for label in &row.key {
                node = node.child_mut(label);
            }
            node.source = Some(row.source);
            node.values
                .extend(row.values.iter().filter_map(MetricValue::from_value));
        }

        DimensionTree { root, depth }
    }

    /// Number of nodes with an explicit backing row.
    pub fn explicit_count(&self) -> usize {
        fn count(node: &DimensionNode) -> usize {
            node.children.iter().map(count).sum::<usize>() + usize::from(node.is_explicit())
        }
        count(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_types::{PivotRow, Uuid};

    fn result(rows: Vec<PivotRow>) -> PivotResult {
        PivotResult::new(Uuid::nil(), rows, 0.0)
    }

    #[test]
    fn builds_tree_from_rows_in_any_order() {
        // Rollup rows first, leaves last.
        let result = result(vec![
            PivotRow::grand_total(vec![PivotValue::row_inner("count()", 22.0)]),
            PivotRow::non_leaf(["US"], vec![PivotValue::row_inner("count()", 22.0)]),
            PivotRow::leaf(
                ["US", "Seattle"],
                vec![PivotValue::row_leaf("count()", 18.0)],
            ),
            PivotRow::leaf(
                ["US", "Mountain View"],
                vec![PivotValue::row_leaf("count()", 4.0)],
            ),
        ]);

        let tree = DimensionTree::build(&result);
        assert_eq!(tree.depth, 2);
        assert_eq!(tree.root.source, Some(RowSource::NonLeaf));

        let us = tree.root.child("US").unwrap();
        assert_eq!(us.source, Some(RowSource::NonLeaf));
        assert_eq!(us.children.len(), 2);
        // First-seen order survives.
        assert_eq!(us.children[0].label, "Seattle");
        assert_eq!(us.children[1].label, "Mountain View");

        let seattle = us.child("Seattle").unwrap();
        assert_eq!(seattle.source, Some(RowSource::Leaf));
        assert_eq!(seattle.values.len(), 1);
        assert_eq!(seattle.values[0].metric, "count()");
        assert!(seattle.values[0].column_path.is_empty());
    }

    #[test]
    fn materializes_missing_prefixes_as_implicit_nodes() {
        let result = result(vec![
            PivotRow::leaf(
                ["US", "Seattle"],
                vec![PivotValue::row_leaf("count()", 18.0)],
            ),
            PivotRow::grand_total(vec![PivotValue::row_inner("count()", 18.0)]),
        ]);

        let tree = DimensionTree::build(&result);
        let us = tree.root.child("US").unwrap();
        assert!(!us.is_explicit());
        assert!(us.values.is_empty());
        assert!(us.child("Seattle").unwrap().is_explicit());
        assert_eq!(tree.explicit_count(), 2);
    }

    #[test]
    fn splits_value_keys_into_column_path_and_metric() {
        let result = result(vec![
            PivotRow::leaf(
                ["US"],
                vec![
                    PivotValue::col_leaf(["TCP", "count()"], 18.0),
                    PivotValue::row_leaf("count()", 18.0),
                ],
            ),
            PivotRow::grand_total(vec![PivotValue::row_inner("count()", 18.0)]),
        ]);

        let tree = DimensionTree::build(&result);
        let us = tree.root.child("US").unwrap();
        assert_eq!(us.values[0].column_path, KeyPath::from_iter(["TCP".to_string()]));
        assert_eq!(us.values[0].metric, "count()");
        assert!(!us.values[0].rollup);
        assert!(us.values[1].column_path.is_empty());
        assert!(us.values[1].rollup);
    }
}
