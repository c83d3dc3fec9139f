//! FILENAME: tests/common/mod.rs
//! Fixtures for pivot-render integration tests.

use search_types::{PivotResult, PivotRow, PivotValue, Uuid};

pub fn fixture_id() -> Uuid {
    Uuid::parse_str("f1f53b2d-12a8-4e2c-8c34-5fbe2a9c1e4d").unwrap()
}

/// Traffic-by-location fixture shaped as the backend emits it: leaf
/// rows first, each country rollup after its cities, grand total last.
pub struct TrafficFixture;

impl TrafficFixture {
    /// The windowed variant: the 539 document total covers the whole
    /// search while the rows only cover the top groups (49 documents).
    pub fn windowed() -> PivotResult {
        Self::build(539.0, 539.0)
    }

    /// A self-consistent variant whose grand total matches the rows.
    pub fn consistent() -> PivotResult {
        Self::build(49.0, 49.0)
    }

    /// Same rows as `consistent`, emitted rollups-first instead of the
    /// usual leaves-first order.
    pub fn rollups_first() -> PivotResult {
        let rows = Self::rows(49.0);
        let reordered: Vec<PivotRow> = [8, 2, 5, 7, 0, 1, 3, 4, 6]
            .iter()
            .map(|&i| rows[i].clone())
            .collect();
        PivotResult::new(fixture_id(), reordered, 49.0)
    }

    fn build(grand: f64, total: f64) -> PivotResult {
        PivotResult::new(fixture_id(), Self::rows(grand), total)
    }

    fn rows(grand: f64) -> Vec<PivotRow> {
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
                    PivotValue::col_leaf(["TCP", "count()"], 2.0),
                    PivotValue::col_leaf(["UDP", "count()"], 2.0),
                    PivotValue::row_leaf("count()", 4.0),
                ],
            ),
            PivotRow::non_leaf(["US"], vec![PivotValue::row_inner("count()", 22.0)]),
            PivotRow::leaf(
                ["DE", "Berlin"],
                vec![
                    PivotValue::col_leaf(["TCP", "count()"], 19.0),
                    PivotValue::row_leaf("count()", 19.0),
                ],
            ),
            PivotRow::leaf(
                ["DE", "Bochum"],
                vec![
                    PivotValue::col_leaf(["UDP", "count()"], 2.0),
                    PivotValue::row_leaf("count()", 2.0),
                ],
            ),
            PivotRow::non_leaf(["DE"], vec![PivotValue::row_inner("count()", 21.0)]),
            PivotRow::leaf(
                ["AU", "Riverton"],
                vec![
                    PivotValue::col_leaf(["TCP", "count()"], 6.0),
                    PivotValue::row_leaf("count()", 6.0),
                ],
            ),
            PivotRow::non_leaf(["AU"], vec![PivotValue::row_inner("count()", 6.0)]),
            PivotRow::grand_total(vec![PivotValue::row_inner("count()", grand)]),
        ]
    }
}
