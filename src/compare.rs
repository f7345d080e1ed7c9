//! Cell-by-cell comparison of two matched rows

use crate::table::Row;
use serde::{Deserialize, Serialize};

/// A column whose normalized values differ between two matched rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDifference {
    pub column: String,
    pub first: String,
    pub second: String,
}

/// Compare every column of `first` that `second` also has.
///
/// Columns present in only one row are skipped; they surface as column-level
/// differences instead. Results follow `first`'s column order and carry the
/// normalized values.
pub fn diff_rows(first: &Row, second: &Row) -> Vec<CellDifference> {
    first
        .iter()
        .filter_map(|(column, value)| {
            let other = second.get(column)?;
            let first_text = value.normalized();
            let second_text = other.normalized();

            (first_text != second_text).then(|| CellDifference {
                column: column.to_string(),
                first: first_text,
                second: second_text,
            })
        })
        .collect()
}
