//! Index-backed lookup of the row matching a key in another table

use crate::index::TableIndex;
use crate::key::{encode_key, EncodedKey, KeyValues};
use crate::table::{Row, Table};

/// Finds rows of one table by key through that table's prebuilt index
pub struct RowMatcher<'a> {
    table: &'a Table,
    index: &'a TableIndex,
}

impl<'a> RowMatcher<'a> {
    pub fn new(table: &'a Table, index: &'a TableIndex) -> Self {
        debug_assert_eq!(
            table.row_count(),
            index.row_count(),
            "index was built from a different table than '{}'",
            table.name()
        );
        Self { table, index }
    }

    /// The row with the given key, or `None` when the table has no such key
    pub fn find_row(&self, key: &KeyValues) -> Option<&'a Row> {
        self.find_encoded(&encode_key(key))
    }

    pub fn find_encoded(&self, key: &EncodedKey) -> Option<&'a Row> {
        self.index
            .position(key)
            .and_then(|position| self.table.row(position))
    }

    pub fn contains(&self, key: &EncodedKey) -> bool {
        self.index.contains(key)
    }
}
