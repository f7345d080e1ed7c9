//! The immutable result of one comparison run

use crate::compare::CellDifference;
use crate::index::DuplicateKey;
use crate::key::KeyValues;
use crate::table::Row;
use crate::value::CellValue;
use serde::Serialize;

/// Differences between two rows that share a key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDifference {
    pub key: KeyValues,
    pub cells: Vec<CellDifference>,
}

/// A column's name and its values in row order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnContent {
    pub name: String,
    pub values: Vec<CellValue>,
}

/// What the result records about one of the two compared tables
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableProfile {
    pub name: String,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub duplicate_keys: Vec<DuplicateKey>,
}

/// Everything one comparison found. Built once by the orchestrator, read-only after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    pub(crate) key_columns: Vec<String>,
    pub(crate) first: TableProfile,
    pub(crate) second: TableProfile,
    pub(crate) matched_rows: usize,
    pub(crate) row_differences: Vec<RowDifference>,
    pub(crate) rows_only_in_first: Vec<Row>,
    pub(crate) rows_only_in_second: Vec<Row>,
    pub(crate) columns_only_in_first: Vec<ColumnContent>,
    pub(crate) columns_only_in_second: Vec<ColumnContent>,
    pub(crate) first_key_columns: Vec<ColumnContent>,
    pub(crate) second_key_columns: Vec<ColumnContent>,
}

impl DiffResult {
    pub fn key_columns(&self) -> &[String] {
        &self.key_columns
    }

    pub fn first(&self) -> &TableProfile {
        &self.first
    }

    pub fn second(&self) -> &TableProfile {
        &self.second
    }

    /// Rows of the first table whose key was found in the second
    pub fn matched_rows(&self) -> usize {
        self.matched_rows
    }

    pub fn row_differences(&self) -> &[RowDifference] {
        &self.row_differences
    }

    pub fn rows_only_in_first(&self) -> &[Row] {
        &self.rows_only_in_first
    }

    pub fn rows_only_in_second(&self) -> &[Row] {
        &self.rows_only_in_second
    }

    pub fn columns_only_in_first(&self) -> &[ColumnContent] {
        &self.columns_only_in_first
    }

    pub fn columns_only_in_second(&self) -> &[ColumnContent] {
        &self.columns_only_in_second
    }

    /// Full key columns of the first table; empty unless it has unique columns
    pub fn first_key_columns(&self) -> &[ColumnContent] {
        &self.first_key_columns
    }

    /// Full key columns of the second table; empty unless it has unique columns
    pub fn second_key_columns(&self) -> &[ColumnContent] {
        &self.second_key_columns
    }

    /// Columns of the first table that the second also has, in first-table order
    pub fn shared_columns(&self) -> Vec<&str> {
        self.first
            .columns
            .iter()
            .filter(|c| self.second.columns.contains(c))
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.row_differences.is_empty()
            && self.rows_only_in_first.is_empty()
            && self.rows_only_in_second.is_empty()
            && self.columns_only_in_first.is_empty()
            && self.columns_only_in_second.is_empty()
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            first_table: self.first.name.clone(),
            second_table: self.second.name.clone(),
            key_columns: self.key_columns.clone(),
            first_rows: self.first.row_count,
            second_rows: self.second.row_count,
            matched_rows: self.matched_rows,
            rows_with_differences: self.row_differences.len(),
            cell_differences: self.row_differences.iter().map(|d| d.cells.len()).sum(),
            rows_only_in_first: self.rows_only_in_first.len(),
            rows_only_in_second: self.rows_only_in_second.len(),
            columns_only_in_first: column_names(&self.columns_only_in_first),
            columns_only_in_second: column_names(&self.columns_only_in_second),
            duplicate_keys_in_first: self.first.duplicate_keys.len(),
            duplicate_keys_in_second: self.second.duplicate_keys.len(),
        }
    }
}

fn column_names(columns: &[ColumnContent]) -> Vec<String> {
    columns.iter().map(|c| c.name.clone()).collect()
}

/// Counts for reporting a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffSummary {
    pub first_table: String,
    pub second_table: String,
    pub key_columns: Vec<String>,
    pub first_rows: usize,
    pub second_rows: usize,
    pub matched_rows: usize,
    pub rows_with_differences: usize,
    pub cell_differences: usize,
    pub rows_only_in_first: usize,
    pub rows_only_in_second: usize,
    pub columns_only_in_first: Vec<String>,
    pub columns_only_in_second: Vec<String>,
    pub duplicate_keys_in_first: usize,
    pub duplicate_keys_in_second: usize,
}

impl DiffSummary {
    pub fn has_differences(&self) -> bool {
        self.rows_with_differences > 0
            || self.rows_only_in_first > 0
            || self.rows_only_in_second > 0
            || !self.columns_only_in_first.is_empty()
            || !self.columns_only_in_second.is_empty()
    }

    pub fn has_duplicate_keys(&self) -> bool {
        self.duplicate_keys_in_first > 0 || self.duplicate_keys_in_second > 0
    }
}
