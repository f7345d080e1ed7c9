//! One comparison run: load, validate, index, match, collect

use crate::compare::diff_rows;
use crate::error::Result;
use crate::index::{DuplicateKeyPolicy, TableIndex};
use crate::key::{encode_key, KeySpec};
use crate::matcher::RowMatcher;
use crate::model::{ColumnContent, DiffResult, RowDifference, TableProfile};
use crate::progress::ProgressReporter;
use crate::serialize::DiffSerializer;
use crate::sink::{open_sink, ReportFormat};
use crate::source::TabularSource;
use crate::table::{Row, Table, TableLocator};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareOptions {
    pub duplicate_keys: DuplicateKeyPolicy,
    pub show_progress: bool,
}

/// Runs comparisons of tables opened from one source under one key specification
pub struct DiffOrchestrator<'s> {
    source: &'s dyn TabularSource,
    key: KeySpec,
    options: CompareOptions,
}

impl<'s> DiffOrchestrator<'s> {
    pub fn new(source: &'s dyn TabularSource, key: KeySpec, options: CompareOptions) -> Self {
        Self {
            source,
            key,
            options,
        }
    }

    pub fn key(&self) -> &KeySpec {
        &self.key
    }

    /// Load both tables and compare them. Any failure aborts before a result exists.
    pub fn run(&self, first: &TableLocator, second: &TableLocator) -> Result<DiffResult> {
        let mut progress = reporter(&self.options);

        log::info!("Loading {} and {}", first, second);
        progress.begin_phase(&format!("Loading {}...", first.display_name()));
        let first_table = self.source.open_table(first)?;
        progress.begin_phase(&format!("Loading {}...", second.display_name()));
        let second_table = self.source.open_table(second)?;
        progress.finish_phase(&format!(
            "Loaded {} and {} rows",
            first_table.row_count(),
            second_table.row_count()
        ));

        compare_with(first_table, second_table, &self.key, &self.options, &mut progress)
    }

    /// Compare two tables the caller already holds
    pub fn compare(&self, first: Table, second: Table) -> Result<DiffResult> {
        let mut progress = reporter(&self.options);
        compare_with(first, second, &self.key, &self.options, &mut progress)
    }
}

/// Compare two in-memory tables; both are consumed and dropped once the result exists
pub fn compare_tables(
    first: Table,
    second: Table,
    key: KeySpec,
    options: CompareOptions,
) -> Result<DiffResult> {
    let mut progress = reporter(&options);
    compare_with(first, second, &key, &options, &mut progress)
}

fn reporter(options: &CompareOptions) -> ProgressReporter {
    if options.show_progress {
        ProgressReporter::new_for_compare()
    } else {
        ProgressReporter::new_minimal()
    }
}

fn compare_with(
    first: Table,
    second: Table,
    key: &KeySpec,
    options: &CompareOptions,
    progress: &mut ProgressReporter,
) -> Result<DiffResult> {
    key.validate(&first)?;
    key.validate(&second)?;

    progress.begin_phase("Indexing rows...");
    let first_index = TableIndex::build(&first, key, options.duplicate_keys)?;
    let second_index = TableIndex::build(&second, key, options.duplicate_keys)?;
    progress.finish_phase(&format!(
        "Indexed {} and {} keys",
        first_index.len(),
        second_index.len()
    ));

    log::info!(
        "Comparing '{}' ({} rows) with '{}' ({} rows) on [{}]",
        first.name(),
        first.row_count(),
        second.name(),
        second.row_count(),
        key.columns().join(", ")
    );

    let matched = match_first_rows(&first, &second, &second_index, key, progress)?;
    let rows_only_in_second = unmatched_second_rows(&second, &first_index, key, progress)?;

    let columns_only_in_first = unique_columns(&first, &second);
    let columns_only_in_second = unique_columns(&second, &first);
    let first_key_columns = key_columns_if(&first, key, !columns_only_in_first.is_empty());
    let second_key_columns = key_columns_if(&second, key, !columns_only_in_second.is_empty());

    let result = DiffResult {
        key_columns: key.columns().to_vec(),
        first: profile(&first, &first_index),
        second: profile(&second, &second_index),
        matched_rows: matched.matched_rows,
        row_differences: matched.row_differences,
        rows_only_in_first: matched.rows_only_in_first,
        rows_only_in_second,
        columns_only_in_first,
        columns_only_in_second,
        first_key_columns,
        second_key_columns,
    };

    drop(first);
    drop(second);

    let summary = result.summary();
    log::info!(
        "{} matched rows, {} with differences, {} only in first, {} only in second",
        summary.matched_rows,
        summary.rows_with_differences,
        summary.rows_only_in_first,
        summary.rows_only_in_second
    );
    if !summary.columns_only_in_first.is_empty() || !summary.columns_only_in_second.is_empty() {
        log::info!(
            "Columns only in first: [{}]; only in second: [{}]",
            summary.columns_only_in_first.join(", "),
            summary.columns_only_in_second.join(", ")
        );
    }

    Ok(result)
}

struct FirstPass {
    matched_rows: usize,
    row_differences: Vec<RowDifference>,
    rows_only_in_first: Vec<Row>,
}

/// Walk the first table in source order, matching each row against the second
fn match_first_rows(
    first: &Table,
    second: &Table,
    second_index: &TableIndex,
    key: &KeySpec,
    progress: &mut ProgressReporter,
) -> Result<FirstPass> {
    let matcher = RowMatcher::new(second, second_index);
    let mut pass = FirstPass {
        matched_rows: 0,
        row_differences: Vec::new(),
        rows_only_in_first: Vec::new(),
    };

    progress.begin_rows(first.row_count() as u64, "Comparing rows");
    for row in first.rows() {
        let key_values = key.extract(row, first.name())?;

        match matcher.find_row(&key_values) {
            None => pass.rows_only_in_first.push(row.clone()),
            Some(other) => {
                pass.matched_rows += 1;
                let cells = diff_rows(row, other);
                if !cells.is_empty() {
                    pass.row_differences.push(RowDifference {
                        key: key_values,
                        cells,
                    });
                }
            }
        }
        progress.inc_rows(1);
    }
    progress.finish_rows("Rows compared");

    Ok(pass)
}

/// Rows of the second table whose key the first table lacks, in source order
fn unmatched_second_rows(
    second: &Table,
    first_index: &TableIndex,
    key: &KeySpec,
    progress: &mut ProgressReporter,
) -> Result<Vec<Row>> {
    let mut unmatched = Vec::new();

    progress.begin_rows(second.row_count() as u64, "Scanning second table");
    for row in second.rows() {
        let encoded = encode_key(&key.extract(row, second.name())?);
        if !first_index.contains(&encoded) {
            unmatched.push(row.clone());
        }
        progress.inc_rows(1);
    }
    progress.finish_rows("Second table scanned");

    Ok(unmatched)
}

/// Columns of `table` that `other` lacks, with all their values
fn unique_columns(table: &Table, other: &Table) -> Vec<ColumnContent> {
    table
        .column_names()
        .iter()
        .filter(|column| !other.has_column(column))
        .map(|column| column_content(table, column))
        .collect()
}

fn key_columns_if(table: &Table, key: &KeySpec, wanted: bool) -> Vec<ColumnContent> {
    if !wanted {
        return Vec::new();
    }
    key.columns()
        .iter()
        .map(|column| column_content(table, column))
        .collect()
}

fn column_content(table: &Table, column: &str) -> ColumnContent {
    ColumnContent {
        name: column.to_string(),
        values: table.column_values(column).unwrap_or_default(),
    }
}

fn profile(table: &Table, index: &TableIndex) -> TableProfile {
    TableProfile {
        name: table.name().to_string(),
        columns: table.column_names().to_vec(),
        row_count: table.row_count(),
        duplicate_keys: index.duplicates().to_vec(),
    }
}

/// A full comparison: two tables, a key and where the report goes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub first: TableLocator,
    pub second: TableLocator,
    pub output: PathBuf,
    pub key_columns: Vec<String>,
    #[serde(default)]
    pub format: ReportFormat,
}

impl ComparisonRequest {
    pub fn key_spec(&self) -> Result<KeySpec> {
        KeySpec::new(&self.key_columns)
    }

    /// Run the comparison and write its report. Nothing is written when the
    /// comparison fails.
    pub fn execute(
        &self,
        source: &dyn TabularSource,
        options: CompareOptions,
    ) -> Result<DiffResult> {
        let key = self.key_spec()?;
        let result = DiffOrchestrator::new(source, key, options).run(&self.first, &self.second)?;

        let mut sink = open_sink(&self.output, self.format);
        DiffSerializer::write(&result, sink.as_mut())?;

        Ok(result)
    }
}
