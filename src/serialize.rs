//! Lays a diff result out as report sheets

use crate::error::{KeydiffError, Result};
use crate::model::{ColumnContent, DiffResult, RowDifference};
use crate::sink::{OutputSheet, OutputTable, TabularSink};
use crate::table::Row;
use crate::value::CellValue;
use std::collections::HashSet;

pub const DIFFERENCES_SHEET: &str = "Differences";
pub const DIFFERENCES_TABLE: &str = "DiffTable";
pub const ROWS_FIRST_SHEET: &str = "Rows unique to first";
pub const ROWS_FIRST_TABLE: &str = "RowsUniqueToFirst";
pub const ROWS_SECOND_SHEET: &str = "Rows unique to second";
pub const ROWS_SECOND_TABLE: &str = "RowsUniqueToSecond";
pub const COLUMNS_FIRST_SHEET: &str = "Columns unique to first";
pub const COLUMNS_FIRST_TABLE: &str = "ColumnsUniqueToFirst";
pub const COLUMNS_SECOND_SHEET: &str = "Columns unique to second";
pub const COLUMNS_SECOND_TABLE: &str = "ColumnsUniqueToSecond";

/// Output column holding the first table's value of `column`
pub fn first_value_column(column: &str) -> String {
    format!("{} * 1", column)
}

/// Output column holding the second table's value of `column`
pub fn second_value_column(column: &str) -> String {
    format!("{} * 2", column)
}

pub struct DiffSerializer;

impl DiffSerializer {
    /// Write every non-empty section of `result` to `sink`, then commit it
    pub fn write(result: &DiffResult, sink: &mut dyn TabularSink) -> Result<()> {
        let sheets = Self::layout(result)?;
        log::info!("Writing {} report sheet(s)", sheets.len());

        for sheet in sheets {
            sink.add_sheet(sheet)?;
        }
        sink.commit()
    }

    /// Sheets for the non-empty sections, in report order
    pub fn layout(result: &DiffResult) -> Result<Vec<OutputSheet>> {
        let mut sheets = Vec::new();

        if !result.row_differences().is_empty() {
            sheets.push(OutputSheet::new(
                DIFFERENCES_SHEET,
                differences_table(result.key_columns(), result.row_differences())?,
            ));
        }

        if !result.rows_only_in_first().is_empty() {
            sheets.push(OutputSheet::new(
                ROWS_FIRST_SHEET,
                unique_rows_table(
                    ROWS_FIRST_TABLE,
                    result.key_columns(),
                    &result.first().columns,
                    result.rows_only_in_first(),
                )?,
            ));
        }

        if !result.rows_only_in_second().is_empty() {
            sheets.push(OutputSheet::new(
                ROWS_SECOND_SHEET,
                unique_rows_table(
                    ROWS_SECOND_TABLE,
                    result.key_columns(),
                    &result.second().columns,
                    result.rows_only_in_second(),
                )?,
            ));
        }

        if !result.columns_only_in_first().is_empty() {
            sheets.push(OutputSheet::new(
                COLUMNS_FIRST_SHEET,
                unique_columns_table(
                    COLUMNS_FIRST_TABLE,
                    result.first_key_columns(),
                    result.columns_only_in_first(),
                )?,
            ));
        }

        if !result.columns_only_in_second().is_empty() {
            sheets.push(OutputSheet::new(
                COLUMNS_SECOND_SHEET,
                unique_columns_table(
                    COLUMNS_SECOND_TABLE,
                    result.second_key_columns(),
                    result.columns_only_in_second(),
                )?,
            ));
        }

        Ok(sheets)
    }
}

/// Key columns first; a `* 1` / `* 2` pair is appended the first time a
/// column shows up in a row difference
fn differences_table(key_columns: &[String], differences: &[RowDifference]) -> Result<OutputTable> {
    let mut table = OutputTable::new(DIFFERENCES_TABLE, key_columns.iter().cloned())?;
    let mut pair_columns: HashSet<String> = HashSet::new();

    for difference in differences {
        table.append_row();
        for (column, value) in &difference.key {
            table.set_last(column, value.clone())?;
        }

        for cell in &difference.cells {
            let first_column = first_value_column(&cell.column);
            let second_column = second_value_column(&cell.column);

            for column in [&first_column, &second_column] {
                if pair_columns.contains(column) {
                    continue;
                }
                if table.has_column(column) {
                    return Err(KeydiffError::sink_write(format!(
                        "Difference column '{}' collides with a key column",
                        column
                    )));
                }
                table.append_column(column.clone())?;
                pair_columns.insert(column.clone());
            }

            table.set_last(&first_column, CellValue::Text(cell.first.clone()))?;
            table.set_last(&second_column, CellValue::Text(cell.second.clone()))?;
        }
    }

    Ok(table)
}

/// Key columns, then the remaining source columns in source order
fn unique_rows_table(
    name: &str,
    key_columns: &[String],
    source_columns: &[String],
    rows: &[Row],
) -> Result<OutputTable> {
    let columns: Vec<&String> = key_columns
        .iter()
        .chain(source_columns.iter().filter(|c| !key_columns.contains(*c)))
        .collect();
    let mut table = OutputTable::new(name, columns.iter().map(|c| c.as_str()))?;

    for row in rows {
        table.append_row();
        for column in &columns {
            if let Some(value) = row.get(column) {
                table.set_last(column, value.clone())?;
            }
        }
    }

    Ok(table)
}

fn unique_columns_table(
    name: &str,
    key_columns: &[ColumnContent],
    unique_columns: &[ColumnContent],
) -> Result<OutputTable> {
    let mut table = OutputTable::new(name, Vec::<String>::new())?;
    for column in key_columns.iter().chain(unique_columns) {
        table.append_column_with_values(column.name.clone(), column.values.clone())?;
    }
    Ok(table)
}
