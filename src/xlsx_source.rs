//! Reading named Excel tables out of workbooks

use crate::error::{KeydiffError, Result};
use crate::source::TabularSource;
use crate::table::{Table, TableLocator};
use crate::value::CellValue;
use calamine::{open_workbook, Data, Reader, Xlsx, XlsxError};
use chrono::{NaiveDateTime, NaiveTime};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type Workbook = Xlsx<BufReader<File>>;

/// Whether a path names a workbook this source reads
pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_lowercase().as_str(), "xlsx" | "xlsm"))
}

/// Opens named tables (Insert > Table in Excel) addressed as
/// `book.xlsx#table` or `book.xlsx#sheet.table`
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSource;

impl XlsxSource {
    pub fn new() -> Self {
        Self
    }

    /// Every named table of every sheet, sheets in workbook order and
    /// tables sorted by name within a sheet
    pub fn list_tables(&self, path: &Path) -> Result<Vec<TableLocator>> {
        let locator = TableLocator::file(path);
        let workbook = open(&locator)?;

        let mut tables = Vec::new();
        for sheet in workbook.sheet_names() {
            let mut names: Vec<String> = workbook
                .table_names_in_sheet(&sheet)
                .into_iter()
                .cloned()
                .collect();
            names.sort();
            tables.extend(
                names
                    .into_iter()
                    .map(|table| TableLocator::new(path, Some(sheet.clone()), Some(table))),
            );
        }

        log::debug!("Found {} named tables in {}", tables.len(), path.display());
        Ok(tables)
    }
}

impl TabularSource for XlsxSource {
    fn open_table(&self, locator: &TableLocator) -> Result<Table> {
        let name = locator.table.as_deref().ok_or_else(|| {
            KeydiffError::source_unavailable(
                locator,
                "Workbooks need a table: use path#table or path#sheet.table",
            )
        })?;

        let mut workbook = open(locator)?;

        if let Some(sheet) = locator.sheet.as_deref() {
            let in_sheet = workbook
                .table_names_in_sheet(sheet)
                .iter()
                .any(|t| t.as_str() == name);
            if !in_sheet {
                return Err(KeydiffError::source_unavailable(
                    locator,
                    format!("Table not found: no table '{}' in sheet '{}'", name, sheet),
                ));
            }
        }

        let excel_table = workbook
            .table_by_name(name)
            .map_err(|e| KeydiffError::source_unavailable(locator, format!("Table not found: {}", e)))?;

        let mut table = Table::new(locator.display_name(), excel_table.columns().to_vec())?;
        let width = table.column_names().len();

        for row in excel_table.data().rows() {
            let values = (0..width)
                .map(|i| row.get(i).map(cell_from_data).unwrap_or_default())
                .collect();
            table.push_row(values)?;
        }

        log::debug!(
            "Loaded {} rows x {} columns from sheet '{}' of {}",
            table.row_count(),
            width,
            excel_table.sheet_name(),
            locator.path.display()
        );
        Ok(table)
    }
}

fn open(locator: &TableLocator) -> Result<Workbook> {
    let path = &locator.path;
    if !path.is_file() {
        return Err(KeydiffError::source_unavailable(
            locator,
            format!("File not found: {}", path.display()),
        ));
    }

    let mut workbook: Workbook = open_workbook(path).map_err(|e: XlsxError| {
        KeydiffError::source_unavailable(locator, format!("Cannot read workbook: {}", e))
    })?;
    workbook.load_tables().map_err(|e| {
        KeydiffError::source_unavailable(locator, format!("Cannot read workbook tables: {}", e))
    })?;
    Ok(workbook)
}

fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::Text(format_datetime(datetime)),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        // Error cells read as their Excel text, e.g. #DIV/0!
        other => CellValue::Text(other.to_string()),
    }
}

/// Dates without a time of day render like DuckDB dates, the rest like timestamps
fn format_datetime(datetime: NaiveDateTime) -> String {
    if datetime.time() == NaiveTime::MIN {
        datetime.format("%Y-%m-%d").to_string()
    } else {
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
