//! Excel workbook reports

use crate::error::{KeydiffError, Result};
use crate::sink::{OutputSheet, OutputTable, TabularSink};
use crate::value::CellValue;
use rust_xlsxwriter::{Format, Table as ExcelTable, TableColumn, Workbook, Worksheet};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Sheet written when a report has no sections at all
pub const EMPTY_REPORT_SHEET: &str = "No differences";

/// Largest integer Excel stores without losing precision
const MAX_EXACT_NUMBER: u64 = 1 << 53;

/// Builds a workbook in memory and saves it on commit
pub struct XlsxSink {
    path: PathBuf,
    workbook: Workbook,
    header_format: Format,
    sheet_names: HashSet<String>,
}

impl XlsxSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            workbook: Workbook::new(),
            header_format: Format::new().set_bold(),
            sheet_names: HashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSink for XlsxSink {
    fn add_sheet(&mut self, sheet: OutputSheet) -> Result<()> {
        if !self.sheet_names.insert(sheet.name.to_lowercase()) {
            return Err(KeydiffError::sink_write(format!(
                "Sheet '{}' already exists",
                sheet.name
            )));
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_table(worksheet, &sheet.table, &self.header_format)?;

        log::debug!(
            "Wrote sheet '{}' ({} rows x {} columns, {})",
            sheet.name,
            sheet.table.row_count(),
            sheet.table.column_count(),
            sheet.table.reference()
        );
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        if self.sheet_names.is_empty() {
            let worksheet = self.workbook.add_worksheet();
            worksheet.set_name(EMPTY_REPORT_SHEET)?;
            self.sheet_names.insert(EMPTY_REPORT_SHEET.to_lowercase());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.workbook.save(&self.path)?;
        log::info!("Saved workbook to {}", self.path.display());
        Ok(())
    }
}

fn write_table(worksheet: &mut Worksheet, table: &OutputTable, header: &Format) -> Result<()> {
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, column_number(col)?, name, header)?;
    }

    for (row, cells) in table.rows().iter().enumerate() {
        let row_number = row_number(row + 1)?;
        for (col, cell) in cells.iter().enumerate() {
            if let Some(value) = cell {
                write_cell(worksheet, row_number, column_number(col)?, value)?;
            }
        }
    }

    if table.row_count() == 0 || table.column_count() == 0 {
        return Ok(());
    }

    // Excel rejects tables whose headers differ only by case
    let mut seen = HashSet::new();
    if !table.columns().iter().all(|c| seen.insert(c.to_lowercase())) {
        log::warn!(
            "Output table '{}' has column names differing only by case; writing plain cells",
            table.name()
        );
        return Ok(());
    }

    let columns: Vec<TableColumn> = table
        .columns()
        .iter()
        .map(|name| TableColumn::new().set_header(name))
        .collect();
    let excel_table = ExcelTable::new()
        .set_name(table.name())
        .set_columns(&columns);

    worksheet.add_table(
        0,
        0,
        row_number(table.row_count())?,
        column_number(table.column_count() - 1)?,
        &excel_table,
    )?;
    Ok(())
}

fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> Result<()> {
    match value {
        CellValue::Empty => {}
        CellValue::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
        CellValue::Integer(i) if i.unsigned_abs() <= MAX_EXACT_NUMBER => {
            worksheet.write_number(row, col, *i as f64)?;
        }
        CellValue::Float(f) if f.is_finite() => {
            worksheet.write_number(row, col, *f)?;
        }
        other => {
            worksheet.write_string(row, col, other.canonical_text())?;
        }
    }
    Ok(())
}

fn row_number(row: usize) -> Result<u32> {
    u32::try_from(row)
        .map_err(|_| KeydiffError::sink_write(format!("Row {} exceeds the worksheet size", row)))
}

fn column_number(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| {
        KeydiffError::sink_write(format!("Column {} exceeds the worksheet size", col))
    })
}
