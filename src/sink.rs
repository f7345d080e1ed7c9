//! Output tables and the sinks that persist them

use crate::error::{KeydiffError, Result};
use crate::json_sink::JsonSink;
use crate::value::CellValue;
use crate::xlsx_sink::XlsxSink;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named output table whose column set can grow while rows are written.
///
/// Cells are `None` until set. Appending a column leaves that column unset on
/// every row written so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputTable {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Option<CellValue>>>,
}

impl OutputTable {
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        };
        for column in columns {
            table.append_column(column)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<CellValue>>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_position(column).is_some()
    }

    pub fn column_position(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Extend the bounds by one row with every cell unset; returns its position
    pub fn append_row(&mut self) -> usize {
        self.rows.push(vec![None; self.columns.len()]);
        self.rows.len() - 1
    }

    /// Extend the bounds by one column; existing rows get an unset cell
    pub fn append_column(&mut self, column: impl Into<String>) -> Result<()> {
        let column = column.into();
        if self.has_column(&column) {
            return Err(KeydiffError::sink_write(format!(
                "Column '{}' already exists in output table '{}'",
                column, self.name
            )));
        }

        self.columns.push(column);
        for row in &mut self.rows {
            row.push(None);
        }
        Ok(())
    }

    /// Append a column filled top to bottom with `values`, growing the row
    /// count when the table has no rows yet
    pub fn append_column_with_values(
        &mut self,
        column: impl Into<String>,
        values: Vec<CellValue>,
    ) -> Result<()> {
        let column = column.into();
        if self.rows.is_empty() {
            for _ in 0..values.len() {
                self.append_row();
            }
        }
        if values.len() != self.rows.len() {
            return Err(KeydiffError::sink_write(format!(
                "Column '{}' has {} values but output table '{}' has {} rows",
                column,
                values.len(),
                self.name,
                self.rows.len()
            )));
        }

        self.append_column(column)?;
        for (row, value) in self.rows.iter_mut().zip(values) {
            if let Some(cell) = row.last_mut() {
                *cell = Some(value);
            }
        }
        Ok(())
    }

    pub fn set(&mut self, row: usize, column: &str, value: CellValue) -> Result<()> {
        let position = self.column_position(column).ok_or_else(|| {
            KeydiffError::sink_write(format!(
                "Output table '{}' has no column '{}'",
                self.name, column
            ))
        })?;
        let row_count = self.rows.len();
        let cells = self.rows.get_mut(row).ok_or_else(|| {
            KeydiffError::sink_write(format!(
                "Row {} is out of bounds for output table with {} rows",
                row, row_count
            ))
        })?;
        cells[position] = Some(value);
        Ok(())
    }

    /// Set a cell on the most recently appended row
    pub fn set_last(&mut self, column: &str, value: CellValue) -> Result<()> {
        let last = self.rows.len().checked_sub(1).ok_or_else(|| {
            KeydiffError::sink_write(format!("Output table '{}' has no rows", self.name))
        })?;
        self.set(last, column, value)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&CellValue> {
        let position = self.column_position(column)?;
        self.rows.get(row)?.get(position)?.as_ref()
    }

    /// Excel-style range covering the header and every row, e.g. `A1:D5`
    pub fn reference(&self) -> String {
        let last_column = column_letter(self.columns.len().max(1));
        format!("A1:{}{}", last_column, self.rows.len() + 1)
    }
}

/// One worksheet of a report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputSheet {
    pub name: String,
    pub table: OutputTable,
}

impl OutputSheet {
    pub fn new(name: impl Into<String>, table: OutputTable) -> Self {
        Self {
            name: name.into(),
            table,
        }
    }
}

/// Destination for a serialized result. Nothing is valid until `commit` succeeds.
pub trait TabularSink {
    fn add_sheet(&mut self, sheet: OutputSheet) -> Result<()>;

    fn commit(&mut self) -> Result<()>;
}

/// Keeps sheets in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    sheets: Vec<OutputSheet>,
    committed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sheets(&self) -> &[OutputSheet] {
        &self.sheets
    }

    pub fn sheet(&self, name: &str) -> Option<&OutputSheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

impl TabularSink for MemorySink {
    fn add_sheet(&mut self, sheet: OutputSheet) -> Result<()> {
        if self.sheet(&sheet.name).is_some() {
            return Err(KeydiffError::sink_write(format!(
                "Sheet '{}' already exists",
                sheet.name
            )));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.committed = true;
        Ok(())
    }
}

/// File format of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// JSON for a `.json` path, xlsx otherwise
    #[default]
    Auto,
    Xlsx,
    Json,
}

impl ReportFormat {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid report format: {}. Use 'auto', 'xlsx' or 'json'",
                s
            )),
        }
    }

    /// Concrete format for an output path
    pub fn resolve(self, path: &Path) -> Self {
        match self {
            Self::Auto => {
                let is_json = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case("json"));
                if is_json {
                    Self::Json
                } else {
                    Self::Xlsx
                }
            }
            other => other,
        }
    }
}

/// Sink writing a report of `format` to `path` on commit
pub fn open_sink(path: &Path, format: ReportFormat) -> Box<dyn TabularSink> {
    match format.resolve(path) {
        ReportFormat::Json => Box::new(JsonSink::new(path)),
        _ => Box::new(XlsxSink::new(path)),
    }
}

/// Excel column letters for a 1-based column number
pub fn column_letter(mut number: usize) -> String {
    let mut letters = Vec::new();
    while number > 0 {
        let remainder = (number - 1) % 26;
        letters.push(b'A' + remainder as u8);
        number = (number - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).to_string()
}
