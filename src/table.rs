//! In-memory table model shared by sources, the diff engine and sinks

use crate::error::{KeydiffError, Result};
use crate::value::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One table row: cells keyed by column name, in the table's column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    cells: IndexMap<String, CellValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.contains_key(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.cells.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

/// A named table with unique column names and ordered rows.
///
/// Every row holds exactly the table's columns, so a row lookup by any of
/// [`Table::column_names`] always succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table, rejecting duplicate column names
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(KeydiffError::invalid_input(format!(
                    "Table '{}' has more than one column named '{}'",
                    name, column
                )));
            }
        }

        Ok(Self {
            name,
            columns,
            rows: Vec::new(),
        })
    }

    /// Build a table from positional records, one value per column
    pub fn from_records<V>(name: &str, columns: &[&str], records: Vec<Vec<V>>) -> Result<Self>
    where
        V: Into<CellValue>,
    {
        let mut table = Self::new(name, columns.iter().map(|c| c.to_string()).collect())?;
        for record in records {
            table.push_row(record.into_iter().map(Into::into).collect())?;
        }
        Ok(table)
    }

    /// Append a row given positionally in column order
    pub fn push_row(&mut self, values: Vec<CellValue>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(KeydiffError::invalid_input(format!(
                "Row {} of table '{}' has {} values but the table has {} columns",
                self.rows.len(),
                self.name,
                values.len(),
                self.columns.len()
            )));
        }

        let row = self.columns.iter().cloned().zip(values).collect();
        self.rows.push(row);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Row at a zero-based position within the table's data rows
    pub fn row(&self, position: usize) -> Option<&Row> {
        self.rows.get(position)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// All values of one column in row order
    pub fn column_values(&self, column: &str) -> Option<Vec<CellValue>> {
        if !self.has_column(column) {
            return None;
        }

        Some(
            self.rows
                .iter()
                .map(|row| row.get(column).cloned().unwrap_or_default())
                .collect(),
        )
    }
}

/// Identifies a table: a file, optionally a sheet (schema) and a table inside it.
///
/// Textual form is `path`, `path#table` or `path#sheet.table`. A `#` only
/// starts a selector when the whole text is not an existing file and the
/// text after it holds no path separator, so `exports#2024/old.csv` stays a
/// plain path. The sheet is split from the table at the last `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableLocator {
    pub path: PathBuf,
    pub sheet: Option<String>,
    pub table: Option<String>,
}

impl TableLocator {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: None,
            table: None,
        }
    }

    pub fn new(path: impl Into<PathBuf>, sheet: Option<String>, table: Option<String>) -> Self {
        Self {
            path: path.into(),
            sheet,
            table,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        let selector_split = s
            .rsplit_once('#')
            .filter(|(_, selector)| !selector.contains(['/', '\\']))
            .filter(|_| !Path::new(s).is_file());

        let Some((path, selector)) = selector_split else {
            if s.trim().is_empty() {
                return Err(KeydiffError::invalid_input("Table locator is empty"));
            }
            return Ok(Self::file(s));
        };

        if path.is_empty() {
            return Err(KeydiffError::invalid_input(format!(
                "Table locator '{}' has no file path",
                s
            )));
        }

        let (sheet, table) = match selector.rsplit_once('.') {
            Some((sheet, table)) => (Some(sheet), table),
            None => (None, selector),
        };

        if table.is_empty() || sheet.is_some_and(str::is_empty) {
            return Err(KeydiffError::invalid_input(format!(
                "Table locator '{}' has an empty sheet or table name",
                s
            )));
        }

        Ok(Self::new(
            path,
            sheet.map(str::to_string),
            Some(table.to_string()),
        ))
    }

    /// Short name for messages: the table name, or the file name
    pub fn display_name(&self) -> String {
        match &self.table {
            Some(table) => table.clone(),
            None => file_label(&self.path),
        }
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl fmt::Display for TableLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.display())?;
        match (&self.sheet, &self.table) {
            (Some(sheet), Some(table)) => write!(f, "#{}.{}", sheet, table),
            (None, Some(table)) => write!(f, "#{}", table),
            _ => Ok(()),
        }
    }
}

impl FromStr for TableLocator {
    type Err = KeydiffError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TableLocator {
    type Error = KeydiffError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TableLocator> for String {
    fn from(value: TableLocator) -> Self {
        value.to_string()
    }
}
