//! Where comparison inputs come from

use crate::data::DuckDbSource;
use crate::error::{KeydiffError, Result};
use crate::table::{Table, TableLocator};
use crate::xlsx_source::{is_workbook, XlsxSource};
use std::collections::HashMap;
use std::path::Path;

/// Opens a table by locator. Every call returns a fresh, fully loaded table.
pub trait TabularSource {
    fn open_table(&self, locator: &TableLocator) -> Result<Table>;
}

/// Tables held in memory, addressed by their locator
#[derive(Debug, Default, Clone)]
pub struct MemorySource {
    tables: HashMap<TableLocator, Table>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, locator: TableLocator, table: Table) {
        self.tables.insert(locator, table);
    }

    /// Builder form of [`MemorySource::insert`] using the locator's text form
    pub fn with_table(mut self, locator: &str, table: Table) -> Result<Self> {
        self.insert(TableLocator::parse(locator)?, table);
        Ok(self)
    }
}

impl TabularSource for MemorySource {
    fn open_table(&self, locator: &TableLocator) -> Result<Table> {
        self.tables
            .get(locator)
            .cloned()
            .ok_or_else(|| KeydiffError::source_unavailable(locator, "No such table"))
    }
}

/// Any supported file: Excel workbooks through [`XlsxSource`], everything
/// else through [`DuckDbSource`]
pub struct FileSource {
    duckdb: DuckDbSource,
    workbooks: XlsxSource,
}

impl FileSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            duckdb: DuckDbSource::new()?,
            workbooks: XlsxSource::new(),
        })
    }

    /// Locators of every table a file offers
    pub fn list_tables(&self, path: &Path) -> Result<Vec<TableLocator>> {
        if is_workbook(path) {
            self.workbooks.list_tables(path)
        } else {
            self.duckdb.list_tables(path)
        }
    }
}

impl TabularSource for FileSource {
    fn open_table(&self, locator: &TableLocator) -> Result<Table> {
        if is_workbook(&locator.path) {
            self.workbooks.open_table(locator)
        } else {
            self.duckdb.open_table(locator)
        }
    }
}
