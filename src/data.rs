//! Loading tables from files using DuckDB

use crate::error::{KeydiffError, Result};
use crate::source::TabularSource;
use crate::table::{Table, TableLocator};
use crate::value::CellValue;
use chrono::{DateTime, NaiveTime};
use duckdb::types::{TimeUnit, ValueRef};
use duckdb::Connection;
use std::path::Path;

const ATTACH_ALIAS: &str = "keydiff_src";
const VIEW_NAME: &str = "keydiff_view";
const DEFAULT_SCHEMA: &str = "main";

/// How a file is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Parquet,
    Json,
    Database,
}

impl FileKind {
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "csv" | "tsv" => Some(Self::Csv),
            "parquet" => Some(Self::Parquet),
            "json" | "jsonl" | "ndjson" => Some(Self::Json),
            "duckdb" | "ddb" | "db" => Some(Self::Database),
            _ => None,
        }
    }
}

/// Tabular source backed by an in-memory DuckDB connection.
///
/// Flat files (CSV, TSV, Parquet, JSON) hold one table each. DuckDB database
/// files are attached read-only and a `schema.table` inside them is selected.
pub struct DuckDbSource {
    connection: Connection,
}

impl DuckDbSource {
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute("SET enable_progress_bar=false", [])?;
        // Row order is the identity of "source order" in every report
        connection.execute("SET preserve_insertion_order=true", [])?;
        Ok(Self { connection })
    }

    /// Check if file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        FileKind::detect(path).is_some()
    }

    /// Locators of every table a file offers
    pub fn list_tables(&self, path: &Path) -> Result<Vec<TableLocator>> {
        let locator = TableLocator::file(path);
        let kind = self.check_file(&locator)?;

        if kind != FileKind::Database {
            return Ok(vec![locator]);
        }

        self.attach(&locator)?;
        let listed = self.query_table_names(path);
        self.detach();

        let mut tables = listed.map_err(|e| self.convert_duckdb_error(e, &locator))?;
        tables.sort_by(|a, b| (&a.sheet, &a.table).cmp(&(&b.sheet, &b.table)));
        Ok(tables)
    }

    fn query_table_names(&self, path: &Path) -> duckdb::Result<Vec<TableLocator>> {
        let sql = format!(
            "SELECT table_schema, table_name FROM information_schema.tables WHERE table_catalog = {}",
            quote_literal(ATTACH_ALIAS)
        );
        let mut stmt = self.connection.prepare(&sql)?;
        let rows = stmt.query_map([], |row| {
            let schema: String = row.get(0)?;
            let table: String = row.get(1)?;
            Ok(TableLocator::new(path, Some(schema), Some(table)))
        })?;
        rows.collect()
    }

    fn check_file(&self, locator: &TableLocator) -> Result<FileKind> {
        let path = &locator.path;
        if !path.exists() {
            return Err(KeydiffError::source_unavailable(
                locator,
                format!("File not found: {}", path.display()),
            ));
        }
        if !path.is_file() {
            return Err(KeydiffError::source_unavailable(
                locator,
                format!("Not a file: {}", path.display()),
            ));
        }

        FileKind::detect(path).ok_or_else(|| {
            KeydiffError::source_unavailable(
                locator,
                "Unsupported file format (expected csv, tsv, parquet, json, jsonl, xlsx or a DuckDB database)",
            )
        })
    }

    /// SQL relation to read for the locator
    fn relation(&self, locator: &TableLocator, kind: FileKind) -> Result<String> {
        let path = quote_literal(&locator.path.to_string_lossy());

        if kind != FileKind::Database {
            if locator.table.is_some() {
                return Err(KeydiffError::source_unavailable(
                    locator,
                    "This file holds a single table; remove the '#' selector",
                ));
            }
            return Ok(match kind {
                FileKind::Parquet => format!("read_parquet({})", path),
                FileKind::Json => format!("read_json_auto({})", path),
                // Text files keep their cells verbatim; DuckDB must not reinterpret them
                _ => format!("read_csv({}, header = true, all_varchar = true)", path),
            });
        }

        let table = locator.table.as_deref().ok_or_else(|| {
            KeydiffError::source_unavailable(
                locator,
                "Database files need a table: use path#table or path#schema.table",
            )
        })?;
        let schema = locator.sheet.as_deref().unwrap_or(DEFAULT_SCHEMA);

        Ok(format!(
            "{}.{}.{}",
            quote_identifier(ATTACH_ALIAS),
            quote_identifier(schema),
            quote_identifier(table)
        ))
    }

    fn attach(&self, locator: &TableLocator) -> Result<()> {
        let sql = format!(
            "ATTACH {} AS {} (READ_ONLY)",
            quote_literal(&locator.path.to_string_lossy()),
            quote_identifier(ATTACH_ALIAS)
        );
        self.connection
            .execute(&sql, [])
            .map_err(|e| self.convert_duckdb_error(e, locator))?;
        Ok(())
    }

    fn detach(&self) {
        let sql = format!("DETACH {}", quote_identifier(ATTACH_ALIAS));
        if let Err(e) = self.connection.execute(&sql, []) {
            log::debug!("Detaching source database failed: {}", e);
        }
    }

    fn load(&self, locator: &TableLocator, relation: &str) -> Result<Table> {
        let create_view_sql = format!(
            "CREATE OR REPLACE TEMP VIEW {} AS SELECT * FROM {}",
            VIEW_NAME, relation
        );
        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| self.convert_duckdb_error(e, locator))?;

        let columns = self
            .column_names()
            .map_err(|e| self.convert_duckdb_error(e, locator))?;
        let mut table = Table::new(locator.display_name(), columns)?;
        let column_count = table.column_names().len();

        let records = self
            .read_records(column_count)
            .map_err(|e| self.convert_duckdb_error(e, locator))?;
        for record in records {
            table.push_row(record)?;
        }

        self.connection
            .execute(&format!("DROP VIEW IF EXISTS {}", VIEW_NAME), [])
            .map_err(|e| self.convert_duckdb_error(e, locator))?;

        log::debug!(
            "Loaded {} rows x {} columns from {}",
            table.row_count(),
            column_count,
            locator
        );
        Ok(table)
    }

    /// Column names of the current view in their original order
    fn column_names(&self) -> duckdb::Result<Vec<String>> {
        let mut stmt = self.connection.prepare(&format!("DESCRIBE {}", VIEW_NAME))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        rows.collect()
    }

    fn read_records(&self, column_count: usize) -> duckdb::Result<Vec<Vec<CellValue>>> {
        if column_count == 0 {
            return Ok(Vec::new());
        }

        let mut stmt = self.connection.prepare(&format!("SELECT * FROM {}", VIEW_NAME))?;
        let rows = stmt.query_map([], |row| {
            (0..column_count)
                .map(|i| row.get_ref(i).map(cell_from_value_ref))
                .collect::<duckdb::Result<Vec<_>>>()
        })?;
        rows.collect()
    }

    /// Convert DuckDB errors to source errors naming the table
    fn convert_duckdb_error(&self, error: duckdb::Error, locator: &TableLocator) -> KeydiffError {
        let error_msg = error.to_string();

        let message = if error_msg.contains("CSV Error")
            || error_msg.contains("Could not convert")
            || error_msg.contains("Unterminated quoted field")
        {
            format!("Malformed CSV file: {}", error_msg)
        } else if error_msg.contains("Malformed JSON") {
            format!("Malformed JSON file: {}", error_msg)
        } else if error_msg.contains("does not exist") || error_msg.contains("not found") {
            format!("Table not found: {}", error_msg)
        } else if error_msg.contains("Permission denied") {
            format!("Permission denied: {}", error_msg)
        } else {
            error_msg
        };

        KeydiffError::source_unavailable(locator, message)
    }
}

impl TabularSource for DuckDbSource {
    fn open_table(&self, locator: &TableLocator) -> Result<Table> {
        let kind = self.check_file(locator)?;
        let relation = self.relation(locator, kind)?;

        if kind != FileKind::Database {
            return self.load(locator, &relation);
        }

        self.attach(locator)?;
        let loaded = self.load(locator, &relation);
        self.detach();
        loaded
    }
}

fn cell_from_value_ref(value: ValueRef<'_>) -> CellValue {
    match value {
        ValueRef::Null => CellValue::Empty,
        ValueRef::Boolean(b) => CellValue::Boolean(b),
        ValueRef::TinyInt(i) => CellValue::Integer(i64::from(i)),
        ValueRef::SmallInt(i) => CellValue::Integer(i64::from(i)),
        ValueRef::Int(i) => CellValue::Integer(i64::from(i)),
        ValueRef::BigInt(i) => CellValue::Integer(i),
        ValueRef::HugeInt(i) => i64::try_from(i)
            .map(CellValue::Integer)
            .unwrap_or_else(|_| CellValue::Text(i.to_string())),
        ValueRef::UTinyInt(i) => CellValue::Integer(i64::from(i)),
        ValueRef::USmallInt(i) => CellValue::Integer(i64::from(i)),
        ValueRef::UInt(i) => CellValue::Integer(i64::from(i)),
        ValueRef::UBigInt(i) => i64::try_from(i)
            .map(CellValue::Integer)
            .unwrap_or_else(|_| CellValue::Text(i.to_string())),
        // Go through the f32's own shortest text so 1.1f32 stays "1.1"
        ValueRef::Float(f) => CellValue::Float(f.to_string().parse().unwrap_or(f64::from(f))),
        ValueRef::Double(f) => CellValue::Float(f),
        ValueRef::Decimal(d) => CellValue::Text(d.to_string()),
        ValueRef::Text(s) => CellValue::Text(String::from_utf8_lossy(s).to_string()),
        ValueRef::Blob(b) => CellValue::Text(format!("<blob:{} bytes>", b.len())),
        ValueRef::Date32(days) => DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(|dt| CellValue::Text(dt.date_naive().to_string()))
            .unwrap_or_else(|| CellValue::Integer(i64::from(days))),
        ValueRef::Time64(unit, value) => {
            let micros = to_micros(unit, value);
            let seconds = u32::try_from(micros.div_euclid(1_000_000)).unwrap_or(0);
            let nanos = u32::try_from(micros.rem_euclid(1_000_000) * 1_000).unwrap_or(0);
            NaiveTime::from_num_seconds_from_midnight_opt(seconds, nanos)
                .map(|t| CellValue::Text(t.to_string()))
                .unwrap_or_else(|| CellValue::Integer(value))
        }
        ValueRef::Timestamp(unit, value) => DateTime::from_timestamp_micros(to_micros(unit, value))
            .map(|dt| CellValue::Text(dt.naive_utc().to_string()))
            .unwrap_or_else(|| CellValue::Integer(value)),
        other => CellValue::Text(format!("{:?}", other)),
    }
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn quote_identifier(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
