//! Error types for keydiff operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KeydiffError>;

#[derive(Error, Debug)]
pub enum KeydiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Cannot open table '{locator}': {message}")]
    SourceUnavailable { locator: String, message: String },

    #[error("Key column '{column}' does not exist in table '{table}'")]
    MissingKeyColumn { column: String, table: String },

    #[error("Duplicate key {key} in table '{table}'")]
    DuplicateKey { table: String, key: String },

    #[error("Cannot write output: {message}")]
    SinkWrite { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Generic error: {0}")]
    Generic(#[from] anyhow::Error),
}

impl KeydiffError {
    pub fn source_unavailable(locator: impl ToString, msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            locator: locator.to_string(),
            message: msg.into(),
        }
    }

    pub fn missing_key_column(column: impl Into<String>, table: impl Into<String>) -> Self {
        Self::MissingKeyColumn {
            column: column.into(),
            table: table.into(),
        }
    }

    pub fn duplicate_key(table: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            table: table.into(),
            key: key.into(),
        }
    }

    pub fn sink_write(msg: impl Into<String>) -> Self {
        Self::SinkWrite {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
        }
    }
}
