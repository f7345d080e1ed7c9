//! Compound key specification, extraction and canonical encoding

use crate::error::{KeydiffError, Result};
use crate::table::{Row, Table};
use crate::value::CellValue;
use indexmap::IndexMap;
use std::fmt;

/// Key column name to value, in key specification order
pub type KeyValues = IndexMap<String, CellValue>;

const QUOTE_TOKEN_PREFIX: &str = "[quote$";

/// Ordered, non-empty list of distinct column names identifying a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    columns: Vec<String>,
}

impl KeySpec {
    pub fn new<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();

        if columns.is_empty() {
            return Err(KeydiffError::invalid_input(
                "At least one key column is required",
            ));
        }

        for (i, column) in columns.iter().enumerate() {
            if columns[..i].contains(column) {
                return Err(KeydiffError::invalid_input(format!(
                    "Key column '{}' is listed more than once",
                    column
                )));
            }
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Check that every key column exists in the table
    pub fn validate(&self, table: &Table) -> Result<()> {
        match self.columns.iter().find(|c| !table.has_column(c)) {
            Some(missing) => Err(KeydiffError::missing_key_column(
                missing.as_str(),
                table.name(),
            )),
            None => Ok(()),
        }
    }

    /// Read the key values of one row
    pub fn extract(&self, row: &Row, table_name: &str) -> Result<KeyValues> {
        self.columns
            .iter()
            .map(|column| match row.get(column) {
                Some(value) => Ok((column.clone(), value.clone())),
                None => Err(KeydiffError::missing_key_column(column.as_str(), table_name)),
            })
            .collect()
    }
}

/// Canonical string form of a set of key values, used only as a lookup key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedKey(String);

impl EncodedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EncodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encode key values as `{"k1": "v1", "k2": "v2"}` with names sorted.
///
/// Values enter through their canonical text, untrimmed. Encoding is
/// injective: distinct (name, canonical value) sets never produce the same
/// string.
pub fn encode_key(key: &KeyValues) -> EncodedKey {
    let mut pairs: Vec<(&str, String)> = key
        .iter()
        .map(|(name, value)| (name.as_str(), value.canonical_text()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let body = pairs
        .iter()
        .map(|(name, value)| {
            format!("\"{}\": \"{}\"", escape_quotes(name), escape_quotes(value))
        })
        .collect::<Vec<_>>()
        .join(", ");

    EncodedKey(format!("{{{}}}", body))
}

/// Replace `"` with a `[quote$N]` token that does not occur in `source`.
///
/// When a token is used, or the text already contains `[quote$`, the chosen
/// token is also written once up front so the component decodes unambiguously.
pub fn escape_quotes(source: &str) -> String {
    if !source.contains('"') && !source.contains(QUOTE_TOKEN_PREFIX) {
        return source.to_string();
    }

    let token = quote_token(source);
    format!("{}{}", token, source.replace('"', &token))
}

fn quote_token(source: &str) -> String {
    (1u64..)
        .map(|n| format!("{}{}]", QUOTE_TOKEN_PREFIX, n))
        .find(|token| !source.contains(token.as_str()))
        .unwrap_or_default()
}
