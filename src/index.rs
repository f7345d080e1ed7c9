//! Key-to-position index over one table

use crate::error::{KeydiffError, Result};
use crate::key::{encode_key, EncodedKey, KeySpec};
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do when two rows of one table share an encoded key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicateKeyPolicy {
    /// The later row replaces the earlier one in the index
    #[default]
    LastWins,
    /// Abort the run
    Reject,
}

impl DuplicateKeyPolicy {
    pub fn parse(s: &str) -> std::result::Result<Self, String> {
        match s.to_lowercase().as_str() {
            "last-wins" | "last_wins" => Ok(Self::LastWins),
            "reject" => Ok(Self::Reject),
            _ => Err(format!(
                "Invalid duplicate key policy: {}. Use 'last-wins' or 'reject'",
                s
            )),
        }
    }
}

/// A key seen on more than one row; `shadowed` is the position that lost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKey {
    pub key: String,
    pub shadowed: usize,
    pub position: usize,
}

/// Encoded key to zero-based row position, built in one pass over a table
#[derive(Debug, Clone)]
pub struct TableIndex {
    positions: HashMap<EncodedKey, usize>,
    duplicates: Vec<DuplicateKey>,
    row_count: usize,
}

impl TableIndex {
    pub fn build(table: &Table, key: &KeySpec, policy: DuplicateKeyPolicy) -> Result<Self> {
        let mut positions = HashMap::with_capacity(table.row_count());
        let mut duplicates = Vec::new();

        for (position, row) in table.rows().iter().enumerate() {
            let encoded = encode_key(&key.extract(row, table.name())?);

            if let Some(shadowed) = positions.insert(encoded.clone(), position) {
                if policy == DuplicateKeyPolicy::Reject {
                    return Err(KeydiffError::duplicate_key(table.name(), encoded.as_str()));
                }
                log::warn!(
                    "Key {} appears more than once in '{}' (rows {} and {}); keeping the later row",
                    encoded,
                    table.name(),
                    shadowed,
                    position
                );
                duplicates.push(DuplicateKey {
                    key: encoded.to_string(),
                    shadowed,
                    position,
                });
            }
        }

        log::debug!(
            "Indexed {} rows of '{}' ({} distinct keys)",
            table.row_count(),
            table.name(),
            positions.len()
        );

        Ok(Self {
            positions,
            duplicates,
            row_count: table.row_count(),
        })
    }

    pub fn position(&self, key: &EncodedKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &EncodedKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of rows in the table the index was built from
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn duplicates(&self) -> &[DuplicateKey] {
        &self.duplicates
    }
}
