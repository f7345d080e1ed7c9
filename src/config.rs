//! Batch job files

use crate::diff::ComparisonRequest;
use crate::error::{KeydiffError, Result};
use crate::index::DuplicateKeyPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A list of comparisons run one after another.
///
/// ```json
/// {
///   "duplicate_keys": "reject",
///   "comparisons": [
///     { "first": "old.csv", "second": "new.csv", "output": "diff.xlsx", "key_columns": ["id"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    pub comparisons: Vec<ComparisonRequest>,
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
}

impl BatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            KeydiffError::config(format!("Cannot read job file {}: {}", path.display(), e))
        })?;
        let config = Self::parse(&content).map_err(|e| match e {
            KeydiffError::Config { message } => {
                KeydiffError::config(format!("{}: {}", path.display(), message))
            }
            other => other,
        })?;

        // Relative paths in a job file are relative to the job file
        let base = path.parent().filter(|p| !p.as_os_str().is_empty());
        Ok(match base {
            Some(base) => config.relative_to(base),
            None => config,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| KeydiffError::config(format!("Invalid job file: {}", e)))?;

        if config.comparisons.is_empty() {
            return Err(KeydiffError::config("Job file lists no comparisons"));
        }
        for (i, request) in config.comparisons.iter().enumerate() {
            request.key_spec().map_err(|e| {
                KeydiffError::config(format!("Comparison {}: {}", i + 1, e))
            })?;
        }

        Ok(config)
    }

    fn relative_to(mut self, base: &Path) -> Self {
        for request in &mut self.comparisons {
            for path in [
                &mut request.first.path,
                &mut request.second.path,
                &mut request.output,
            ] {
                if path.is_relative() {
                    *path = base.join(&*path);
                }
            }
        }
        self
    }
}
