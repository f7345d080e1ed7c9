//! JSON reports

use crate::error::{KeydiffError, Result};
use crate::sink::{OutputSheet, TabularSink};
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    sheets: &'a [OutputSheet],
}

/// Collects sheets and writes them as one pretty-printed document on commit
#[derive(Debug)]
pub struct JsonSink {
    path: PathBuf,
    sheets: Vec<OutputSheet>,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheets: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabularSink for JsonSink {
    fn add_sheet(&mut self, sheet: OutputSheet) -> Result<()> {
        if self.sheets.iter().any(|s| s.name == sheet.name) {
            return Err(KeydiffError::sink_write(format!(
                "Sheet '{}' already exists",
                sheet.name
            )));
        }
        self.sheets.push(sheet);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let report = JsonReport {
            generated_at: Utc::now().to_rfc3339(),
            sheets: &self.sheets,
        };
        let json = serde_json::to_string_pretty(&report)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;

        log::info!("Saved JSON report to {}", self.path.display());
        Ok(())
    }
}
