//! DuckDB library discovery, checked once at startup

use crate::error::{KeydiffError, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Where the DuckDB library used for table loading comes from
#[derive(Debug, Clone)]
pub struct DuckDbConfig {
    pub library_path: Option<PathBuf>,
}

impl DuckDbConfig {
    pub fn new() -> Self {
        Self {
            library_path: Self::discover_library_path(),
        }
    }

    fn discover_library_path() -> Option<PathBuf> {
        if let Ok(path) = env::var("DUCKDB_LIB_PATH") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        Self::standard_paths()
            .into_iter()
            .find(|path| Self::has_duckdb_library(path))
    }

    fn standard_paths() -> Vec<PathBuf> {
        let paths: &[&str] = if cfg!(target_os = "macos") {
            &["/opt/homebrew/lib", "/usr/local/lib", "/opt/local/lib"]
        } else if cfg!(target_os = "windows") {
            &["C:\\Program Files\\DuckDB\\lib", "C:\\duckdb\\lib"]
        } else {
            &[
                "/usr/lib",
                "/usr/local/lib",
                "/usr/lib/x86_64-linux-gnu",
                "/usr/lib64",
            ]
        };
        paths.iter().map(PathBuf::from).collect()
    }

    fn has_duckdb_library(path: &Path) -> bool {
        let names: &[&str] = if cfg!(target_os = "windows") {
            &["duckdb.dll", "libduckdb.dll"]
        } else if cfg!(target_os = "macos") {
            &["libduckdb.dylib", "libduckdb.so"]
        } else {
            &["libduckdb.so", "libduckdb.so.1"]
        };
        names.iter().any(|name| path.join(name).exists())
    }

    /// A bundled build links DuckDB statically; no system library is involved
    pub fn use_bundled(&self) -> bool {
        cfg!(feature = "bundled")
    }

    pub fn validate(&self) -> Result<()> {
        if self.use_bundled() {
            return Ok(());
        }

        match &self.library_path {
            Some(path) if Self::has_duckdb_library(path) => Ok(()),
            _ => Err(KeydiffError::config(self.missing_library_message())),
        }
    }

    fn missing_library_message(&self) -> String {
        let mut message = String::from("DuckDB library not found, so tables cannot be loaded.\n\n");
        message.push_str("Possible solutions:\n");
        message.push_str("1. Set a custom path: export DUCKDB_LIB_PATH=/path/to/duckdb/lib\n");
        message.push_str("2. Rebuild with the bundled library: cargo build --features bundled\n");

        message.push_str("\nSearched paths:\n");
        for path in Self::standard_paths() {
            let status = if Self::has_duckdb_library(&path) {
                "found"
            } else if path.exists() {
                "no DuckDB library"
            } else {
                "missing"
            };
            message.push_str(&format!("  {} ({})\n", path.display(), status));
        }
        if let Some(path) = &self.library_path {
            message.push_str(&format!("\nDUCKDB_LIB_PATH: {}\n", path.display()));
        }

        message
    }
}

impl Default for DuckDbConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the DuckDB setup before any table is opened
pub fn init_duckdb() -> Result<DuckDbConfig> {
    let config = DuckDbConfig::new();
    config.validate()?;

    if config.use_bundled() {
        log::debug!("Using bundled DuckDB library");
    } else if let Some(path) = &config.library_path {
        log::debug!("Using DuckDB library from: {}", path.display());
    }

    Ok(config)
}
