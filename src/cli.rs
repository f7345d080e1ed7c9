//! Command-line interface for keydiff

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "keydiff")]
#[command(about = "Compare two tables on a compound key and report what changed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Hide progress bars
    #[arg(long, global = true)]
    pub no_progress: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two tables and write a difference report
    Compare {
        /// First table: path, path#table or path#schema.table
        first: String,

        /// Second table: path, path#table or path#schema.table
        second: String,

        /// Key column (repeat for compound keys)
        #[arg(long = "key", short = 'k', required = true)]
        keys: Vec<String>,

        /// Report file to write
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Report format: "auto", "xlsx" or "json"
        #[arg(long, default_value = "auto")]
        format: String,

        /// Rows sharing a key: "last-wins" or "reject"
        #[arg(long, default_value = "last-wins")]
        duplicate_keys: String,

        /// Quiet output (machine-readable)
        #[arg(long)]
        quiet: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run every comparison listed in a JSON job file
    Batch {
        /// Job file path
        job_file: PathBuf,

        /// Stop at the first failing comparison
        #[arg(long)]
        fail_fast: bool,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },

    /// List the tables a file offers
    Tables {
        /// Data file or DuckDB database
        file: PathBuf,

        /// Output format: "pretty", "json"
        #[arg(long, default_value = "pretty")]
        format: String,
    },
}

/// Parse output format string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pretty,
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid output format: {}. Use 'pretty' or 'json'", s)),
        }
    }
}
