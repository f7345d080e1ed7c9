//! # keydiff
//!
//! A key-based structured data diff tool. Two tables sharing a compound key
//! are matched row by row, regardless of row order, and the result lists the
//! cells that changed, the rows present in only one table and the columns
//! present in only one table.

pub mod cli;
pub mod commands;
pub mod compare;
pub mod config;
pub mod data;
pub mod diff;
pub mod duckdb_config;
pub mod error;
pub mod hash;
pub mod index;
pub mod json_sink;
pub mod key;
pub mod matcher;
pub mod model;
pub mod output;
pub mod progress;
pub mod serialize;
pub mod sink;
pub mod source;
pub mod table;
pub mod value;
pub mod xlsx_sink;
pub mod xlsx_source;

pub use diff::{compare_tables, CompareOptions, ComparisonRequest, DiffOrchestrator};
pub use error::{KeydiffError, Result};
pub use index::DuplicateKeyPolicy;
pub use key::KeySpec;
pub use model::{DiffResult, DiffSummary};
pub use serialize::DiffSerializer;
pub use source::{FileSource, TabularSource};
pub use table::{Row, Table, TableLocator};
pub use value::CellValue;
