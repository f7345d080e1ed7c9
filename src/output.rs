//! Output formatting utilities

use crate::error::Result;
use crate::model::DiffSummary;
use crate::table::TableLocator;
use serde::Serialize;
use std::path::Path;

/// Outcome of one request in a batch
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub first: String,
    pub second: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<DiffSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Pretty printer for keydiff output
pub struct PrettyPrinter;

impl PrettyPrinter {
    /// Print the summary of one comparison
    pub fn print_diff_summary(summary: &DiffSummary, output: &Path, quiet: bool) {
        if quiet {
            for line in quiet_lines(summary) {
                println!("{}", line);
            }
            return;
        }

        println!(
            "🔍 keydiff: {} → {} on [{}]",
            summary.first_table,
            summary.second_table,
            summary.key_columns.join(", ")
        );
        println!(
            "├─ Rows: {} vs {} ({} matched)",
            summary.first_rows, summary.second_rows, summary.matched_rows
        );

        if summary.rows_with_differences > 0 {
            println!(
                "├─ ❌ Rows with differences: {} ({} cells)",
                summary.rows_with_differences, summary.cell_differences
            );
        } else {
            println!("├─ ✅ Matched rows: identical");
        }

        Self::print_count_line("Rows only in first", summary.rows_only_in_first);
        Self::print_count_line("Rows only in second", summary.rows_only_in_second);
        Self::print_columns_line("Columns only in first", &summary.columns_only_in_first);
        Self::print_columns_line("Columns only in second", &summary.columns_only_in_second);

        if summary.has_duplicate_keys() {
            println!(
                "├─ ⚠️  Duplicate keys: {} in first, {} in second (later rows kept)",
                summary.duplicate_keys_in_first, summary.duplicate_keys_in_second
            );
        }

        println!("└─ Report: {}", output.display());

        if !summary.has_differences() {
            println!();
            println!("✅ Tables match on every key");
        }
    }

    fn print_count_line(label: &str, count: usize) {
        if count > 0 {
            println!("├─ ❌ {}: {}", label, count);
        } else {
            println!("├─ ✅ {}: none", label);
        }
    }

    fn print_columns_line(label: &str, columns: &[String]) {
        if columns.is_empty() {
            println!("├─ ✅ {}: none", label);
        } else {
            println!("├─ ❌ {}: {}", label, columns.len());
            println!("│  └─ {}", columns.join(", "));
        }
    }

    /// Print the outcome of every request of a batch
    pub fn print_batch_results(outcomes: &[BatchOutcome]) {
        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        println!(
            "📦 Batch: {} comparisons, {} failed",
            outcomes.len(),
            failed
        );

        for (i, outcome) in outcomes.iter().enumerate() {
            let prefix = if i == outcomes.len() - 1 { "└─" } else { "├─" };
            match (&outcome.summary, &outcome.error) {
                (_, Some(error)) => {
                    println!("{} ❌ {} → {}: {}", prefix, outcome.first, outcome.second, error)
                }
                (Some(summary), None) => {
                    let marker = if summary.has_differences() { "🟡" } else { "✅" };
                    println!(
                        "{} {} {} → {}: {} differing, {} only in first, {} only in second → {}",
                        prefix,
                        marker,
                        outcome.first,
                        outcome.second,
                        summary.rows_with_differences,
                        summary.rows_only_in_first,
                        summary.rows_only_in_second,
                        outcome.output
                    );
                }
                (None, None) => println!("{} {} → {}", prefix, outcome.first, outcome.second),
            }
        }
    }

    /// Print table locators found in a file
    pub fn print_table_list(path: &Path, tables: &[TableLocator]) {
        if tables.is_empty() {
            println!("No tables found in {}.", path.display());
            return;
        }

        println!("📋 Tables in {}:", path.display());
        for (i, table) in tables.iter().enumerate() {
            let prefix = if i == tables.len() - 1 { "└─" } else { "├─" };
            println!("{} {}", prefix, table);
        }
    }
}

/// Machine-readable `key=value` lines
pub fn quiet_lines(summary: &DiffSummary) -> Vec<String> {
    vec![
        format!("rows_with_differences={}", summary.rows_with_differences),
        format!("cell_differences={}", summary.cell_differences),
        format!("rows_only_in_first={}", summary.rows_only_in_first),
        format!("rows_only_in_second={}", summary.rows_only_in_second),
        format!("columns_only_in_first={}", summary.columns_only_in_first.len()),
        format!("columns_only_in_second={}", summary.columns_only_in_second.len()),
        format!(
            "duplicate_keys={}",
            summary.duplicate_keys_in_first + summary.duplicate_keys_in_second
        ),
    ]
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl JsonFormatter {
    /// Format any serializable data as JSON
    pub fn format<T: serde::Serialize + ?Sized>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }

    /// Format a comparison summary with where its report went
    pub fn format_diff_summary(
        summary: &DiffSummary,
        output: &Path,
        fingerprint: &str,
    ) -> Result<String> {
        let json = serde_json::json!({
            "summary": summary,
            "has_differences": summary.has_differences(),
            "output": output.display().to_string(),
            "fingerprint": fingerprint,
        });
        Ok(serde_json::to_string_pretty(&json)?)
    }

    pub fn format_table_list(tables: &[TableLocator]) -> Result<String> {
        let json: Vec<serde_json::Value> = tables
            .iter()
            .map(|t| {
                serde_json::json!({
                    "locator": t.to_string(),
                    "sheet": t.sheet,
                    "table": t.table,
                })
            })
            .collect();
        Ok(serde_json::to_string_pretty(&json)?)
    }
}
