//! Command implementations for keydiff CLI

use crate::cli::{Commands, OutputFormat};
use crate::config::BatchConfig;
use crate::source::FileSource;
use crate::diff::{CompareOptions, ComparisonRequest};
use crate::error::{KeydiffError, Result};
use crate::hash::fingerprint;
use crate::index::DuplicateKeyPolicy;
use crate::output::{BatchOutcome, JsonFormatter, PrettyPrinter};
use crate::sink::ReportFormat;
use crate::table::TableLocator;
use std::path::{Path, PathBuf};

/// Execute a command
pub fn execute_command(command: Commands, show_progress: bool) -> Result<()> {
    match command {
        Commands::Compare {
            first,
            second,
            keys,
            output,
            format,
            duplicate_keys,
            quiet,
            json,
        } => compare_command(
            CompareArgs {
                first: &first,
                second: &second,
                keys,
                output,
                format: &format,
                duplicate_keys: &duplicate_keys,
            },
            quiet,
            json,
            show_progress,
        ),
        Commands::Batch {
            job_file,
            fail_fast,
            format,
        } => batch_command(&job_file, fail_fast, &format, show_progress),
        Commands::Tables { file, format } => tables_command(&file, &format),
    }
}

struct CompareArgs<'a> {
    first: &'a str,
    second: &'a str,
    keys: Vec<String>,
    output: PathBuf,
    format: &'a str,
    duplicate_keys: &'a str,
}

/// Compare two tables and write the report
fn compare_command(
    args: CompareArgs<'_>,
    quiet: bool,
    json: bool,
    show_progress: bool,
) -> Result<()> {
    let format = ReportFormat::parse(args.format).map_err(KeydiffError::invalid_input)?;
    let duplicate_keys =
        DuplicateKeyPolicy::parse(args.duplicate_keys).map_err(KeydiffError::invalid_input)?;

    let request = ComparisonRequest {
        first: TableLocator::parse(args.first)?,
        second: TableLocator::parse(args.second)?,
        output: args.output,
        key_columns: args.keys,
        format,
    };
    let options = CompareOptions {
        duplicate_keys,
        show_progress: show_progress && !quiet && !json,
    };

    let source = FileSource::new()?;
    let result = request.execute(&source, options)?;
    let summary = result.summary();

    if json {
        let hash = fingerprint(&result)?;
        println!(
            "{}",
            JsonFormatter::format_diff_summary(&summary, &request.output, &hash)?
        );
    } else {
        PrettyPrinter::print_diff_summary(&summary, &request.output, quiet);
    }

    Ok(())
}

/// Run every comparison of a job file in order
fn batch_command(job_file: &Path, fail_fast: bool, format: &str, show_progress: bool) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(KeydiffError::invalid_input)?;
    let config = BatchConfig::load(job_file)?;
    let options = CompareOptions {
        duplicate_keys: config.duplicate_keys,
        show_progress: show_progress && output_format == OutputFormat::Pretty,
    };

    log::info!(
        "Running {} comparisons from {}",
        config.comparisons.len(),
        job_file.display()
    );

    let source = FileSource::new()?;
    let mut outcomes = Vec::with_capacity(config.comparisons.len());

    for request in &config.comparisons {
        let mut outcome = BatchOutcome {
            first: request.first.to_string(),
            second: request.second.to_string(),
            output: request.output.display().to_string(),
            summary: None,
            error: None,
        };

        match request.execute(&source, options) {
            Ok(result) => outcome.summary = Some(result.summary()),
            Err(e) => {
                log::error!("{} → {} failed: {}", outcome.first, outcome.second, e);
                if fail_fast {
                    return Err(e);
                }
                outcome.error = Some(e.to_string());
            }
        }
        outcomes.push(outcome);
    }

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_batch_results(&outcomes),
        OutputFormat::Json => println!("{}", JsonFormatter::format(&outcomes)?),
    }

    let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
    if failed > 0 {
        return Err(anyhow::anyhow!(
            "{} of {} comparisons failed",
            failed,
            outcomes.len()
        )
        .into());
    }

    Ok(())
}

/// List the tables a file offers
fn tables_command(file: &Path, format: &str) -> Result<()> {
    let output_format = OutputFormat::parse(format).map_err(KeydiffError::invalid_input)?;

    let source = FileSource::new()?;
    let tables = source.list_tables(file)?;

    match output_format {
        OutputFormat::Pretty => PrettyPrinter::print_table_list(file, &tables),
        OutputFormat::Json => println!("{}", JsonFormatter::format_table_list(&tables)?),
    }

    Ok(())
}
