//! `LogTriage` - Batch log triage engine
//!
//! Copyright (C) 2026 Daniel Freiermuth
//!
//! This program is free software: you can redistribute it and/or modify
//! it under the terms of the GNU General Public License as published by
//! the Free Software Foundation, either version 3 of the License, or
//! (at your option) any later version.
//!
//! This program is distributed in the hope that it will be useful,
//! but WITHOUT ANY WARRANTY; without even the implied warranty of
//! MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
//! GNU General Public License for more details.
//!
//! You should have received a copy of the GNU General Public License
//! along with this program.  If not, see <https://www.gnu.org/licenses/>.

use anyhow::{Context, Result};
use clap::Parser;
use logtriage::analysis::AnalysisReport;
use logtriage::config::AnalyzerConfig;
use logtriage::core::{FileReport, Pipeline, RunOutcome, RunStats};
use logtriage::parser::LogRecord;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

const LOG_EXTENSIONS: [&str; 2] = ["log", "txt"];

#[derive(Parser, Debug)]
#[command(name = "logtriage")]
#[command(author = "LogTriage Team")]
#[command(version)]
#[command(about = "Parse log files in parallel and report error bursts, cascades and peak periods", long_about = None)]
struct Args {
    /// Log files or directories to scan recursively
    #[arg(value_name = "PATH", required = true)]
    paths: Vec<PathBuf>,

    /// Day to analyze (YYYY-MM-DD), defaults to yesterday
    #[arg(long, value_name = "DATE")]
    date: Option<String>,

    /// Number of files parsed in parallel
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Stop reading each file after this many lines
    #[arg(long, value_name = "N")]
    max_lines_per_file: Option<usize>,

    /// Count warnings as errors
    #[arg(long)]
    warnings_as_errors: bool,

    /// Analyze every record instead of the target time window
    #[arg(long)]
    no_time_filter: bool,

    /// Config file, defaults to the user config directory
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip files larger than this
    #[arg(long, value_name = "MB", default_value_t = 200)]
    max_file_size_mb: u64,

    /// Write the JSON report here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Include the analyzed records in the JSON report
    #[arg(long)]
    include_records: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn load_config(&self) -> Result<AnalyzerConfig> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::load(path)?,
            None => AnalyzerConfig::load_default()?,
        };

        if let Some(date) = &self.date {
            config.target_date = Some(date.clone());
        }
        if let Some(workers) = self.workers {
            config.max_workers = workers;
        }
        if let Some(max_lines) = self.max_lines_per_file {
            config.max_lines_per_file = Some(max_lines);
        }
        if self.warnings_as_errors {
            config.warnings_as_errors = true;
        }
        if self.no_time_filter {
            config.time_window_enabled = false;
        }
        Ok(config)
    }
}

#[derive(Serialize)]
struct Export<'a> {
    stats: &'a RunStats,
    files: &'a [FileReport],
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    records: Option<&'a [LogRecord]>,
}

/// Expand directories to the log files below them.
///
/// Explicit file arguments are kept even if they do not exist so the run
/// reports them as failed.
fn discover_files(paths: &[PathBuf], max_file_size: u64) -> Vec<PathBuf> {
    let mut found = Vec::new();
    for path in paths {
        if !path.is_dir() {
            if within_size(path, max_file_size) {
                found.push(path.clone());
            }
            continue;
        }

        tracing::info!("Scanning directory for log files: {}", path.display());
        for entry in WalkDir::new(path).follow_links(false) {
            match entry {
                Ok(entry) => {
                    let candidate = entry.path();
                    if entry.file_type().is_file()
                        && has_log_extension(candidate)
                        && within_size(candidate, max_file_size)
                    {
                        found.push(candidate.to_path_buf());
                    }
                }
                Err(e) => {
                    tracing::debug!("Error walking directory: {e}");
                }
            }
        }
    }
    found.sort();
    found.dedup();
    found
}

fn has_log_extension(path: &Path) -> bool {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| LOG_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn within_size(path: &Path, max_file_size: u64) -> bool {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > max_file_size => {
            tracing::warn!(
                "Skipping {} ({} bytes exceeds the size limit)",
                path.display(),
                meta.len()
            );
            false
        }
        _ => true,
    }
}

fn write_export(export: &Export<'_>, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(export).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}").context("Failed to write report")?;
        }
    }
    Ok(())
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Set RUST_LOG environment variable to override (e.g., RUST_LOG=debug)
    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(
        "LogTriage starting up (version {})",
        env!("CARGO_PKG_VERSION")
    );

    #[cfg(feature = "cpu-profiling")]
    {
        tracing::info!("CPU profiling enabled with Tracy - run Tracy profiler to connect");
    }

    let config = args.load_config()?;
    let pipeline = Pipeline::new(&config).context("Invalid configuration")?;

    let max_file_size = args.max_file_size_mb.saturating_mul(1024 * 1024);
    let files = discover_files(&args.paths, max_file_size);
    tracing::info!("Found {} log files", files.len());

    match pipeline.run(&files) {
        RunOutcome::Complete(output) => {
            let export = Export {
                stats: &output.stats,
                files: &output.files,
                report: &output.report,
                records: args.include_records.then_some(output.records.as_slice()),
            };
            write_export(&export, args.output.as_deref())?;

            let summary = &output.report.summary;
            tracing::info!(
                "{}: {} entries, {} errors ({}%), {} cascades, {} bursts",
                summary.analysis_timeframe,
                summary.total_log_entries,
                summary.total_errors,
                summary.error_rate_percent,
                summary.cascading_failures,
                summary.error_bursts
            );
            Ok(ExitCode::SUCCESS)
        }
        RunOutcome::NoData(reason) => {
            tracing::error!("Nothing to report: {reason}");
            Ok(ExitCode::from(2))
        }
    }
}
