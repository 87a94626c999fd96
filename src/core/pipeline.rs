// LogTriage - GPL-3.0-or-later
// This file is part of LogTriage.
//
// Copyright (C) 2026 Daniel Freiermuth
//
// LogTriage is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// LogTriage is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with LogTriage.  If not, see <https://www.gnu.org/licenses/>.

use super::dispatch::{Dispatcher, FileReport};
use super::log_file::LogFileParser;
use crate::analysis::{AnalysisReport, TemporalAnalyzer};
use crate::config::{AnalyzerConfig, ConfigError, ResolvedConfig};
use crate::parser::{LineParser, LogRecord};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a run produced nothing to analyze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoDataReason {
    NoFiles,
    NoRecords,
    EmptyWindow {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFiles => write!(f, "No log files to process"),
            Self::NoRecords => write!(f, "No log entries could be parsed"),
            Self::EmptyWindow { start, end } => {
                write!(f, "No log entries between {start} and {end}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub files_submitted: usize,
    pub files_failed: usize,
    pub records_parsed: usize,
    pub records_in_window: usize,
}

/// Result of a run that had data
#[derive(Debug)]
pub struct PipelineOutput {
    /// Window-filtered records in chronological order
    pub records: Vec<LogRecord>,
    pub report: AnalysisReport,
    pub files: Vec<FileReport>,
    pub stats: RunStats,
}

#[derive(Debug)]
pub enum RunOutcome {
    Complete(Box<PipelineOutput>),
    NoData(NoDataReason),
}

/// Parse, filter and analyze a file set with one fixed configuration
pub struct Pipeline {
    config: ResolvedConfig,
    dispatcher: Dispatcher,
    analyzer: TemporalAnalyzer,
}

impl Pipeline {
    /// Validate `config` and set up the worker pool.
    ///
    /// Fails before any file is touched.
    pub fn new(config: &AnalyzerConfig) -> Result<Self, PipelineError> {
        let resolved = config.validate()?;
        Self::from_resolved(resolved)
    }

    pub fn from_resolved(config: ResolvedConfig) -> Result<Self, PipelineError> {
        let line_parser = LineParser::new(config.warnings_as_errors, config.syslog_year);
        let file_parser = LogFileParser::new(line_parser, config.max_lines_per_file);
        let dispatcher = Dispatcher::new(config.max_workers, file_parser)?;
        let analyzer = TemporalAnalyzer::new(config.window, config.time_window_enabled);

        tracing::debug!(
            "Pipeline ready: {} workers, window {} (enabled: {}), warnings as errors: {}",
            config.max_workers,
            config.window.label(),
            config.time_window_enabled,
            config.warnings_as_errors
        );
        Ok(Self {
            config,
            dispatcher,
            analyzer,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    #[must_use]
    pub fn run(&self, paths: &[PathBuf]) -> RunOutcome {
        profiling::scope!("Pipeline::run");

        if paths.is_empty() {
            tracing::warn!("{}", NoDataReason::NoFiles);
            return RunOutcome::NoData(NoDataReason::NoFiles);
        }

        let dispatched = self.dispatcher.dispatch(paths);
        let files_failed = dispatched.failed_files();
        let records_parsed = dispatched.records.len();
        if records_parsed == 0 {
            tracing::warn!("{}", NoDataReason::NoRecords);
            return RunOutcome::NoData(NoDataReason::NoRecords);
        }

        let filtered = self.analyzer.filter(dispatched.records);
        if filtered.records.is_empty() {
            let window = self.analyzer.window();
            let reason = NoDataReason::EmptyWindow {
                start: window.start(),
                end: window.end(),
            };
            tracing::warn!("{reason}");
            return RunOutcome::NoData(reason);
        }

        let report = self.analyzer.analyze(&filtered);
        let stats = RunStats {
            files_submitted: paths.len(),
            files_failed,
            records_parsed,
            records_in_window: filtered.after,
        };

        RunOutcome::Complete(Box::new(PipelineOutput {
            records: filtered.records,
            report,
            files: dispatched.files,
            stats,
        }))
    }
}
