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

//! Fan-out/fan-in parsing of a file set on a bounded worker pool.
//!
//! Every file is one task. Tasks share nothing: each returns its own record
//! slice and report, and the slices are concatenated only after all tasks
//! have finished.

use super::log_file::{FileError, LogFileParser};
use crate::parser::LogRecord;
use rayon::prelude::*;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

/// Outcome of a single file task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub records: usize,
    /// Set when the file was skipped; its record count is then 0
    pub error: Option<String>,
}

impl FileReport {
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Merged result of one dispatch
#[derive(Debug, Default)]
pub struct DispatchOutput {
    /// Union of all file records; no cross-file order
    pub records: Vec<LogRecord>,
    /// One entry per submitted path, in submission order
    pub files: Vec<FileReport>,
}

impl DispatchOutput {
    #[must_use]
    pub fn failed_files(&self) -> usize {
        self.files.iter().filter(|f| f.failed()).count()
    }
}

/// Runs a [`LogFileParser`] over many files with at most `max_workers`
/// files in flight.
pub struct Dispatcher {
    pool: rayon::ThreadPool,
    file_parser: LogFileParser,
}

impl Dispatcher {
    pub fn new(
        max_workers: usize,
        file_parser: LogFileParser,
    ) -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(max_workers.max(1))
            .thread_name(|i| format!("logtriage-parse-{i}"))
            .build()?;
        Ok(Self { pool, file_parser })
    }

    #[must_use]
    pub fn max_workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Parse every path and merge the results.
    ///
    /// Returns only after every task has completed. A failing or panicking
    /// file contributes zero records and never affects its siblings.
    #[must_use]
    pub fn dispatch(&self, paths: &[PathBuf]) -> DispatchOutput {
        let file_parser = self.file_parser;
        self.dispatch_with(paths, |path| file_parser.parse(path))
    }

    /// Run `task` once per path on the pool and merge the results
    fn dispatch_with<F>(&self, paths: &[PathBuf], task: F) -> DispatchOutput
    where
        F: Fn(&Path) -> Result<Vec<LogRecord>, FileError> + Sync,
    {
        profiling::scope!("Dispatcher::dispatch");
        let start_time = std::time::Instant::now();

        let per_file: Vec<(Vec<LogRecord>, FileReport)> = self.pool.install(|| {
            paths
                .par_iter()
                .map(|path| isolate(path, || task(path)))
                .collect()
        });

        let total: usize = per_file.iter().map(|(records, _)| records.len()).sum();
        let mut output = DispatchOutput {
            records: Vec::with_capacity(total),
            files: Vec::with_capacity(per_file.len()),
        };
        for (records, report) in per_file {
            output.records.extend(records);
            output.files.push(report);
        }

        tracing::info!(
            "Dispatched {} files on {} workers: {} records, {} failed, took {:?}",
            paths.len(),
            self.max_workers(),
            output.records.len(),
            output.failed_files(),
            start_time.elapsed()
        );
        output
    }
}

/// Run one file task, turning errors and panics into an empty result
fn isolate<F>(path: &Path, task: F) -> (Vec<LogRecord>, FileReport)
where
    F: FnOnce() -> Result<Vec<LogRecord>, FileError>,
{
    let result = panic::catch_unwind(AssertUnwindSafe(task)).unwrap_or_else(|payload| {
        Err(FileError::Panic {
            path: path.to_path_buf(),
            message: panic_message(payload.as_ref()),
        })
    });

    match result {
        Ok(records) => {
            let report = FileReport {
                path: path.to_path_buf(),
                records: records.len(),
                error: None,
            };
            (records, report)
        }
        Err(e) => {
            tracing::error!("Skipping {}: {e}", path.display());
            let report = FileReport {
                path: path.to_path_buf(),
                records: 0,
                error: Some(e.to_string()),
            };
            (Vec::new(), report)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
