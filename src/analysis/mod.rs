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

//! Temporal analysis of parsed records.
//!
//! The analyzer is sequential and works on an immutable snapshot. Every
//! aggregate degrades to zero or empty values on empty input.

pub mod bucket;
pub mod patterns;
pub mod peaks;
pub mod summary;
pub mod timeline;
pub mod window;

pub use bucket::BucketWidth;
pub use patterns::{CascadingFailure, ErrorBurst};
pub use peaks::PeakPeriod;
pub use summary::{ErrorPatterns, SummaryStats};
pub use timeline::TimelineBucket;
pub use window::{TimeWindow, WindowFiltered};

use crate::parser::LogRecord;
use serde::Serialize;
use std::cmp::Ordering;

/// Everything derived from one filtered record set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub records_before_filter: usize,
    pub records_analyzed: usize,
    pub patterns: ErrorPatterns,
    pub peak_periods: Vec<PeakPeriod>,
    pub timeline: Vec<TimelineBucket>,
    pub summary: SummaryStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalAnalyzer {
    window: TimeWindow,
    window_enabled: bool,
}

impl TemporalAnalyzer {
    #[must_use]
    pub const fn new(window: TimeWindow, window_enabled: bool) -> Self {
        Self {
            window,
            window_enabled,
        }
    }

    #[must_use]
    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    #[must_use]
    pub const fn window_enabled(&self) -> bool {
        self.window_enabled
    }

    const fn active_window(&self) -> Option<&TimeWindow> {
        if self.window_enabled {
            Some(&self.window)
        } else {
            None
        }
    }

    /// Apply the window filter and put the survivors in chronological order
    #[must_use]
    pub fn filter(&self, records: Vec<LogRecord>) -> WindowFiltered {
        let mut filtered = window::filter_window(records, self.active_window());
        sort_chronologically(&mut filtered.records);
        filtered
    }

    /// Run every aggregation over already filtered records
    #[must_use]
    pub fn analyze(&self, filtered: &WindowFiltered) -> AnalysisReport {
        profiling::scope!("TemporalAnalyzer::analyze");
        let start_time = std::time::Instant::now();
        let records = filtered.records.as_slice();

        let patterns = summary::analyze_error_patterns(records);
        let peak_periods = peaks::identify_peak_periods(records);
        let timeline = timeline::generate_timeline(records);
        let summary =
            SummaryStats::new(records, &patterns, peak_periods.len(), self.active_window());

        tracing::info!(
            "Analyzed {} records: {} errors, {} peak periods, {} cascades, {} bursts in {:?}",
            records.len(),
            patterns.total_errors,
            peak_periods.len(),
            patterns.cascading_failures.len(),
            patterns.error_bursts.len(),
            start_time.elapsed()
        );

        AnalysisReport {
            records_before_filter: filtered.before,
            records_analyzed: filtered.after,
            patterns,
            peak_periods,
            timeline,
            summary,
        }
    }
}

/// Order by `(timestamp, source_file, line_number)`; untimed records last
pub fn sort_chronologically(records: &mut [LogRecord]) {
    records.sort_by(|a, b| {
        let by_time = match (a.timestamp(), b.timestamp()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_time
            .then_with(|| a.source_file().cmp(b.source_file()))
            .then_with(|| a.line_number().cmp(&b.line_number()))
    });
}
