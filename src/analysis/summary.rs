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

//! Aggregate error statistics over an analyzed record set.

use super::bucket::{hour_minute, BucketWidth};
use super::patterns::{detect_cascading_failures, detect_error_bursts, CascadingFailure, ErrorBurst};
use super::window::TimeWindow;
use crate::parser::{Category, LogRecord, Severity};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const MAX_TOP_FILES: usize = 10;
pub const MAX_SUMMARY_CATEGORIES: usize = 5;
pub const NO_DATA_SUMMARY: &str = "No data found in the specified timeframe";
pub const NO_FILTER_TIMEFRAME: &str = "All data (no time filter)";

/// Error totals, breakdowns and detected patterns
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ErrorPatterns {
    /// Records with `has_error`
    pub total_errors: usize,
    pub total_log_entries: usize,
    /// `total_errors / total_log_entries`, 0 for no records
    pub error_rate: f64,
    pub error_categories: BTreeMap<Category, usize>,
    pub error_levels: BTreeMap<Severity, usize>,
    /// Up to ten files by error count, most errors first
    pub top_error_files: IndexMap<String, usize>,
    /// `HH:MM` of the calendar hour with the most errors
    pub peak_hour: Option<String>,
    pub unique_transactions_with_errors: usize,
    pub cascading_failures: Vec<CascadingFailure>,
    pub error_bursts: Vec<ErrorBurst>,
    pub total_warnings: usize,
    pub total_errors_strict: usize,
}

/// Compute [`ErrorPatterns`]; empty input gives all-zero values.
#[must_use]
pub fn analyze_error_patterns(records: &[LogRecord]) -> ErrorPatterns {
    profiling::scope!("analyze_error_patterns");
    let errors: Vec<&LogRecord> = records.iter().filter(|r| r.has_error()).collect();

    let mut error_categories: BTreeMap<Category, usize> = BTreeMap::new();
    let mut error_levels: BTreeMap<Severity, usize> = BTreeMap::new();
    for record in &errors {
        for &category in record.categories() {
            *error_categories.entry(category).or_default() += 1;
        }
        if let Some(level) = record.level() {
            *error_levels.entry(level).or_default() += 1;
        }
    }

    let error_rate = if records.is_empty() {
        0.0
    } else {
        errors.len() as f64 / records.len() as f64
    };

    ErrorPatterns {
        total_errors: errors.len(),
        total_log_entries: records.len(),
        error_rate,
        error_categories,
        error_levels,
        top_error_files: top_error_files(&errors),
        peak_hour: peak_hour(&errors).map(hour_minute),
        unique_transactions_with_errors: errors
            .iter()
            .filter_map(|r| r.transaction_id())
            .collect::<HashSet<_>>()
            .len(),
        cascading_failures: detect_cascading_failures(records),
        error_bursts: detect_error_bursts(records),
        total_warnings: records.iter().filter(|r| r.is_warning()).count(),
        total_errors_strict: records.iter().filter(|r| r.is_error_strict()).count(),
    }
}

fn top_error_files(errors: &[&LogRecord]) -> IndexMap<String, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in errors {
        *counts.entry(record.source_file()).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
        .into_iter()
        .take(MAX_TOP_FILES)
        .map(|(path, count)| (path.to_string(), count))
        .collect()
}

/// Start of the calendar hour with the most errors, earliest on ties
fn peak_hour(errors: &[&LogRecord]) -> Option<NaiveDateTime> {
    let mut hours: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for ts in errors.iter().filter_map(|r| r.timestamp()) {
        *hours.entry(BucketWidth::OneHour.floor(ts)).or_default() += 1;
    }
    hours
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(hour, _)| hour)
}

/// Human-facing digest of one analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub analysis_timeframe: String,
    /// First and last timestamp seen, `N/A` without any
    pub log_coverage: String,
    pub total_log_entries: usize,
    pub total_errors: usize,
    pub total_errors_strict: usize,
    pub total_warnings: usize,
    pub error_rate_percent: f64,
    pub unique_files_analyzed: usize,
    pub unique_transactions_with_errors: usize,
    /// `category: count`, most frequent first
    pub top_error_categories: Vec<String>,
    pub peak_periods_count: usize,
    pub cascading_failures: usize,
    pub error_bursts: usize,
    pub peak_error_hour: Option<String>,
    pub time_filter_enabled: bool,
    /// Set only when there was nothing to analyze
    pub summary: Option<String>,
}

impl SummaryStats {
    #[must_use]
    pub fn new(
        records: &[LogRecord],
        patterns: &ErrorPatterns,
        peak_periods_count: usize,
        window: Option<&TimeWindow>,
    ) -> Self {
        let analysis_timeframe =
            window.map_or_else(|| NO_FILTER_TIMEFRAME.to_string(), TimeWindow::label);

        if records.is_empty() {
            return Self {
                analysis_timeframe,
                log_coverage: "N/A".to_string(),
                total_log_entries: 0,
                total_errors: 0,
                total_errors_strict: 0,
                total_warnings: 0,
                error_rate_percent: 0.0,
                unique_files_analyzed: 0,
                unique_transactions_with_errors: 0,
                top_error_categories: Vec::new(),
                peak_periods_count: 0,
                cascading_failures: 0,
                error_bursts: 0,
                peak_error_hour: None,
                time_filter_enabled: window.is_some(),
                summary: Some(NO_DATA_SUMMARY.to_string()),
            };
        }

        let timestamps = records.iter().filter_map(LogRecord::timestamp);
        let log_coverage = match (timestamps.clone().min(), timestamps.max()) {
            (Some(first), Some(last)) => format!(
                "{} - {}",
                first.format("%Y-%m-%d %H:%M"),
                last.format("%H:%M")
            ),
            _ => "N/A".to_string(),
        };

        let mut categories: Vec<(Category, usize)> = patterns
            .error_categories
            .iter()
            .map(|(&c, &n)| (c, n))
            .collect();
        categories.sort_by(|a, b| b.1.cmp(&a.1));

        Self {
            analysis_timeframe,
            log_coverage,
            total_log_entries: records.len(),
            total_errors: patterns.total_errors,
            total_errors_strict: patterns.total_errors_strict,
            total_warnings: patterns.total_warnings,
            error_rate_percent: (patterns.error_rate * 100.0 * 100.0).round() / 100.0,
            unique_files_analyzed: records
                .iter()
                .map(LogRecord::source_file)
                .collect::<HashSet<_>>()
                .len(),
            unique_transactions_with_errors: patterns.unique_transactions_with_errors,
            top_error_categories: categories
                .into_iter()
                .take(MAX_SUMMARY_CATEGORIES)
                .map(|(c, n)| format!("{c}: {n}"))
                .collect(),
            peak_periods_count,
            cascading_failures: patterns.cascading_failures.len(),
            error_bursts: patterns.error_bursts.len(),
            peak_error_hour: patterns.peak_hour.clone(),
            time_filter_enabled: window.is_some(),
            summary: None,
        }
    }
}
