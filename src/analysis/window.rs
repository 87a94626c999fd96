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

use crate::parser::LogRecord;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Inclusive `[start, end]` range of interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Returns `None` if `start` is after `end`
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// `[date start_hour:00:00, date end_hour:00:00]`
    #[must_use]
    pub fn for_date(date: NaiveDate, start_hour: u32, end_hour: u32) -> Option<Self> {
        let start = date.and_hms_opt(start_hour, 0, 0)?;
        let end = date.and_hms_opt(end_hour, 0, 0)?;
        Self::new(start, end)
    }

    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }

    /// `YYYY-MM-DD HH:MM - HH:MM`
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%H:%M")
        )
    }
}

/// Records that survived the window filter plus before/after counts
#[derive(Debug, Default)]
pub struct WindowFiltered {
    pub records: Vec<LogRecord>,
    pub before: usize,
    pub after: usize,
}

/// Keep records whose timestamp lies in `window`.
///
/// Records without a timestamp are dropped. With no window every record
/// passes, including those without a timestamp.
#[must_use]
pub fn filter_window(records: Vec<LogRecord>, window: Option<&TimeWindow>) -> WindowFiltered {
    profiling::scope!("filter_window");
    let before = records.len();

    let Some(window) = window else {
        tracing::info!("Time filter disabled, keeping all {before} records");
        return WindowFiltered {
            records,
            before,
            after: before,
        };
    };

    let kept: Vec<LogRecord> = records
        .into_iter()
        .filter(|r| r.timestamp().is_some_and(|ts| window.contains(ts)))
        .collect();
    let after = kept.len();

    tracing::info!(
        "Timeframe filter: {before} -> {after} records ({} - {})",
        window.start().format("%H:%M"),
        window.end().format("%H:%M")
    );
    WindowFiltered {
        records: kept,
        before,
        after,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineParser;
    use std::sync::Arc;

    fn records(lines: &[&str]) -> Vec<LogRecord> {
        let parser = LineParser::new(false, 2023);
        let source: Arc<str> = Arc::from("window.log");
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| parser.parse_line(line, &source, i + 1))
            .collect()
    }

    fn business_hours() -> TimeWindow {
        let date = NaiveDate::from_ymd_opt(2023, 10, 1).expect("valid date");
        TimeWindow::for_date(date, 9, 14).expect("valid window")
    }

    const LINES: [&str; 6] = [
        "2023-10-01 08:59:59 ERROR too early",
        "2023-10-01 09:00:00 ERROR right at start",
        "2023-10-01 11:30:00 INFO midday",
        "2023-10-01 14:00:00 WARN right at end",
        "2023-10-01 14:00:01 ERROR too late",
        "no timestamp at all",
    ];

    #[test]
    fn test_bounds_are_inclusive() {
        let filtered = filter_window(records(&LINES), Some(&business_hours()));
        assert_eq!(filtered.before, 6);
        assert_eq!(filtered.after, 3);
        let lines: Vec<usize> = filtered.records.iter().map(LogRecord::line_number).collect();
        assert_eq!(lines, vec![2, 3, 4]);
    }

    #[test]
    fn test_disabled_filter_keeps_everything() {
        let filtered = filter_window(records(&LINES), None);
        assert_eq!(filtered.before, 6);
        assert_eq!(filtered.after, 6);
        assert!(filtered.records.iter().any(|r| r.timestamp().is_none()));
    }

    #[test]
    fn test_filter_is_stable_under_reapplication() {
        let window = business_hours();
        let once = filter_window(records(&LINES), Some(&window));
        assert!(once
            .records
            .iter()
            .all(|r| r.timestamp().is_some_and(|ts| window.contains(ts))));

        let expected = once.records.clone();
        let twice = filter_window(once.records, Some(&window));
        assert_eq!(twice.records, expected);
    }

    #[test]
    fn test_window_construction() {
        let date = NaiveDate::from_ymd_opt(2023, 10, 1).expect("valid date");
        assert!(TimeWindow::for_date(date, 14, 9).is_none());
        assert!(TimeWindow::for_date(date, 9, 24).is_none());
        assert_eq!(business_hours().label(), "2023-10-01 09:00 - 14:00");
    }

    #[test]
    fn test_empty_input() {
        let filtered = filter_window(Vec::new(), Some(&business_hours()));
        assert_eq!(filtered.before, 0);
        assert_eq!(filtered.after, 0);
    }
}
