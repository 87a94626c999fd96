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

use super::bucket::{range_label, BucketWidth};
use crate::parser::{Category, LogRecord};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

pub const MAX_PEAK_PERIODS: usize = 5;
pub const MAX_PEAK_CATEGORIES: usize = 3;

/// A five-minute bucket ranked among the busiest by error count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeakPeriod {
    /// `HH:MM - HH:MM`
    pub time_period: String,
    pub start_time: NaiveDateTime,
    pub error_count: usize,
    /// Most frequent categories in the bucket, with their counts
    pub top_error_categories: Vec<(Category, usize)>,
    pub affected_files: usize,
    pub unique_transactions: usize,
}

/// Group error records into five-minute buckets and return the busiest ones.
///
/// Ranking is by error count, earlier bucket first on ties. Error records
/// without a timestamp cannot be bucketed and are ignored.
#[must_use]
pub fn identify_peak_periods(records: &[LogRecord]) -> Vec<PeakPeriod> {
    profiling::scope!("identify_peak_periods");
    let width = BucketWidth::FiveMinutes;

    let mut buckets: BTreeMap<NaiveDateTime, Vec<&LogRecord>> = BTreeMap::new();
    for record in records.iter().filter(|r| r.has_error()) {
        if let Some(ts) = record.timestamp() {
            buckets.entry(width.floor(ts)).or_default().push(record);
        }
    }

    let mut ranked: Vec<(NaiveDateTime, Vec<&LogRecord>)> = buckets.into_iter().collect();
    // Stable sort keeps chronological order within equal counts
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()));

    ranked
        .into_iter()
        .take(MAX_PEAK_PERIODS)
        .map(|(start, members)| PeakPeriod {
            time_period: range_label(start, width),
            start_time: start,
            error_count: members.len(),
            top_error_categories: top_categories(&members, MAX_PEAK_CATEGORIES),
            affected_files: members
                .iter()
                .map(|r| r.source_file())
                .collect::<HashSet<_>>()
                .len(),
            unique_transactions: members
                .iter()
                .filter_map(|r| r.transaction_id())
                .collect::<HashSet<_>>()
                .len(),
        })
        .collect()
}

/// Up to `limit` categories by frequency; ties keep declaration order
pub(crate) fn top_categories(records: &[&LogRecord], limit: usize) -> Vec<(Category, usize)> {
    let mut counts: Vec<(Category, usize)> = Category::ALL
        .iter()
        .map(|&category| {
            let count = records
                .iter()
                .map(|r| r.categories().iter().filter(|&&c| c == category).count())
                .sum();
            (category, count)
        })
        .filter(|&(_, count)| count > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineParser;
    use std::sync::Arc;

    fn parse(lines: &[(&str, &str)]) -> Vec<LogRecord> {
        let parser = LineParser::new(false, 2023);
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, (file, line))| {
                let source: Arc<str> = Arc::from(*file);
                parser.parse_line(line, &source, i + 1)
            })
            .collect()
    }

    #[test]
    fn test_busiest_bucket_first() {
        let records = parse(&[
            ("a.log", "2023-10-01 10:00:10 ERROR database error txn id: T1"),
            ("a.log", "2023-10-01 10:06:00 ERROR database error txn id: T1"),
            ("b.log", "2023-10-01 10:07:00 ERROR request timeout txn id: T2"),
            ("b.log", "2023-10-01 10:08:59 ERROR database error"),
            ("a.log", "2023-10-01 10:09:00 INFO not an error"),
        ]);
        let peaks = identify_peak_periods(&records);

        assert_eq!(peaks.len(), 2);
        let first = &peaks[0];
        assert_eq!(first.time_period, "10:05 - 10:10");
        assert_eq!(first.error_count, 3);
        assert_eq!(first.affected_files, 2);
        assert_eq!(first.unique_transactions, 2);
        assert_eq!(
            first.top_error_categories,
            vec![(Category::DatabaseErrors, 2), (Category::TimeoutErrors, 1)]
        );
        assert_eq!(peaks[1].time_period, "10:00 - 10:05");
    }

    #[test]
    fn test_ties_go_to_earlier_bucket_and_top_five_only() {
        let lines: Vec<String> = (0..7)
            .map(|i| format!("2023-10-01 1{i}:00:00 ERROR boom"))
            .collect();
        let pairs: Vec<(&str, &str)> = lines.iter().map(|l| ("x.log", l.as_str())).collect();
        let peaks = identify_peak_periods(&parse(&pairs));

        assert_eq!(peaks.len(), MAX_PEAK_PERIODS);
        let starts: Vec<String> = peaks.iter().map(|p| p.time_period.clone()).collect();
        assert_eq!(
            starts,
            vec![
                "10:00 - 10:05",
                "11:00 - 11:05",
                "12:00 - 12:05",
                "13:00 - 13:05",
                "14:00 - 14:05"
            ]
        );
    }

    #[test]
    fn test_top_categories_limit_and_tie_order() {
        let records = parse(&[(
            "a.log",
            "2023-10-01 10:00:00 ERROR payment failed: access denied after deadlock, request timeout",
        )]);
        let refs: Vec<&LogRecord> = records.iter().collect();
        let top = top_categories(&refs, 3);
        assert_eq!(
            top,
            vec![
                (Category::CreditCardErrors, 1),
                (Category::DatabaseErrors, 1),
                (Category::TimeoutErrors, 1)
            ]
        );
    }

    #[test]
    fn test_no_errors_no_peaks() {
        let records = parse(&[("a.log", "2023-10-01 10:00:00 INFO fine")]);
        assert!(identify_peak_periods(&records).is_empty());
        assert!(identify_peak_periods(&[]).is_empty());
    }
}
