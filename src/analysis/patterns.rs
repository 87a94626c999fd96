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

//! Error bursts and cascading failures.

use super::bucket::BucketWidth;
use crate::parser::{Category, LogRecord};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// A one-minute bucket needs strictly more errors than this to be a burst
pub const BURST_THRESHOLD: usize = 5;

/// Only this many transactions (by error count) are cascade candidates
pub const MAX_CASCADE_CANDIDATES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBurst {
    pub time: NaiveDateTime,
    pub error_count: usize,
    pub description: String,
}

/// Several error records sharing one transaction id
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadingFailure {
    pub transaction_id: String,
    pub error_count: usize,
    /// Earliest and latest timestamp; `None` if no member has one
    pub first_seen: Option<NaiveDateTime>,
    pub last_seen: Option<NaiveDateTime>,
    /// Union of member categories in declaration order
    pub categories: Vec<Category>,
}

impl CascadingFailure {
    /// `first to last`, or `N/A` without timestamps
    #[must_use]
    pub fn time_span(&self) -> String {
        match (self.first_seen, self.last_seen) {
            (Some(first), Some(last)) => format!("{first} to {last}"),
            _ => "N/A".to_string(),
        }
    }
}

/// One-minute buckets of error records with more than [`BURST_THRESHOLD`]
/// entries, in chronological order.
#[must_use]
pub fn detect_error_bursts(records: &[LogRecord]) -> Vec<ErrorBurst> {
    profiling::scope!("detect_error_bursts");
    let width = BucketWidth::OneMinute;

    let mut minutes: BTreeMap<NaiveDateTime, usize> = BTreeMap::new();
    for ts in records
        .iter()
        .filter(|r| r.has_error())
        .filter_map(LogRecord::timestamp)
    {
        *minutes.entry(width.floor(ts)).or_default() += 1;
    }

    minutes
        .into_iter()
        .filter(|&(_, count)| count > BURST_THRESHOLD)
        .map(|(minute, count)| ErrorBurst {
            time: minute,
            error_count: count,
            description: format!(
                "{count} errors in 1 minute starting at {}",
                minute.format("%H:%M:%S")
            ),
        })
        .collect()
}

/// Transactions with more than one error record.
///
/// Transactions are ranked by error count (ties by id) and only the top
/// [`MAX_CASCADE_CANDIDATES`] are considered, so a run with many failing
/// transactions reports at most that many cascades.
#[must_use]
pub fn detect_cascading_failures(records: &[LogRecord]) -> Vec<CascadingFailure> {
    profiling::scope!("detect_cascading_failures");

    let mut by_transaction: HashMap<&str, Vec<&LogRecord>> = HashMap::new();
    for record in records.iter().filter(|r| r.has_error()) {
        if let Some(txn) = record.transaction_id() {
            by_transaction.entry(txn).or_default().push(record);
        }
    }

    let mut ranked: Vec<(&str, Vec<&LogRecord>)> = by_transaction.into_iter().collect();
    ranked.sort_by(|a, b| b.1.len().cmp(&a.1.len()).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(MAX_CASCADE_CANDIDATES)
        .filter(|(_, members)| members.len() > 1)
        .map(|(txn, members)| {
            let timestamps = members.iter().filter_map(|r| r.timestamp());
            let first_seen = timestamps.clone().min();
            let last_seen = timestamps.max();
            let categories = Category::ALL
                .into_iter()
                .filter(|c| members.iter().any(|r| r.categories().contains(c)))
                .collect();
            CascadingFailure {
                transaction_id: txn.to_string(),
                error_count: members.len(),
                first_seen,
                last_seen,
                categories,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LineParser;
    use std::sync::Arc;

    fn parse(lines: &[String]) -> Vec<LogRecord> {
        let parser = LineParser::new(false, 2023);
        let source: Arc<str> = Arc::from("patterns.log");
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| parser.parse_line(line, &source, i + 1))
            .collect()
    }

    fn errors_in_minute(count: usize, minute: u32) -> Vec<String> {
        (0..count)
            .map(|s| format!("2023-10-01 10:{minute:02}:{:02} ERROR boom", s * 7))
            .collect()
    }

    #[test]
    fn test_five_errors_are_not_a_burst() {
        let records = parse(&errors_in_minute(5, 15));
        assert!(detect_error_bursts(&records).is_empty());
    }

    #[test]
    fn test_six_errors_in_one_minute_are_one_burst() {
        let mut lines = errors_in_minute(6, 15);
        lines.push("2023-10-01 10:20:00 ERROR sparse".to_string());
        lines.push("2023-10-01 10:16:00 INFO quiet".to_string());
        let bursts = detect_error_bursts(&parse(&lines));

        assert_eq!(bursts.len(), 1);
        let burst = &bursts[0];
        assert_eq!(burst.error_count, 6);
        assert_eq!(burst.time.format("%H:%M:%S").to_string(), "10:15:00");
        assert_eq!(burst.description, "6 errors in 1 minute starting at 10:15:00");
    }

    #[test]
    fn test_non_errors_do_not_feed_bursts() {
        let lines: Vec<String> = (0..10)
            .map(|s| format!("2023-10-01 10:15:{s:02} INFO heartbeat"))
            .collect();
        assert!(detect_error_bursts(&parse(&lines)).is_empty());
    }

    #[test]
    fn test_single_error_transaction_is_not_a_cascade() {
        let lines = vec![
            "2023-10-01 10:00:00 ERROR payment failed txn id: ONE".to_string(),
            "2023-10-01 10:01:00 INFO retry txn id: ONE".to_string(),
        ];
        assert!(detect_cascading_failures(&parse(&lines)).is_empty());
    }

    #[test]
    fn test_two_errors_make_a_cascade() {
        let lines = vec![
            "2023-10-01 10:00:00 ERROR payment failed txn id: TWO".to_string(),
            "2023-10-01 10:01:00 ERROR boom txn id: TWO".to_string(),
        ];
        let cascades = detect_cascading_failures(&parse(&lines));
        assert_eq!(cascades.len(), 1);
        assert_eq!(cascades[0].error_count, 2);
    }

    #[test]
    fn test_cascade_span_and_category_union() {
        let lines = vec![
            "2023-10-01 10:05:00 ERROR request timeout transaction id: TXN9".to_string(),
            "2023-10-01 10:00:00 ERROR card declined transaction id: TXN9".to_string(),
            "2023-10-01 10:10:00 ERROR database error transaction id: TXN9".to_string(),
            "2023-10-01 10:03:00 ERROR unrelated failure".to_string(),
        ];
        let cascades = detect_cascading_failures(&parse(&lines));

        assert_eq!(cascades.len(), 1);
        let cascade = &cascades[0];
        assert_eq!(cascade.transaction_id, "TXN9");
        assert_eq!(cascade.error_count, 3);
        assert_eq!(
            cascade.categories,
            vec![
                Category::CreditCardErrors,
                Category::DatabaseErrors,
                Category::TimeoutErrors
            ]
        );
        assert_eq!(
            cascade.time_span(),
            "2023-10-01 10:00:00 to 2023-10-01 10:10:00"
        );
    }

    #[test]
    fn test_only_top_ten_transactions_are_candidates() {
        // Twelve transactions with two errors each; ids sort T00..T11
        let lines: Vec<String> = (0..12)
            .flat_map(|t| {
                (0..2).map(move |i| format!("2023-10-01 10:{t:02}:{i:02} ERROR boom txn id: T{t:02}"))
            })
            .collect();
        let cascades = detect_cascading_failures(&parse(&lines));

        assert_eq!(cascades.len(), MAX_CASCADE_CANDIDATES);
        assert_eq!(cascades[0].transaction_id, "T00");
        assert_eq!(cascades[9].transaction_id, "T09");
    }

    #[test]
    fn test_empty_input_yields_no_patterns() {
        assert!(detect_error_bursts(&[]).is_empty());
        assert!(detect_cascading_failures(&[]).is_empty());
    }
}
