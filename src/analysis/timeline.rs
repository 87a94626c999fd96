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

use super::bucket::BucketWidth;
use crate::parser::{Category, LogRecord, Severity};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregates for one fifteen-minute slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineBucket {
    pub time_bin: NaiveDateTime,
    pub total_logs: usize,
    pub total_errors: usize,
    pub level_distribution: BTreeMap<Severity, usize>,
    pub category_counts: BTreeMap<Category, usize>,
}

impl TimelineBucket {
    const fn new(time_bin: NaiveDateTime) -> Self {
        Self {
            time_bin,
            total_logs: 0,
            total_errors: 0,
            level_distribution: BTreeMap::new(),
            category_counts: BTreeMap::new(),
        }
    }

    fn add(&mut self, record: &LogRecord) {
        self.total_logs += 1;
        if record.has_error() {
            self.total_errors += 1;
        }
        if let Some(level) = record.level() {
            *self.level_distribution.entry(level).or_default() += 1;
        }
        for &category in record.categories() {
            *self.category_counts.entry(category).or_default() += 1;
        }
    }
}

/// Chronological fifteen-minute series over all records, errors or not.
///
/// Only slots that contain at least one record are present.
#[must_use]
pub fn generate_timeline(records: &[LogRecord]) -> Vec<TimelineBucket> {
    profiling::scope!("generate_timeline");
    let width = BucketWidth::FifteenMinutes;

    let mut buckets: BTreeMap<NaiveDateTime, TimelineBucket> = BTreeMap::new();
    for record in records {
        let Some(ts) = record.timestamp() else {
            continue;
        };
        let slot = width.floor(ts);
        buckets
            .entry(slot)
            .or_insert_with(|| TimelineBucket::new(slot))
            .add(record);
    }
    buckets.into_values().collect()
}
