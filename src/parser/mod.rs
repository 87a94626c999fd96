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

pub mod classify;
pub mod fields;
pub mod record;
pub mod timestamp;

pub use record::{Category, Classification, LogRecord, Severity};
pub use timestamp::{detect_timestamp, TimestampFormat, TimestampMatch};

use record::RecordParts;
use std::sync::Arc;

/// Turns single lines into [`LogRecord`]s.
///
/// Holds no mutable state: the same line with the same parser always yields
/// the same record. The syslog year is fixed when the parser is built and
/// applies to every syslog line of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineParser {
    warnings_as_errors: bool,
    syslog_year: i32,
}

impl LineParser {
    #[must_use]
    pub const fn new(warnings_as_errors: bool, syslog_year: i32) -> Self {
        Self {
            warnings_as_errors,
            syslog_year,
        }
    }

    #[must_use]
    pub const fn warnings_as_errors(&self) -> bool {
        self.warnings_as_errors
    }

    #[must_use]
    pub const fn syslog_year(&self) -> i32 {
        self.syslog_year
    }

    /// Parse one line. Returns `None` for lines that are blank after trimming.
    #[must_use]
    pub fn parse_line(
        &self,
        line: &str,
        source_file: &Arc<str>,
        line_number: usize,
    ) -> Option<LogRecord> {
        let original = line.trim();
        if original.is_empty() {
            return None;
        }

        let (timestamp, after_timestamp) = match detect_timestamp(original, self.syslog_year) {
            Some(found) => (Some(found.timestamp), found.residual),
            None => (None, original.to_string()),
        };

        let (level, message) = fields::extract_level(&after_timestamp);

        // Classification and correlation always look at the untouched line
        let classification = classify::classify(original, level, self.warnings_as_errors);
        let transaction_id = fields::extract_transaction_id(original);

        Some(LogRecord::from_parts(
            RecordParts {
                timestamp,
                level,
                message,
                raw_line: original.to_string(),
                transaction_id,
                classification,
            },
            Arc::clone(source_file),
            line_number,
        ))
    }
}
