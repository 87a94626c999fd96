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

//! Structured record types produced by the line parser.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Normalized severity token, kept in the uppercase form it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    Information,
    Warn,
    Warning,
    Error,
    Fatal,
    Critical,
    Severe,
}

impl Severity {
    /// Map a matched severity word (any case) to its canonical variant
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "TRACE" => Some(Self::Trace),
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "INFORMATION" => Some(Self::Information),
            "WARN" => Some(Self::Warn),
            "WARNING" => Some(Self::Warning),
            "ERROR" => Some(Self::Error),
            "FATAL" => Some(Self::Fatal),
            "CRITICAL" => Some(Self::Critical),
            "SEVERE" => Some(Self::Severe),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Information => "INFORMATION",
            Self::Warn => "WARN",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Fatal => "FATAL",
            Self::Critical => "CRITICAL",
            Self::Severe => "SEVERE",
        }
    }

    /// WARN or WARNING
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::Warn | Self::Warning)
    }

    /// Levels that make a line a strict error on their own.
    /// SEVERE is not part of this set.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error | Self::Fatal | Self::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure-type label assigned by the classifier.
///
/// Declaration order is the evaluation order, and therefore the order labels
/// appear in a record's category list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    CreditCardErrors,
    DatabaseErrors,
    ServerErrors,
    TimeoutErrors,
    AuthenticationErrors,
    ExceptionErrors,
}

impl Category {
    pub const ALL: [Self; 6] = [
        Self::CreditCardErrors,
        Self::DatabaseErrors,
        Self::ServerErrors,
        Self::TimeoutErrors,
        Self::AuthenticationErrors,
        Self::ExceptionErrors,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreditCardErrors => "credit_card_errors",
            Self::DatabaseErrors => "database_errors",
            Self::ServerErrors => "server_errors",
            Self::TimeoutErrors => "timeout_errors",
            Self::AuthenticationErrors => "authentication_errors",
            Self::ExceptionErrors => "exception_errors",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one line
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Classification {
    pub categories: Vec<Category>,
    pub is_warning: bool,
    pub is_error_strict: bool,
    pub has_error: bool,
}

/// One structured record per non-blank input line.
///
/// Immutable once built; fields are read through getters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    timestamp: Option<NaiveDateTime>,
    level: Option<Severity>,
    message: String,
    raw_line: String,
    categories: Vec<Category>,
    transaction_id: Option<String>,
    source_file: Arc<str>,
    line_number: usize,
    is_warning: bool,
    is_error_strict: bool,
    has_error: bool,
}

/// Intermediate pieces gathered by the line parser before a record is sealed
pub(crate) struct RecordParts {
    pub timestamp: Option<NaiveDateTime>,
    pub level: Option<Severity>,
    pub message: String,
    pub raw_line: String,
    pub transaction_id: Option<String>,
    pub classification: Classification,
}

impl LogRecord {
    pub(crate) fn from_parts(parts: RecordParts, source_file: Arc<str>, line_number: usize) -> Self {
        let RecordParts {
            timestamp,
            level,
            message,
            raw_line,
            transaction_id,
            classification,
        } = parts;
        Self {
            timestamp,
            level,
            message,
            raw_line,
            categories: classification.categories,
            transaction_id,
            source_file,
            line_number,
            is_warning: classification.is_warning,
            is_error_strict: classification.is_error_strict,
            has_error: classification.has_error,
        }
    }

    #[must_use]
    pub const fn timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamp
    }

    #[must_use]
    pub const fn level(&self) -> Option<Severity> {
        self.level
    }

    /// Residual text after the timestamp and severity tokens were removed
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Original trimmed line
    #[must_use]
    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    #[must_use]
    pub fn source_file(&self) -> &str {
        &self.source_file
    }

    /// Shared handle to the source path, cheap to clone into aggregates
    #[must_use]
    pub fn source_file_handle(&self) -> Arc<str> {
        Arc::clone(&self.source_file)
    }

    /// 1-based line number in the source file
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub const fn is_warning(&self) -> bool {
        self.is_warning
    }

    #[must_use]
    pub const fn is_error_strict(&self) -> bool {
        self.is_error_strict
    }

    /// Inclusive error flag; depends on the warnings-as-errors setting of the run
    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.has_error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_from_token_is_case_insensitive() {
        assert_eq!(Severity::from_token("warn"), Some(Severity::Warn));
        assert_eq!(Severity::from_token("Information"), Some(Severity::Information));
        assert_eq!(Severity::from_token("SEVERE"), Some(Severity::Severe));
        assert_eq!(Severity::from_token("notice"), None);
    }

    #[test]
    fn test_severity_flags() {
        assert!(Severity::Warning.is_warning());
        assert!(!Severity::Error.is_warning());
        assert!(Severity::Critical.is_error());
        assert!(!Severity::Severe.is_error());
    }

    #[test]
    fn test_labels_serialize_in_canonical_form() {
        let level = serde_json::to_string(&Severity::Information).expect("serialize level");
        assert_eq!(level, "\"INFORMATION\"");
        let category =
            serde_json::to_string(&Category::CreditCardErrors).expect("serialize category");
        assert_eq!(category, "\"credit_card_errors\"");
    }

    #[test]
    fn test_category_order_matches_declaration() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }
}
