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

//! Failure classification.
//!
//! Each category owns an independent pattern set. A category is recorded once
//! if any of its patterns hits the untouched line; categories are evaluated
//! in declaration order.

use super::record::{Category, Classification, Severity};
use fancy_regex::Regex;
use std::sync::LazyLock;

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).expect("valid regex literal"))
        .collect()
}

static CATEGORY_PATTERNS: LazyLock<Vec<(Category, Vec<Regex>)>> = LazyLock::new(|| {
    vec![
        (
            Category::CreditCardErrors,
            compile(&[
                r"payment\s+gateway",
                r"credit\s+card",
                r"card\s+declined",
                r"payment\s+failed",
                r"transaction\s+timeout",
                r"authorization\s+failed",
                r"invalid\s+card",
                r"payment\s+processor",
                r"merchant\s+account",
            ]),
        ),
        (
            Category::DatabaseErrors,
            compile(&[
                r"connection\s+refused",
                r"cannot\s+connect",
                r"database\s+error",
                r"sql\s+error",
                r"timeout.*database",
                r"deadlock",
                r"connection\s+lost",
                r"mysql.*error",
                r"postgresql.*error",
                r"oracle.*error",
            ]),
        ),
        (
            Category::ServerErrors,
            compile(&[
                r"http.*50\d",
                r"status.*50\d",
                r"internal\s+server\s+error",
                r"service\s+unavailable",
                r"gateway\s+timeout",
                r"bad\s+gateway",
                r"server\s+error",
            ]),
        ),
        (
            Category::TimeoutErrors,
            compile(&[
                r"timeout",
                r"timed\s+out",
                r"connection\s+timeout",
                r"read\s+timeout",
                r"request\s+timeout",
            ]),
        ),
        (
            Category::AuthenticationErrors,
            compile(&[
                r"authentication\s+failed",
                r"unauthorized",
                r"access\s+denied",
                r"forbidden",
                r"invalid\s+credentials",
                r"login\s+failed",
            ]),
        ),
        (
            Category::ExceptionErrors,
            compile(&[
                r"exception",
                r"stack\s+trace",
                r"null\s+pointer",
                r"out\s+of\s+memory",
                r"segmentation\s+fault",
            ]),
        ),
    ]
});

// Interpreter-level warnings and deprecation notices.
// The E_* constants are matched case-sensitively.
static WARNING_PATTERNS: LazyLock<[Regex; 5]> = LazyLock::new(|| {
    [
        r"(?i)\bphp\s+warning\b",
        r"(?i)\bphp\s+notice\b",
        r"(?i)\bdeprecated\b",
        r"\bE_WARNING\b",
        r"\bE_NOTICE\b",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex literal"))
});

fn matches(pattern: &Regex, line: &str) -> bool {
    pattern.is_match(line).unwrap_or(false)
}

/// Ordered, duplicate-free category labels for a line
#[must_use]
pub fn classify_categories(line: &str) -> Vec<Category> {
    CATEGORY_PATTERNS
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|p| matches(p, line)))
        .map(|(category, _)| *category)
        .collect()
}

/// True if the line carries a warning phrase regardless of its level
#[must_use]
pub fn has_warning_phrase(line: &str) -> bool {
    WARNING_PATTERNS.iter().any(|p| matches(p, line))
}

/// Classify the original line given its extracted severity.
///
/// `warnings_as_errors` must be the same for every line of a run.
#[must_use]
pub fn classify(line: &str, level: Option<Severity>, warnings_as_errors: bool) -> Classification {
    let categories = classify_categories(line);

    let is_warning = level.is_some_and(Severity::is_warning) || has_warning_phrase(line);
    let is_error_strict = !categories.is_empty() || level.is_some_and(Severity::is_error);
    let has_error = is_error_strict || (is_warning && warnings_as_errors);

    Classification {
        categories,
        is_warning,
        is_error_strict,
        has_error,
    }
}
