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

//! Severity and correlation-key extraction.

use super::record::Severity;
use fancy_regex::Regex;
use std::sync::LazyLock;

static LOG_LEVEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(TRACE|DEBUG|INFO|INFORMATION|WARN|WARNING|ERROR|FATAL|CRITICAL|SEVERE)\b")
        .expect("valid regex literal")
});

// Tried in order, first capture wins
static TRANSACTION_PATTERNS: LazyLock<[Regex; 4]> = LazyLock::new(|| {
    [
        r"(?i)transaction[_\s]+id[:\s]+([a-zA-Z0-9\-_]+)",
        r"(?i)txn[_\s]+id[:\s]+([a-zA-Z0-9\-_]+)",
        r"(?i)order[_\s]+id[:\s]+([a-zA-Z0-9\-_]+)",
        r"(?i)ref[_\s]+id[:\s]+([a-zA-Z0-9\-_]+)",
    ]
    .map(|pattern| Regex::new(pattern).expect("valid regex literal"))
});

/// Find the first severity word and cut it out of the line.
///
/// Returns the severity (if any) and the line without the matched token.
/// Without a match the line is returned unchanged.
#[must_use]
pub fn extract_level(line: &str) -> (Option<Severity>, String) {
    let Ok(Some(caps)) = LOG_LEVEL.captures(line) else {
        return (None, line.to_string());
    };
    let Some(token) = caps.get(1) else {
        return (None, line.to_string());
    };

    let level = Severity::from_token(token.as_str());
    let remaining = format!("{}{}", &line[..token.start()], &line[token.end()..]);
    (level, remaining.trim().to_string())
}

/// Extract a transaction/order/reference id from the line
#[must_use]
pub fn extract_transaction_id(line: &str) -> Option<String> {
    TRANSACTION_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(line)
            .ok()
            .flatten()
            .and_then(|caps| caps.get(1).map(|m| m.as_str().to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_excised_from_the_middle() {
        let (level, rest) = extract_level("worker-3 error while flushing");
        assert_eq!(level, Some(Severity::Error));
        assert_eq!(rest, "worker-3  while flushing");
    }

    #[test]
    fn test_longer_alternatives_match_whole_words() {
        let (level, rest) = extract_level("WARNING disk almost full");
        assert_eq!(level, Some(Severity::Warning));
        assert_eq!(rest, "disk almost full");

        let (level, _) = extract_level("Information: cache warmed");
        assert_eq!(level, Some(Severity::Information));
    }

    #[test]
    fn test_level_requires_word_boundary() {
        let (level, rest) = extract_level("errors=0 infos=12");
        assert_eq!(level, None);
        assert_eq!(rest, "errors=0 infos=12");
    }

    #[test]
    fn test_first_level_wins() {
        let (level, rest) = extract_level("DEBUG retrying after ERROR");
        assert_eq!(level, Some(Severity::Debug));
        assert_eq!(rest, "retrying after ERROR");
    }

    #[test]
    fn test_transaction_id_variants() {
        assert_eq!(
            extract_transaction_id("timeout for transaction ID: TXN123456").as_deref(),
            Some("TXN123456")
        );
        assert_eq!(
            extract_transaction_id("txn_id=abc").as_deref(),
            None,
            "'=' is not an accepted separator"
        );
        assert_eq!(
            extract_transaction_id("TXN_ID:ab-12_c done").as_deref(),
            Some("ab-12_c")
        );
        assert_eq!(
            extract_transaction_id("shipping order id 998877").as_deref(),
            Some("998877")
        );
        assert_eq!(extract_transaction_id("ref_id: R-1").as_deref(), Some("R-1"));
    }

    #[test]
    fn test_transaction_pattern_priority() {
        let line = "order id: ORD1 failed for transaction id: TXN7";
        assert_eq!(extract_transaction_id(line).as_deref(), Some("TXN7"));
    }

    #[test]
    fn test_no_transaction_id() {
        assert_eq!(extract_transaction_id("nothing to correlate here"), None);
    }
}
