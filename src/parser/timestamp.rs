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

//! Timestamp recognition across the supported text log formats.
//!
//! Matchers are tried in a fixed priority order. Within one matcher only the
//! first textual occurrence in the line is considered; if that occurrence does
//! not parse, the next matcher gets its turn.

use chrono::NaiveDateTime;
use fancy_regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

// ISO 8601: 2023-10-01T14:30:45.123Z, 2023-10-01 14:30:45+02:00
static ISO_8601: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(?:\.\d{3})?(?:Z|[+-]\d{2}:?\d{2})?)")
        .expect("valid regex literal")
});

// Syslog: Oct 01 14:30:45 (no year)
static SYSLOG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Za-z]{3} \d{1,2} \d{2}:\d{2}:\d{2})").expect("valid regex literal")
});

// Apache/Nginx combined log: [01/Oct/2023:14:30:45 +0000]
static WEB_SERVER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d{2}/[A-Za-z]{3}/\d{4}:\d{2}:\d{2}:\d{2}(?: [+-]\d{4})?)\]")
        .expect("valid regex literal")
});

// 2023-10-01 14:30:45
static PLAIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})").expect("valid regex literal")
});

// 10/01/2023 14:30:45
static US_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}/\d{1,2}/\d{4} \d{2}:\d{2}:\d{2})").expect("valid regex literal")
});

// 2023-10-01 14:30:45.123
static PLAIN_MILLIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})").expect("valid regex literal")
});

/// Which matcher recognized a timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    Iso8601,
    Syslog,
    WebServer,
    Plain,
    UsDate,
    PlainMillis,
}

impl TimestampFormat {
    /// Matchers in priority order
    pub const PRIORITY: [Self; 6] = [
        Self::Iso8601,
        Self::Syslog,
        Self::WebServer,
        Self::Plain,
        Self::UsDate,
        Self::PlainMillis,
    ];

    fn pattern(self) -> &'static Regex {
        match self {
            Self::Iso8601 => &ISO_8601,
            Self::Syslog => &SYSLOG,
            Self::WebServer => &WEB_SERVER,
            Self::Plain => &PLAIN,
            Self::UsDate => &US_DATE,
            Self::PlainMillis => &PLAIN_MILLIS,
        }
    }

    /// chrono format for the fixed-width date-time core
    const fn chrono_format(self) -> &'static str {
        match self {
            Self::Iso8601 | Self::Plain | Self::PlainMillis => "%Y-%m-%d %H:%M:%S",
            Self::Syslog => "%Y %b %d %H:%M:%S",
            Self::WebServer => "%d/%b/%Y:%H:%M:%S",
            Self::UsDate => "%m/%d/%Y %H:%M:%S",
        }
    }

    /// Width of the date-time core; anything after it (zone, millis) is noise
    const fn core_width(self) -> usize {
        match self {
            Self::WebServer => 20,
            Self::Iso8601 | Self::Syslog | Self::Plain | Self::UsDate | Self::PlainMillis => 19,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iso8601 => "iso8601",
            Self::Syslog => "syslog",
            Self::WebServer => "web_server",
            Self::Plain => "plain",
            Self::UsDate => "us_date",
            Self::PlainMillis => "plain_millis",
        }
    }

    /// Parse a matched substring; `syslog_year` fills in the missing year
    fn parse(self, matched: &str, syslog_year: i32) -> Option<NaiveDateTime> {
        let normalized = match self {
            Self::Iso8601 => matched.replace(['T', 't'], " ").trim_end_matches(['Z', 'z']).to_string(),
            Self::Syslog | Self::WebServer | Self::Plain | Self::UsDate | Self::PlainMillis => {
                matched.to_string()
            }
        };
        let core = truncate_chars(&normalized, self.core_width());

        let result = match self {
            Self::Syslog => {
                let with_year = format!("{syslog_year} {core}");
                NaiveDateTime::parse_from_str(&with_year, self.chrono_format())
            }
            Self::Iso8601 | Self::WebServer | Self::Plain | Self::UsDate | Self::PlainMillis => {
                NaiveDateTime::parse_from_str(core, self.chrono_format())
            }
        };

        match result {
            Ok(ts) => Some(ts),
            Err(e) => {
                tracing::trace!(
                    "Failed to parse timestamp '{matched}' as {}: {e}",
                    self.as_str()
                );
                None
            }
        }
    }
}

/// A recognized timestamp together with the rest of its line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampMatch {
    pub timestamp: NaiveDateTime,
    pub format: TimestampFormat,
    /// Text after the matched span, trimmed. Anything before it is dropped.
    pub residual: String,
}

/// Try every matcher in priority order and return the first one that parses.
#[must_use]
pub fn detect_timestamp(line: &str, syslog_year: i32) -> Option<TimestampMatch> {
    for format in TimestampFormat::PRIORITY {
        let Ok(Some(caps)) = format.pattern().captures(line) else {
            continue;
        };
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        if let Some(timestamp) = format.parse(inner.as_str(), syslog_year) {
            return Some(TimestampMatch {
                timestamp,
                format,
                residual: line[whole.end()..].trim().to_string(),
            });
        }
    }
    None
}

/// First `n` characters of `s`, respecting char boundaries
fn truncate_chars(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(idx, _)| &s[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, s))
            .expect("valid test date")
    }

    #[test]
    fn test_iso_with_millis_and_zulu() {
        let m = detect_timestamp("2023-10-01T15:15:30.123Z INFO User login successful", 2023)
            .expect("iso timestamp");
        assert_eq!(m.timestamp, at(2023, 10, 1, 15, 15, 30));
        assert_eq!(m.format, TimestampFormat::Iso8601);
        assert_eq!(m.residual, "INFO User login successful");
    }

    #[test]
    fn test_iso_offset_is_discarded() {
        let m = detect_timestamp("2023-10-01T08:00:00+02:00 started", 2023).expect("iso offset");
        assert_eq!(m.timestamp, at(2023, 10, 1, 8, 0, 0));
    }

    #[test]
    fn test_space_separated_date_time_wins_as_iso() {
        let m = detect_timestamp("2023-10-01 14:30:45 ERROR boom", 2023).expect("plain");
        assert_eq!(m.format, TimestampFormat::Iso8601);
        assert_eq!(m.timestamp, at(2023, 10, 1, 14, 30, 45));
    }

    #[test]
    fn test_syslog_uses_supplied_year() {
        let m = detect_timestamp("Oct 01 14:40:15 CRITICAL HTTP/1.1 500", 2021).expect("syslog");
        assert_eq!(m.format, TimestampFormat::Syslog);
        assert_eq!(m.timestamp, at(2021, 10, 1, 14, 40, 15));
        assert_eq!(m.residual, "CRITICAL HTTP/1.1 500");
    }

    #[test]
    fn test_syslog_single_digit_day() {
        let m = detect_timestamp("Oct 1 04:05:06 kernel: ok", 2024).expect("syslog");
        assert_eq!(m.timestamp, at(2024, 10, 1, 4, 5, 6));
    }

    #[test]
    fn test_web_server_bracketed() {
        let m = detect_timestamp("[01/Oct/2023:14:35:22 +0000] WARN Cannot connect to database", 2023)
            .expect("web server");
        assert_eq!(m.format, TimestampFormat::WebServer);
        assert_eq!(m.timestamp, at(2023, 10, 1, 14, 35, 22));
        assert_eq!(m.residual, "WARN Cannot connect to database");
    }

    #[test]
    fn test_web_server_residual_starts_after_timestamp() {
        let line = r#"127.0.0.1 - - [01/Oct/2023:14:35:22 +0000] "GET / HTTP/1.1" 503"#;
        let m = detect_timestamp(line, 2023).expect("web server");
        assert_eq!(m.residual, r#""GET / HTTP/1.1" 503"#);
    }

    #[test]
    fn test_us_date() {
        let m = detect_timestamp("10/01/2023 09:15:00 job done", 2023).expect("us date");
        assert_eq!(m.format, TimestampFormat::UsDate);
        assert_eq!(m.timestamp, at(2023, 10, 1, 9, 15, 0));
    }

    #[test]
    fn test_unparseable_syslog_candidate_falls_through() {
        // "Foo 12 10:00:00" looks like syslog but Foo is no month
        let m = detect_timestamp("Foo 12 10:00:00 at 10/02/2023 11:00:00", 2023)
            .expect("falls through to us date");
        assert_eq!(m.format, TimestampFormat::UsDate);
        assert_eq!(m.timestamp, at(2023, 10, 2, 11, 0, 0));
    }

    #[test]
    fn test_invalid_calendar_date_is_rejected() {
        assert!(detect_timestamp("2023-13-45 25:61:61 nonsense", 2023).is_none());
    }

    #[test]
    fn test_no_timestamp() {
        assert!(detect_timestamp("just some text", 2023).is_none());
    }

    #[test]
    fn test_timestamp_at_end_leaves_empty_residual() {
        let m = detect_timestamp("finished at 2023-10-01 14:30:45", 2023).expect("iso");
        assert_eq!(m.residual, "");
    }
}
