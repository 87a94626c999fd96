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

use crate::parser::{LineParser, LogRecord};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Why a single file contributed no records
#[derive(Debug, Error)]
pub enum FileError {
    #[error("Cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot read {} at line {line}: {source}", path.display())]
    Read {
        path: PathBuf,
        line: usize,
        #[source]
        source: io::Error,
    },

    #[error("Parser panicked on {}: {message}", path.display())]
    Panic { path: PathBuf, message: String },
}

/// Parses whole files line by line
#[derive(Debug, Clone, Copy)]
pub struct LogFileParser {
    line_parser: LineParser,
    max_lines: Option<usize>,
}

impl LogFileParser {
    #[must_use]
    pub const fn new(line_parser: LineParser, max_lines: Option<usize>) -> Self {
        Self {
            line_parser,
            max_lines,
        }
    }

    #[must_use]
    pub const fn line_parser(&self) -> &LineParser {
        &self.line_parser
    }

    #[must_use]
    pub const fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    /// Parse every line of `path`, stopping after `max_lines` physical lines.
    ///
    /// Invalid UTF-8 is replaced rather than rejected. Blank lines produce no
    /// record but still count towards line numbers and the cap.
    pub fn parse(&self, path: &Path) -> Result<Vec<LogRecord>, FileError> {
        profiling::scope!("LogFileParser::parse");
        let start_time = std::time::Instant::now();

        let file = File::open(path).map_err(|source| FileError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let source_name: Arc<str> = Arc::from(path.to_string_lossy().as_ref());
        let reader = BufReader::new(file);
        let limit = self.max_lines.unwrap_or(usize::MAX);

        let mut records = Vec::new();
        let mut lines_read = 0;
        for (idx, chunk) in reader.split(b'\n').take(limit).enumerate() {
            let line_number = idx + 1;
            let bytes = chunk.map_err(|source| FileError::Read {
                path: path.to_path_buf(),
                line: line_number,
                source,
            })?;
            lines_read = line_number;

            let text = String::from_utf8_lossy(&bytes);
            if let Some(record) = self.line_parser.parse_line(&text, &source_name, line_number) {
                records.push(record);
            }
        }

        tracing::info!(
            "Parsed {} records from {} lines of {} in {:?}",
            records.len(),
            lines_read,
            path.display(),
            start_time.elapsed()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_log(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content).expect("write temp file");
        file.flush().expect("flush temp file");
        file
    }

    fn parser(max_lines: Option<usize>) -> LogFileParser {
        LogFileParser::new(LineParser::new(false, 2023), max_lines)
    }

    const SAMPLE: &str = "\
2023-10-01 09:00:00 INFO service started
2023-10-01 09:01:00 ERROR database error on shard 3

2023-10-01 09:02:00 WARN slow query
2023-10-01 09:03:00 ERROR request timeout order id: O-77
";

    #[test]
    fn test_parse_whole_file_keeps_line_order() {
        let file = write_log(SAMPLE.as_bytes());
        let records = parser(None).parse(file.path()).expect("parse");

        assert_eq!(records.len(), 4);
        let numbers: Vec<usize> = records.iter().map(LogRecord::line_number).collect();
        assert_eq!(numbers, vec![1, 2, 4, 5], "blank line 3 is skipped but counted");
        assert_eq!(records[3].transaction_id(), Some("O-77"));
    }

    #[test]
    fn test_line_cap_stops_reading() {
        let file = write_log(SAMPLE.as_bytes());
        let records = parser(Some(2)).parse(file.path()).expect("parse");
        assert_eq!(records.len(), 2);

        let none = parser(Some(0)).parse(file.path()).expect("parse");
        assert!(none.is_empty());
    }

    #[test]
    fn test_cap_larger_than_file_is_fine() {
        let file = write_log(SAMPLE.as_bytes());
        let records = parser(Some(10_000)).parse(file.path()).expect("parse");
        assert_eq!(records.len(), 4);
    }

    #[test]
    fn test_raising_the_cap_never_loses_records() {
        let file = write_log(SAMPLE.as_bytes());
        let mut previous = 0;
        for cap in 0..8 {
            let count = parser(Some(cap)).parse(file.path()).expect("parse").len();
            assert!(count >= previous, "cap {cap} produced fewer records");
            previous = count;
        }
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let mut content = b"2023-10-01 09:00:00 ERROR bad byte \xff\xfe here\n".to_vec();
        content.extend_from_slice(b"2023-10-01 09:00:01 INFO next line\r\n");
        let file = write_log(&content);
        let records = parser(None).parse(file.path()).expect("parse");

        assert_eq!(records.len(), 2);
        assert!(records[0].message().contains("bad byte"));
        assert_eq!(records[1].raw_line(), "2023-10-01 09:00:01 INFO next line");
    }

    #[test]
    fn test_missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("does-not-exist.log");
        let err = parser(None).parse(&missing).expect_err("missing file");
        assert!(matches!(err, FileError::Open { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn test_directory_is_a_read_error() {
        // Opening a directory succeeds on unix, reading it does not
        let dir = tempfile::tempdir().expect("temp dir");
        let err = parser(None).parse(dir.path()).expect_err("directory");
        assert!(matches!(err, FileError::Read { line: 1, .. }));
        assert!(err.to_string().contains("at line 1"));
    }

    #[test]
    fn test_records_carry_source_path() {
        let file = write_log(b"hello\n");
        let records = parser(None).parse(file.path()).expect("parse");
        assert_eq!(records[0].source_file(), file.path().to_string_lossy());
    }
}
