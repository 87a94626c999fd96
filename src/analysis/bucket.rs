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

use chrono::{DateTime, NaiveDateTime, TimeDelta};

/// Fixed bucket widths used by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketWidth {
    /// Burst detection
    OneMinute,
    /// Peak periods
    FiveMinutes,
    /// Timeline
    FifteenMinutes,
    /// Peak hour
    OneHour,
}

impl BucketWidth {
    #[must_use]
    pub const fn seconds(self) -> i64 {
        match self {
            Self::OneMinute => 60,
            Self::FiveMinutes => 5 * 60,
            Self::FifteenMinutes => 15 * 60,
            Self::OneHour => 60 * 60,
        }
    }

    #[must_use]
    pub const fn duration(self) -> TimeDelta {
        TimeDelta::seconds(self.seconds())
    }

    /// `timestamp - (timestamp mod width)`
    #[must_use]
    pub fn floor(self, timestamp: NaiveDateTime) -> NaiveDateTime {
        let secs = timestamp.and_utc().timestamp();
        let floored = secs - secs.rem_euclid(self.seconds());
        DateTime::from_timestamp(floored, 0).map_or(timestamp, |dt| dt.naive_utc())
    }
}

/// `HH:MM`
#[must_use]
pub fn hour_minute(timestamp: NaiveDateTime) -> String {
    timestamp.format("%H:%M").to_string()
}

/// `HH:MM - HH:MM` for a bucket starting at `start`
#[must_use]
pub fn range_label(start: NaiveDateTime, width: BucketWidth) -> String {
    format!(
        "{} - {}",
        hour_minute(start),
        hour_minute(start + width.duration())
    )
}
