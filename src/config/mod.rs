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

use crate::analysis::TimeWindow;
use chrono::{Datelike, Days, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_MAX_WORKERS: usize = 4;
pub const DEFAULT_WINDOW_START_HOUR: u32 = 9;
pub const DEFAULT_WINDOW_END_HOUR: u32 = 14;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid target date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("max_workers must be at least 1")]
    NoWorkers,

    #[error("Invalid time window {start}:00 - {end}:00")]
    InvalidWindow { start: u32, end: u32 },

    #[error("Could not determine yesterday's date")]
    NoDefaultDate,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Analyzer settings as stored in `config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Count warnings as errors for `has_error`
    pub warnings_as_errors: bool,
    pub max_workers: usize,
    /// Stop reading each file after this many lines
    pub max_lines_per_file: Option<usize>,
    pub time_window_enabled: bool,
    /// `YYYY-MM-DD`; yesterday when unset
    pub target_date: Option<String>,
    pub window_start_hour: u32,
    pub window_end_hour: u32,
    /// Year for syslog timestamps; current year when unset
    pub syslog_year: Option<i32>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            warnings_as_errors: false,
            max_workers: DEFAULT_MAX_WORKERS,
            max_lines_per_file: None,
            time_window_enabled: true,
            target_date: None,
            window_start_hour: DEFAULT_WINDOW_START_HOUR,
            window_end_hour: DEFAULT_WINDOW_END_HOUR,
            syslog_year: None,
        }
    }
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub warnings_as_errors: bool,
    pub max_workers: usize,
    pub max_lines_per_file: Option<usize>,
    pub time_window_enabled: bool,
    pub target_date: NaiveDate,
    pub window: TimeWindow,
    pub syslog_year: i32,
}

impl AnalyzerConfig {
    /// Get the path to the default config file
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("logtriage").join("config.json"))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load the default config file, returning defaults if there is none
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => {
                tracing::info!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check every setting and resolve dates relative to the local clock
    pub fn validate(&self) -> Result<ResolvedConfig, ConfigError> {
        let today = Local::now().date_naive();
        self.validate_at(today)
    }

    /// [`Self::validate`] with an explicit "today"
    pub fn validate_at(&self, today: NaiveDate) -> Result<ResolvedConfig, ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::NoWorkers);
        }

        let target_date = match &self.target_date {
            Some(text) => NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
                .map_err(|_| ConfigError::InvalidDate(text.clone()))?,
            None => today
                .checked_sub_days(Days::new(1))
                .ok_or(ConfigError::NoDefaultDate)?,
        };

        let window =
            TimeWindow::for_date(target_date, self.window_start_hour, self.window_end_hour)
                .ok_or(ConfigError::InvalidWindow {
                    start: self.window_start_hour,
                    end: self.window_end_hour,
                })?;

        Ok(ResolvedConfig {
            warnings_as_errors: self.warnings_as_errors,
            max_workers: self.max_workers,
            max_lines_per_file: self.max_lines_per_file,
            time_window_enabled: self.time_window_enabled,
            target_date,
            window,
            syslog_year: self.syslog_year.unwrap_or_else(|| today.year()),
        })
    }
}
