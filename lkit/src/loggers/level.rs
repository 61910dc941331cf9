use std::fmt;
use std::str::FromStr;

use colored::Color;
use serde::{Deserialize, Serialize};

use super::error::LogError;

/// # Level
///
/// Severity of a record, numbered from the most verbose (`Trace = 0`) to the
/// most severe (`Error = 4`).
///
/// The same type is used for the manager threshold. The gate is
/// `level <= threshold` (see [`Level::admits`]): the threshold is a ceiling on
/// the numeric value, not a floor. With the default threshold `Info`, `Warn`
/// and `Error` records are dropped; a threshold of `Error` lets everything
/// through and `Trace` lets only `Trace` through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Trace = 0,
    Debug = 1,
    #[default]
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl Level {
    /// Every level, in numeric order.
    pub const ALL: [Level; 5] = [Level::Trace, Level::Debug, Level::Info, Level::Warn, Level::Error];

    /// Upper-case name as printed in log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Whether a record at `level` passes when `self` is the threshold.
    pub fn admits(self, level: Level) -> bool {
        level <= self
    }

    /// Console color: red for `Error`, yellow for `Warn`, none otherwise.
    pub fn color(self) -> Option<Color> {
        match self {
            Level::Error => Some(Color::Red),
            Level::Warn => Some(Color::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LogError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LogError::UnknownLevel(s.to_string()))
    }
}
