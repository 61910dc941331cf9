use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::level::Level;
use super::loghandle::CONSOLE;
use crate::utils::misc::strkit::is_blank;

/// Threshold name, e.g. `debug`.
pub const ENV_LOG_LEVEL: &str = "LKIT_LOG_LEVEL";
/// Text printed before every line.
pub const ENV_LOG_PREFIX: &str = "LKIT_LOG_PREFIX";
/// Directory the file handler writes `logkit.log` into.
pub const ENV_LOG_STORE_PATH: &str = "LKIT_LOG_STORE_PATH";
/// Comma separated handler names, e.g. `console,file`.
pub const ENV_LOG_HANDLERS: &str = "LKIT_LOG_HANDLERS";

/// # Log Manager Options
///
/// Everything a manager can be configured with, applied in one step through
/// [`LogMgr::apply`](super::logmgr::LogMgr::apply),
/// [`LogMgr::from_options`](super::logmgr::LogMgr::from_options) or
/// [`configure`](super::logmgr::configure).
///
/// Deserializes from any serde format; missing fields take their defaults:
///
/// ```json
/// { "level": "ERROR", "prefix": "ACORN", "store_path": "/var/log/acorn", "handlers": ["console", "file"] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogMgrOptions {
    pub level: Level,
    pub prefix: Option<String>,
    pub store_path: Option<PathBuf>,
    /// Built-in handler names to enable; unknown names are ignored.
    pub handlers: Vec<String>,
}

impl Default for LogMgrOptions {
    /// Threshold `Info`, console handler only.
    fn default() -> Self {
        Self {
            level: Level::default(),
            prefix: None,
            store_path: None,
            handlers: vec![CONSOLE.to_string()],
        }
    }
}

impl LogMgrOptions {
    /// Reads the `LKIT_LOG_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// # From Lookup
    ///
    /// Builds options from a key lookup, falling back to the defaults for
    /// every key that is unset or blank. An unparsable level also falls back.
    ///
    /// # Arguments
    /// * `lookup` - Returns the value for one of the `ENV_LOG_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !is_blank(value));
        let mut options = Self::default();

        if let Some(level) = get(ENV_LOG_LEVEL).and_then(|value| value.parse().ok()) {
            options.level = level;
        }
        options.prefix = get(ENV_LOG_PREFIX);
        options.store_path = get(ENV_LOG_STORE_PATH).map(PathBuf::from);
        if let Some(handlers) = get(ENV_LOG_HANDLERS) {
            options.handlers = handlers
                .split(',')
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect();
        }

        options
    }
}
