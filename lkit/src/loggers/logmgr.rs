use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Local;
use colored::Color;
use static_init::dynamic;

use super::callsite::Callsite;
use super::error::LogError;
use super::level::Level;
use super::loghandle::{ConsoleHandler, ConsoleOut, FileHandler, LogHandler, CONSOLE, FILE};
use super::logrecord::Logrecord;
use super::options::LogMgrOptions;
use crate::utils::misc::strkit::{self, Arg, PLACEHOLDER};

#[dynamic(lazy)]
/// The process-wide manager behind [`log`], [`configure`] and the level functions.
static DEFAULT_MGR: RwLock<LogMgr> = RwLock::new(LogMgr::new());

/// # Log Settings
///
/// The part of a manager's state that records carry to handlers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogSettings {
    pub(crate) level: Level,
    pub(crate) prefix: String,
    pub(crate) store_path: Option<PathBuf>,
}

impl LogSettings {
    /// The threshold.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Text printed before every line; empty when unset.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Directory the built-in file handler writes `logkit.log` into.
    pub fn store_path(&self) -> Option<&Path> {
        self.store_path.as_deref()
    }
}

/// # Log Manager
///
/// Holds the threshold, prefix and store path, and the handlers records are
/// dispatched to, keyed by name.
///
/// A fresh manager has threshold `Info` and a console handler registered.
/// Configuration methods return `&mut Self` so they chain; emitting only
/// needs `&self`, so a configured manager can be shared across threads
/// (e.g. in an `Arc`). Handlers run in name order.
///
/// ```no_run
/// use lkit::{Level, LogMgr};
///
/// let mut mgr = LogMgr::new();
/// mgr.set_prefix("ACORN").set_level(Level::Error).set_store_path("/var/log/acorn").enable_handler("file");
/// mgr.info("id {} name {}", &[1.into(), "wty".into()]);
/// ```
pub struct LogMgr {
    settings: LogSettings,
    handlers: BTreeMap<String, Box<dyn LogHandler>>,
    console: ConsoleOut,
}

impl LogMgr {
    /// A manager printing to stdout.
    pub fn new() -> Self {
        Self::with_console(ConsoleOut::stdout())
    }

    /// A manager whose console handler and warnings go to `console`.
    pub fn with_console(console: ConsoleOut) -> Self {
        let mut mgr = Self::bare(console);
        mgr.enable_handler(CONSOLE);
        mgr
    }

    /// # From Options
    ///
    /// Builds a manager with exactly the handlers `options` lists, printing to
    /// stdout. Use this to run without a console handler.
    pub fn from_options(options: &LogMgrOptions) -> Self {
        let mut mgr = Self::bare(ConsoleOut::stdout());
        mgr.apply(options);
        mgr
    }

    fn bare(console: ConsoleOut) -> Self {
        Self {
            settings: LogSettings::default(),
            handlers: BTreeMap::new(),
            console,
        }
    }

    /// Sets the threshold. A record passes when its level is at most this one.
    pub fn set_level(&mut self, level: Level) -> &mut Self {
        self.settings.level = level;
        self
    }

    /// Sets the directory the built-in file handler writes into.
    pub fn set_store_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.settings.store_path = Some(path.into());
        self
    }

    /// Sets the text printed, followed by a space, before every line.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) -> &mut Self {
        self.settings.prefix = prefix.into();
        self
    }

    /// # Enable Handler
    ///
    /// Registers a built-in handler by name: `"console"` or `"file"`. Names
    /// already registered and unknown names are ignored.
    pub fn enable_handler(&mut self, name: &str) -> &mut Self {
        let handler: Box<dyn LogHandler> = match name {
            CONSOLE => Box::new(ConsoleHandler::new(self.console.clone())),
            FILE => Box::new(FileHandler::new()),
            _ => return self,
        };
        self.add_handler(handler)
    }

    /// Registers `handler` unless its name is taken; the first one wins.
    pub fn add_handler(&mut self, handler: Box<dyn LogHandler>) -> &mut Self {
        if let Entry::Vacant(slot) = self.handlers.entry(handler.name().to_string()) {
            slot.insert(handler);
        }
        self
    }

    /// [`add_handler`](Self::add_handler) for each element, in order.
    pub fn add_handlers<I>(&mut self, handlers: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn LogHandler>>,
    {
        for handler in handlers {
            self.add_handler(handler);
        }
        self
    }

    /// # Apply
    ///
    /// Replaces threshold, prefix and store path with those in `options` and
    /// enables each listed handler. Handlers are never removed.
    pub fn apply(&mut self, options: &LogMgrOptions) -> &mut Self {
        self.settings.level = options.level;
        self.settings.prefix = options.prefix.clone().unwrap_or_default();
        self.settings.store_path = options.store_path.clone();
        for name in &options.handlers {
            self.enable_handler(name);
        }
        self
    }

    pub fn settings(&self) -> &LogSettings {
        &self.settings
    }

    pub fn level(&self) -> Level {
        self.settings.level
    }

    pub fn prefix(&self) -> &str {
        self.settings.prefix()
    }

    pub fn store_path(&self) -> Option<&Path> {
        self.settings.store_path()
    }

    /// Registered handler names, sorted.
    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn has_handler(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Whether a record at `level` would reach the handlers.
    pub fn is_enabled(&self, level: Level) -> bool {
        self.settings.level.admits(level)
    }

    /// Emits a record at `level`, attributed to the caller.
    #[track_caller]
    pub fn log(&self, level: Level, template: &str, args: &[Arg<'_>]) {
        self.dispatch(level, Callsite::caller(), template, args);
    }

    #[track_caller]
    pub fn trace(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Trace, template, args);
    }

    #[track_caller]
    pub fn debug(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Debug, template, args);
    }

    #[track_caller]
    pub fn info(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Info, template, args);
    }

    #[track_caller]
    pub fn warn(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Warn, template, args);
    }

    #[track_caller]
    pub fn error(&self, template: &str, args: &[Arg<'_>]) {
        self.log(Level::Error, template, args);
    }

    /// # Dispatch
    ///
    /// The emit path with an explicit call site, for front ends that know it
    /// better than `#[track_caller]` does (macros from other crates, the `log`
    /// facade bridge).
    ///
    /// Gates on the threshold, substitutes `{}` placeholders, builds the record
    /// and hands it to every handler. A handler that fails or panics is
    /// reported as a yellow console line; the rest still run and nothing
    /// reaches the caller.
    ///
    /// # Arguments
    /// * `level` - Severity of the record.
    /// * `callsite` - Where the record was emitted.
    /// * `template` - Message with `{}` placeholders.
    /// * `args` - Values for the placeholders, left to right.
    pub fn dispatch(&self, level: Level, callsite: Callsite, template: &str, args: &[Arg<'_>]) {
        if !self.is_enabled(level) {
            return;
        }

        let message = strkit::format(template, PLACEHOLDER, args);
        let record = Logrecord::new(level, message, callsite, Local::now(), &self.settings);

        for (name, handler) in &self.handlers {
            let failure = match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(&record))) {
                Ok(Ok(())) => continue,
                Ok(Err(err)) => err,
                Err(_) => LogError::HandlerPanicked(name.clone()),
            };
            self.warn_console(&failure);
        }
    }

    fn warn_console(&self, err: &LogError) {
        // Nowhere left to report a console failure.
        let _ = self.console.write_line(Some(Color::Yellow), &err.to_string());
    }
}

impl Default for LogMgr {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LogMgr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogMgr")
            .field("settings", &self.settings)
            .field("handlers", &self.handler_names())
            .finish()
    }
}

/// # Log
///
/// Write access to the process-wide manager, for configuration:
///
/// ```no_run
/// lkit::log().set_prefix("ACORN").set_level(lkit::Level::Error);
/// ```
///
/// The guard blocks every emitting thread while it lives. Keep it to one
/// statement, and never emit on the same thread while holding it: that
/// deadlocks.
pub fn log() -> RwLockWriteGuard<'static, LogMgr> {
    DEFAULT_MGR.write().unwrap_or_else(PoisonError::into_inner)
}

/// Read access to the process-wide manager.
pub fn with_default<R>(f: impl FnOnce(&LogMgr) -> R) -> R {
    f(&default_mgr())
}

/// Applies `options` to the process-wide manager in one step.
pub fn configure(options: &LogMgrOptions) {
    log().apply(options);
}

pub(crate) fn default_mgr() -> RwLockReadGuard<'static, LogMgr> {
    DEFAULT_MGR.read().unwrap_or_else(PoisonError::into_inner)
}

#[track_caller]
fn emit(level: Level, template: &str, args: &[Arg<'_>]) {
    let callsite = Callsite::caller();
    default_mgr().dispatch(level, callsite, template, args);
}

/// Emits at `Trace` through the process-wide manager.
#[track_caller]
pub fn trace(template: &str, args: &[Arg<'_>]) {
    emit(Level::Trace, template, args);
}

/// Emits at `Debug` through the process-wide manager.
#[track_caller]
pub fn debug(template: &str, args: &[Arg<'_>]) {
    emit(Level::Debug, template, args);
}

/// Emits at `Info` through the process-wide manager.
#[track_caller]
pub fn info(template: &str, args: &[Arg<'_>]) {
    emit(Level::Info, template, args);
}

/// Emits at `Warn` through the process-wide manager.
#[track_caller]
pub fn warn(template: &str, args: &[Arg<'_>]) {
    emit(Level::Warn, template, args);
}

/// Emits at `Error` through the process-wide manager.
#[track_caller]
pub fn error(template: &str, args: &[Arg<'_>]) {
    emit(Level::Error, template, args);
}

/// Emits at `Trace` through the process-wide manager, converting each
/// argument with `Arg::from`.
///
/// ```no_run
/// lkit::trace!("entering {} with {}", "parse", 3);
/// ```
#[macro_export]
macro_rules! trace {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::loggers::logmgr::trace($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Emits at `Debug`; see [`trace!`].
#[macro_export]
macro_rules! debug {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::loggers::logmgr::debug($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Emits at `Info`; see [`trace!`].
#[macro_export]
macro_rules! info {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::loggers::logmgr::info($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Emits at `Warn`; see [`trace!`].
#[macro_export]
macro_rules! warn {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::loggers::logmgr::warn($template, &[$($crate::Arg::from($arg)),*])
    };
}

/// Emits at `Error`; see [`trace!`]. The record carries a stack trace.
#[macro_export]
macro_rules! error {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::loggers::logmgr::error($template, &[$($crate::Arg::from($arg)),*])
    };
}
