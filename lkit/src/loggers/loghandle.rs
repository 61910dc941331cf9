use std::borrow::Cow;
use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use colored::Color;

use super::error::LogError;
use super::logrecord::Logrecord;
use crate::utils::misc::strkit::is_blank;

/// Name of the built-in console handler.
pub const CONSOLE: &str = "console";
/// Name of the built-in file handler.
pub const FILE: &str = "file";
/// File the file handler appends to, inside the store directory.
pub const LOG_FILE_NAME: &str = "logkit.log";

/// # Log Handler
///
/// A sink for finished records. Implement this to plug custom outputs into
/// a [`LogMgr`](super::logmgr::LogMgr).
///
/// `name` must be stable: the manager keys handlers by it and ignores a
/// second registration under a name it already holds. `handle` may be called
/// from many threads at once, so implementations serialise their own output.
/// Errors are reported on the console by the manager and never reach the
/// code that emitted the record.
pub trait LogHandler: Send + Sync {
    fn name(&self) -> &str;

    fn handle(&self, record: &Logrecord<'_>) -> Result<(), LogError>;
}

/// # Console Out
///
/// The console sink: a writer behind a mutex, cloned cheaply between the
/// console handler and the manager's own warnings so both are serialised on
/// the same lock. Defaults to stdout.
///
/// Colored lines are wrapped in ANSI escapes whatever the writer is (a
/// terminal, a pipe, a buffer) unless coloring is turned off for this sink
/// with [`ConsoleOut::with_color`].
#[derive(Clone)]
pub struct ConsoleOut {
    sink: Arc<Mutex<Box<dyn Write + Send>>>,
    colorize: bool,
}

impl ConsoleOut {
    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    /// Redirects console output, e.g. into a buffer for inspection.
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(writer))),
            colorize: true,
        }
    }

    /// Turns escape sequences on or off for this sink.
    pub fn with_color(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn colorize(&self) -> bool {
        self.colorize
    }

    /// Writes `line` and a newline while holding the lock, wrapped in
    /// `ESC[<code>m ... ESC[0m` when there is a color and the sink colorizes.
    pub fn write_line(&self, color: Option<Color>, line: &str) -> Result<(), LogError> {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        match color.filter(|_| self.colorize) {
            Some(color) => writeln!(sink, "\x1b[{}m{}\x1b[0m", color.to_fg_str(), line)?,
            None => writeln!(sink, "{}", line)?,
        }
        sink.flush()?;
        Ok(())
    }
}

impl Default for ConsoleOut {
    fn default() -> Self {
        Self::stdout()
    }
}

impl fmt::Debug for ConsoleOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleOut").finish_non_exhaustive()
    }
}

/// Prints each record as one colored line on the console sink.
#[derive(Debug, Clone, Default)]
pub struct ConsoleHandler {
    out: ConsoleOut,
}

impl ConsoleHandler {
    pub fn new(out: ConsoleOut) -> Self {
        Self { out }
    }
}

impl LogHandler for ConsoleHandler {
    fn name(&self) -> &str {
        CONSOLE
    }

    fn handle(&self, record: &Logrecord<'_>) -> Result<(), LogError> {
        self.out.write_line(record.level().color(), &record.format_line())
    }
}

/// # File Handler
///
/// Appends each record to `logkit.log` inside a store directory, preceded by
/// a newline. The file is opened and closed on every call; nothing is kept
/// open between records.
///
/// The built-in handler ([`FileHandler::new`]) follows the manager's store
/// path as carried by each record. [`FileHandler::at`] pins a directory and a
/// name of its own, so several file handlers can coexist.
#[derive(Debug)]
pub struct FileHandler {
    name: Cow<'static, str>,
    dir: Option<PathBuf>,
    lock: Mutex<()>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self {
            name: Cow::Borrowed(FILE),
            dir: None,
            lock: Mutex::new(()),
        }
    }

    pub fn at(name: impl Into<Cow<'static, str>>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: Some(dir.into()),
            lock: Mutex::new(()),
        }
    }

    fn resolve_dir<'r>(&'r self, record: &'r Logrecord<'_>) -> Result<&'r Path, LogError> {
        let dir = self
            .dir
            .as_deref()
            .or_else(|| record.settings().store_path())
            .filter(|dir| !is_blank(&dir.to_string_lossy()))
            .ok_or(LogError::EmptyStorePath)?;

        if !dir.exists() {
            return Err(LogError::MissingStorePath(dir.to_path_buf()));
        }
        Ok(dir)
    }
}

impl Default for FileHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHandler for FileHandler {
    fn name(&self) -> &str {
        &self.name
    }

    fn handle(&self, record: &Logrecord<'_>) -> Result<(), LogError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);

        let path = self.resolve_dir(record)?.join(LOG_FILE_NAME);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| LogError::OpenLogFile {
                path: path.clone(),
                source,
            })?;

        write!(file, "\n{}", record.format_line())
            .map_err(|source| LogError::WriteLogFile { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loggers::callsite::Callsite;
    use crate::loggers::level::Level;
    use crate::loggers::logmgr::LogSettings;
    use crate::loggers::test_support::SharedBuf;
    use chrono::Local;
    use std::fs;
    use tempfile::tempdir;

    fn record<'a>(level: Level, message: &str, settings: &'a LogSettings) -> Logrecord<'a> {
        Logrecord::new(level, message.to_string(), Callsite::new("src/app.rs", 3), Local::now(), settings)
    }

    fn settings_with_store(path: Option<PathBuf>) -> LogSettings {
        let mut settings = LogSettings::default();
        settings.store_path = path;
        settings
    }

    #[test]
    fn console_writes_one_line_per_record() {
        let buf = SharedBuf::default();
        let handler = ConsoleHandler::new(ConsoleOut::from_writer(buf.clone()));
        let settings = LogSettings::default();

        handler.handle(&record(Level::Info, "first", &settings)).unwrap();
        handler.handle(&record(Level::Debug, "second", &settings)).unwrap();

        let out = buf.contents();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[INFO]") && lines[0].ends_with(" : first"));
        assert!(lines[1].contains("[DEBUG]") && lines[1].ends_with(" : second"));
        assert_eq!(handler.name(), CONSOLE);
    }

    #[test]
    fn console_wraps_colored_levels_in_escapes() {
        let buf = SharedBuf::default();
        let out = ConsoleOut::from_writer(buf.clone());
        out.write_line(Level::Warn.color(), "careful").unwrap();
        out.write_line(Level::Error.color(), "broken").unwrap();
        out.write_line(Level::Info.color(), "plain").unwrap();

        assert!(out.colorize());
        assert_eq!(
            buf.contents(),
            "\u{1b}[33mcareful\u{1b}[0m\n\u{1b}[31mbroken\u{1b}[0m\nplain\n"
        );
    }

    #[test]
    fn console_without_color_writes_bare_lines() {
        let buf = SharedBuf::default();
        let handler = ConsoleHandler::new(ConsoleOut::from_writer(buf.clone()).with_color(false));
        let settings = LogSettings::default();

        handler.handle(&record(Level::Warn, "careful", &settings)).unwrap();

        let out = buf.contents();
        assert!(!out.contains('\u{1b}'), "{:?}", out);
        assert!(out.starts_with("[WARN] ") && out.ends_with(" : careful\n"));
    }

    #[test]
    fn file_appends_with_leading_newline() {
        let dir = tempdir().unwrap();
        let settings = settings_with_store(Some(dir.path().to_path_buf()));
        let handler = FileHandler::new();

        handler.handle(&record(Level::Info, "one", &settings)).unwrap();
        handler.handle(&record(Level::Trace, "two", &settings)).unwrap();

        let contents = fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert!(contents.starts_with('\n'));
        assert!(!contents.ends_with('\n'));
        let entries: Vec<_> = contents.split('\n').skip(1).collect();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("[INFO]") && entries[0].ends_with(" : one"));
        assert!(entries[1].starts_with("[TRACE]") && entries[1].ends_with(" : two"));
    }

    #[test]
    fn file_without_store_path_is_an_error() {
        let handler = FileHandler::new();
        for path in [None, Some(PathBuf::from("")), Some(PathBuf::from("   "))] {
            let settings = settings_with_store(path);
            let err = handler.handle(&record(Level::Info, "lost", &settings)).unwrap_err();
            assert!(matches!(err, LogError::EmptyStorePath), "{}", err);
        }
    }

    #[test]
    fn file_with_missing_store_path_creates_nothing() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        let settings = settings_with_store(Some(missing.clone()));

        let err = FileHandler::new()
            .handle(&record(Level::Info, "lost", &settings))
            .unwrap_err();

        assert!(matches!(err, LogError::MissingStorePath(ref p) if *p == missing));
        assert!(!missing.exists());
    }

    #[test]
    fn file_store_path_that_is_a_file_fails_to_open() {
        let dir = tempdir().unwrap();
        let not_a_dir = dir.path().join("plain.txt");
        fs::write(&not_a_dir, "x").unwrap();
        let settings = settings_with_store(Some(not_a_dir));

        let err = FileHandler::new()
            .handle(&record(Level::Info, "lost", &settings))
            .unwrap_err();
        assert!(matches!(err, LogError::OpenLogFile { .. }), "{}", err);
    }

    #[test]
    fn pinned_file_handler_ignores_manager_store_path() {
        let dir = tempdir().unwrap();
        let settings = settings_with_store(None);
        let handler = FileHandler::at("audit", dir.path());

        handler.handle(&record(Level::Info, "kept", &settings)).unwrap();

        assert_eq!(handler.name(), "audit");
        let contents = fs::read_to_string(dir.path().join(LOG_FILE_NAME)).unwrap();
        assert!(contents.ends_with(" : kept"));
    }
}
