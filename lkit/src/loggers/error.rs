use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
/// # Log Error
///
/// Everything that can go wrong inside the logging facility. None of these
/// ever reach the code that emitted a record: the dispatcher reports them as
/// a yellow console line and moves on to the next handler.
pub enum LogError {
    /// The file handler ran without a configured store path.
    #[error("log store path is empty!")]
    EmptyStorePath,

    /// The configured store directory is missing.
    #[error("log store path {} does not exist!", .0.display())]
    MissingStorePath(PathBuf),

    /// The log file could not be opened or created.
    #[error("open log store path {} error: {source}", path.display())]
    OpenLogFile { path: PathBuf, source: io::Error },

    /// Appending to an opened log file failed.
    #[error("write log file {} error: {source}", path.display())]
    WriteLogFile { path: PathBuf, source: io::Error },

    /// Writing to the console sink failed.
    #[error("console write error: {0}")]
    Console(#[from] io::Error),

    /// A handler panicked while handling a record.
    #[error("log handler `{0}` panicked")]
    HandlerPanicked(String),

    /// A level name that is not one of TRACE, DEBUG, INFO, WARN, ERROR.
    #[error("unknown log level `{0}`")]
    UnknownLevel(String),

    /// Another `log` facade logger was installed first.
    #[error("a `log` facade logger is already installed")]
    BridgeInstalled,
}
