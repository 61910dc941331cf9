//! # lkit
//!
//! A small logging facility: leveled records, a process-wide default manager,
//! console and file handlers, a pluggable handler trait and a bridge for the
//! `log` facade. The string helpers the records are rendered with live in
//! [`strkit`] and are usable on their own behind the `utils` feature.
//!
//! ```no_run
//! use lkit::{Level, LogMgrOptions};
//!
//! lkit::log().set_prefix("ACORN").set_level(Level::Error);
//! lkit::info!("id {} name {}", 1, "wty");
//!
//! // or all at once, e.g. from LKIT_LOG_* variables
//! lkit::configure(&LogMgrOptions::from_env());
//! ```

// Declare the modules to re-export
#[cfg(feature = "loggers")]
pub mod loggers;
#[cfg(feature = "utils")]
pub mod utils;

#[cfg(feature = "utils")]
pub use utils::misc::strkit;
#[cfg(feature = "utils")]
pub use utils::misc::strkit::Arg;

#[cfg(feature = "loggers")]
pub use loggers::bridge::init_log_bridge;
#[cfg(feature = "loggers")]
pub use loggers::callsite::Callsite;
#[cfg(feature = "loggers")]
pub use loggers::error::LogError;
#[cfg(feature = "loggers")]
pub use loggers::level::Level;
#[cfg(feature = "loggers")]
pub use loggers::loghandle::{ConsoleHandler, ConsoleOut, FileHandler, LogHandler};
#[cfg(feature = "loggers")]
pub use loggers::logmgr::{configure, debug, error, info, log, trace, warn, with_default, LogMgr, LogSettings};
#[cfg(feature = "loggers")]
pub use loggers::logrecord::Logrecord;
#[cfg(feature = "loggers")]
pub use loggers::options::LogMgrOptions;
