//! # Loggers
//!
//! The logging core: a [`LogMgr`](logmgr::LogMgr) holds a threshold, a prefix,
//! a store path and a set of named handlers; every emitted record is gated,
//! stamped with its call site, formatted and fanned out to each handler in
//! name order.
//!
//! ## Threading model
//!
//! Handlers are `Send + Sync` and serialise their own output. The process-wide
//! default manager lives behind an `RwLock`: emitting takes the read side,
//! configuration takes the write side. Configure before starting traffic.

/// Severity levels and the threshold gate.
pub mod level;
/// The `LogError` taxonomy.
pub mod error;
/// Call-site and stack capture.
pub mod callsite;
/// The immutable record handed to handlers, and its line layout.
pub mod logrecord;
/// The handler capability plus the console and file handlers.
pub mod loghandle;
/// The log manager, the default instance and the emit API.
pub mod logmgr;
/// Configuration struct applied in one step.
pub mod options;
/// Routes the `log` facade into the default manager.
pub mod bridge;

#[cfg(test)]
pub(crate) mod test_support;
