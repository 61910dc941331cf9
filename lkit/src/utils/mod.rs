//! # Utilities Module
//!
//! This module serves as a collection point for general-purpose helpers that
//! do not belong to the logging core itself.
//!
//! ## Contained Modules:
//!
//! - **`misc`**: Miscellaneous helpers. Currently home to `strkit`, the string
//!   toolkit whose `format` function renders every log message.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Miscellaneous utility functions, including the string toolkit.
pub mod misc;
