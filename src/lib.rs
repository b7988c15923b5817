//! Linesplice: insert one file's lines into another at a fixed line.
//!
//! This library splices text byte-for-byte, keeping every original line
//! terminator, and replaces the target file atomically.

#![warn(missing_docs)]

pub mod cli;
pub mod error;
pub mod lines;
pub mod plan;
pub mod splice;

/// Re-export common error types for convenience.
pub use error::{Result, SpliceError};

/// Re-export the splice entry points for convenience.
pub use splice::{splice, splice_file, splice_text, SpliceOptions, SpliceReport};

/// Linesplice version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
