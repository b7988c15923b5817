//! Linesplice error types.
//!
//! All errors are typed and carry the path and operation that failed.

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File operation being attempted when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Reading a file into memory.
    Read,
    /// Writing the merged content back to the target.
    Write,
}

impl Operation {
    /// Lowercase identifier used in messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Read => "read",
            Operation::Write => "write",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for splice operations.
#[derive(Error, Debug)]
pub enum SpliceError {
    /// Path did not exist at read time.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The OS refused the read or write.
    #[error("Permission denied to {operation} {path}")]
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
        /// The operation being attempted.
        operation: Operation,
    },

    /// File bytes are not valid UTF-8.
    #[error("Cannot decode {path} as UTF-8: {source}")]
    Decode {
        /// The file that failed to decode.
        path: PathBuf,
        /// The underlying decode error.
        #[source]
        source: std::str::Utf8Error,
    },

    /// Any other I/O failure.
    #[error("I/O error during {operation} of {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The operation being attempted.
        operation: Operation,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Insertion index lies past the end of the target.
    #[error("Insertion line {index} is beyond the end of {path} ({line_count} lines)")]
    IndexOutOfRange {
        /// The target file.
        path: PathBuf,
        /// Requested zero-based index.
        index: usize,
        /// Number of lines in the target.
        line_count: usize,
    },

    /// Invalid plan schema.
    #[error("Invalid plan schema: {message}")]
    InvalidPlanSchema {
        /// The schema validation error message.
        message: String,
    },

    /// Plan execution failed at step.
    #[error("Plan execution failed at step {step}: {error}")]
    PlanExecutionFailed {
        /// The step number that failed (1-based).
        step: usize,
        /// The error that occurred.
        #[source]
        error: Box<SpliceError>,
    },

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl SpliceError {
    /// Classify an I/O error raised while touching `path`.
    pub fn io(path: &Path, operation: Operation, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound if operation == Operation::Read => {
                SpliceError::FileNotFound {
                    path: path.to_path_buf(),
                }
            }
            std::io::ErrorKind::PermissionDenied => SpliceError::PermissionDenied {
                path: path.to_path_buf(),
                operation,
            },
            _ => SpliceError::Io {
                path: path.to_path_buf(),
                operation,
                source,
            },
        }
    }

    /// Stable identifier for machine-readable output.
    pub fn kind(&self) -> &'static str {
        match self {
            SpliceError::FileNotFound { .. } => "FileNotFound",
            SpliceError::PermissionDenied { .. } => "PermissionDenied",
            SpliceError::Decode { .. } => "DecodeError",
            SpliceError::Io { .. } => "IoError",
            SpliceError::IndexOutOfRange { .. } => "IndexOutOfRange",
            SpliceError::InvalidPlanSchema { .. } => "InvalidPlanSchema",
            SpliceError::PlanExecutionFailed { error, .. } => error.kind(),
            SpliceError::Other(_) => "Other",
        }
    }

    /// The offending path, when there is one.
    pub fn file_path(&self) -> Option<&Path> {
        match self {
            SpliceError::FileNotFound { path }
            | SpliceError::PermissionDenied { path, .. }
            | SpliceError::Decode { path, .. }
            | SpliceError::Io { path, .. }
            | SpliceError::IndexOutOfRange { path, .. } => Some(path.as_path()),
            SpliceError::PlanExecutionFailed { error, .. } => error.file_path(),
            _ => None,
        }
    }

    /// Short remediation hint for the CLI.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            SpliceError::FileNotFound { .. } => Some("Check the path; both files must exist"),
            SpliceError::PermissionDenied { operation: Operation::Write, .. } => {
                Some("The target's directory must be writable for the atomic rename")
            }
            SpliceError::Decode { .. } => Some("Only UTF-8 text files can be spliced"),
            SpliceError::IndexOutOfRange { .. } => {
                Some("Use --clamp to append when the line is past the end")
            }
            _ => None,
        }
    }
}

/// Result type alias for splice operations.
pub type Result<T> = std::result::Result<T, SpliceError>;
