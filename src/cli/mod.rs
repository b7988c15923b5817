//! Command-line interface for linesplice.
//!
//! This module handles argument parsing and output payloads only.
//! NO file operations are performed here.

use clap::Parser;
use serde::Serialize;
use serde_json::Value;

/// Linesplice: insert a block of lines into a file at a fixed line.
#[derive(Parser, Debug)]
#[command(name = "linesplice")]
#[command(author, version, about, long_about = None)]
#[command(subcommand_required = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print results and errors as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

/// Available linesplice commands.
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Insert the lines of one file into another before a given line.
    Insert {
        /// Path to the target file (rewritten in place).
        #[arg(short, long)]
        file: std::path::PathBuf,

        /// Path to the file containing the lines to insert.
        #[arg(short = 'w', long = "with", value_name = "FILE")]
        with_: std::path::PathBuf,

        /// Zero-based line index to insert before (0 prepends).
        #[arg(short, long)]
        line: usize,

        /// Append when the line is past the end instead of failing.
        #[arg(long)]
        clamp: bool,

        /// Do not add a terminator to an unterminated line that stops being last.
        #[arg(long)]
        verbatim: bool,

        /// Report what would change without writing.
        #[arg(long)]
        preview: bool,
    },

    /// Execute a multi-step insertion plan.
    Plan {
        /// Path to the plan.json file.
        #[arg(short, long)]
        file: std::path::PathBuf,
    },
}

/// Parse command-line arguments.
///
/// Returns the parsed Cli struct or exits on error.
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// JSON success payload for CLI responses.
#[derive(Serialize)]
pub struct CliSuccessPayload {
    /// Status indicator ("ok").
    pub status: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CliSuccessPayload {
    /// Construct a payload with structured data.
    pub fn with_data(message: String, data: Value) -> Self {
        Self {
            status: "ok",
            message,
            data: Some(data),
        }
    }
}

/// JSON error payload for CLI responses.
#[derive(Serialize)]
pub struct CliErrorPayload {
    /// Status indicator ("error").
    pub status: &'static str,
    /// Structured error details.
    pub error: ErrorDetails,
}

/// Details for a CLI error payload.
#[derive(Serialize)]
pub struct ErrorDetails {
    /// Error kind identifier (FileNotFound, etc.).
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Optional file context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Optional hint for remediation steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl CliErrorPayload {
    /// Build payload from a SpliceError instance.
    pub fn from_error(error: &crate::SpliceError) -> Self {
        CliErrorPayload {
            status: "error",
            error: ErrorDetails {
                kind: error.kind(),
                message: error.to_string(),
                file: error
                    .file_path()
                    .map(|path| path.to_string_lossy().to_string()),
                hint: error.hint().map(|h| h.to_string()),
            },
        }
    }
}
