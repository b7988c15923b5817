//! Linesplice CLI binary
//!
//! This is the main entry point for the linesplice command-line interface.
//! The CLI is a thin adapter over the library - NO logic is implemented here.

use linesplice::cli::{CliErrorPayload, CliSuccessPayload, Commands};
use linesplice::splice::{preview_splice, splice_file, SpliceOptions};
use linesplice::SpliceError;
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = linesplice::cli::parse_args();

    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug"))
            .init();
    }

    let result = match cli.command {
        Commands::Insert {
            file,
            with_,
            line,
            clamp,
            verbatim,
            preview,
        } => {
            let options = SpliceOptions::from_flags(clamp, verbatim);
            if preview {
                execute_preview(&file, &with_, line, &options)
            } else {
                execute_insert(&file, &with_, line, &options)
            }
        }
        Commands::Plan { file } => execute_plan(&file),
    };

    match result {
        Ok(payload) => {
            if cli.json {
                println!("{}", to_json(&payload));
            } else {
                println!("{}", payload.message);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if cli.json {
                eprintln!("{}", to_json(&CliErrorPayload::from_error(&e)));
            } else {
                eprintln!("Error [{}]: {}", e.kind(), e);
                if let Some(hint) = e.hint() {
                    eprintln!("Hint: {}", hint);
                }
            }
            ExitCode::from(1)
        }
    }
}

/// Execute the insert command.
fn execute_insert(
    file: &Path,
    with_file: &Path,
    line: usize,
    options: &SpliceOptions,
) -> Result<CliSuccessPayload, SpliceError> {
    let report = splice_file(file, with_file, line, options)?;

    let message = if report.written {
        format!(
            "Inserted {} from '{}' into '{}' at index {}",
            plural(report.lines_inserted, "line"),
            with_file.display(),
            file.display(),
            report.index
        )
    } else {
        format!(
            "'{}' is empty; '{}' left unchanged",
            with_file.display(),
            file.display()
        )
    };

    Ok(CliSuccessPayload::with_data(message, to_value(&report)?))
}

/// Execute the insert command in preview mode.
fn execute_preview(
    file: &Path,
    with_file: &Path,
    line: usize,
    options: &SpliceOptions,
) -> Result<CliSuccessPayload, SpliceError> {
    let preview = preview_splice(file, with_file, line, options)?;

    let message = format!(
        "Would insert {} into '{}' at lines {}..{} ({} bytes)",
        plural(preview.lines_added, "line"),
        file.display(),
        preview.line_start,
        preview.line_end,
        preview.bytes_added
    );

    Ok(CliSuccessPayload::with_data(message, to_value(&preview)?))
}

/// Execute the plan command.
///
/// Relative paths in the plan resolve against the plan file's directory.
fn execute_plan(plan_path: &Path) -> Result<CliSuccessPayload, SpliceError> {
    let base_dir = plan_path.parent().unwrap_or_else(|| Path::new("."));

    let reports = linesplice::plan::execute_plan(plan_path, base_dir)?;

    let message = format!(
        "Plan executed successfully: {} completed",
        plural(reports.len(), "step")
    );

    Ok(CliSuccessPayload::with_data(message, to_value(&reports)?))
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<serde_json::Value, SpliceError> {
    serde_json::to_value(value)
        .map_err(|e| SpliceError::Other(format!("Failed to serialize result: {}", e)))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("{{\"status\":\"error\",\"message\":\"{}\"}}", e))
}
