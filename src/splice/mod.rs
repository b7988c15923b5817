//! Line splicing engine with atomic writes.
//!
//! This module inserts one file's lines into another at a fixed zero-based
//! line index:
//! - Byte-exact insertion (every original terminator is kept)
//! - Explicit policies for out-of-range indices and unterminated last lines
//! - Atomic file replacement (write temp + fsync + rename)
//! - File hash reporting (before/after)

mod write;

use crate::error::{Operation, Result, SpliceError};
use crate::lines::{LineEnding, LineSeq};
use ropey::Rope;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use write::write_atomic;

/// What to do with an index past the last line of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexPolicy {
    /// Fail with `IndexOutOfRange`.
    #[default]
    Reject,
    /// Append at the end of the target.
    Clamp,
}

/// What to do with a line that has no terminator but is no longer last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminatorPolicy {
    /// Give it the target's line ending so it stays a separate line.
    #[default]
    Complete,
    /// Plain concatenation; the line fuses with the one after it.
    Verbatim,
}

/// Options controlling the two boundary cases of a splice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpliceOptions {
    /// Out-of-range index handling.
    pub index_policy: IndexPolicy,
    /// Unterminated line handling.
    pub terminator_policy: TerminatorPolicy,
}

impl SpliceOptions {
    /// Options from the `clamp` and `verbatim` switches.
    pub fn from_flags(clamp: bool, verbatim: bool) -> Self {
        Self {
            index_policy: if clamp {
                IndexPolicy::Clamp
            } else {
                IndexPolicy::Reject
            },
            terminator_policy: if verbatim {
                TerminatorPolicy::Verbatim
            } else {
                TerminatorPolicy::Complete
            },
        }
    }
}

/// Index lies past the end of the target.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("index {index} is beyond {line_count} lines")]
pub struct IndexOutOfRange {
    /// Requested index.
    pub index: usize,
    /// Lines in the target.
    pub line_count: usize,
}

/// Result of an in-memory splice.
#[derive(Debug, Clone)]
pub struct SpliceOutcome {
    /// Merged text.
    pub text: String,
    /// Index the insertion actually landed at.
    pub index: usize,
    /// Lines taken from the insertion.
    pub lines_inserted: usize,
    /// Lines in the merged text.
    pub line_count: usize,
    /// Terminators added under `TerminatorPolicy::Complete`.
    pub terminators_added: usize,
}

/// Result summary for a spliced file.
#[derive(Debug, Clone, Serialize)]
pub struct SpliceReport {
    /// Path of the target file.
    pub target: PathBuf,
    /// Path of the insertion file.
    pub insertion: PathBuf,
    /// Index that was asked for.
    pub requested_index: usize,
    /// Index the insertion landed at.
    pub index: usize,
    /// Lines inserted.
    pub lines_inserted: usize,
    /// Lines in the target after the splice.
    pub line_count: usize,
    /// Target size before.
    pub bytes_before: usize,
    /// Target size after.
    pub bytes_after: usize,
    /// SHA-256 before splicing.
    pub before_hash: String,
    /// SHA-256 after splicing.
    pub after_hash: String,
    /// False when nothing needed writing (empty insertion).
    pub written: bool,
}

/// Dry-run summary of a splice.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewReport {
    /// The file that would be changed.
    pub file: String,
    /// Zero-based index the insertion would land at.
    pub index: usize,
    /// 1-based first line occupied by the insertion.
    pub line_start: usize,
    /// 1-based last line occupied by the insertion.
    pub line_end: usize,
    /// Number of lines added.
    pub lines_added: usize,
    /// Number of bytes added.
    pub bytes_added: usize,
    /// True when an out-of-range index was clamped.
    pub clamped: bool,
}

/// Splice `insertion` into `target` before line `index`.
///
/// Output is `target[..index] ++ insertion ++ target[index..]`. With
/// `TerminatorPolicy::Complete` a terminator is added at a seam where an
/// unterminated line would otherwise run into the next one.
pub fn splice_text(
    target: &str,
    insertion: &str,
    index: usize,
    options: &SpliceOptions,
) -> std::result::Result<SpliceOutcome, IndexOutOfRange> {
    let target_lines = LineSeq::split(target);
    let insert_lines = LineSeq::split(insertion);
    let line_count = target_lines.len();

    let index = match (index > line_count, options.index_policy) {
        (false, _) => index,
        (true, IndexPolicy::Reject) => return Err(IndexOutOfRange { index, line_count }),
        (true, IndexPolicy::Clamp) => {
            log::warn!(
                "Insertion index {} is past {} lines, appending instead",
                index,
                line_count
            );
            line_count
        }
    };

    if insert_lines.is_empty() {
        return Ok(SpliceOutcome {
            text: target.to_string(),
            index,
            lines_inserted: 0,
            line_count,
            terminators_added: 0,
        });
    }

    let ending = target_lines
        .dominant_ending()
        .or_else(|| insert_lines.dominant_ending())
        .unwrap_or(LineEnding::Lf)
        .as_str();
    let complete = options.terminator_policy == TerminatorPolicy::Complete;

    let mut block = String::with_capacity(insertion.len() + 2 * ending.len());
    let mut terminators_added = 0;

    // Appending after an unterminated last line.
    if complete && index == line_count && target_lines.ends_unterminated() {
        block.push_str(ending);
        terminators_added += 1;
    }
    block.push_str(insertion);
    // Unterminated insertion followed by target lines.
    if complete && index < line_count && insert_lines.ends_unterminated() {
        block.push_str(ending);
        terminators_added += 1;
    }

    let at_byte = target_lines.byte_offset(index).unwrap_or(target.len());
    let mut rope = Rope::from_str(target);
    let at_char = rope.byte_to_char(at_byte);
    rope.insert(at_char, &block);
    let text = rope.to_string();
    let merged_lines = LineSeq::split(&text).len();

    Ok(SpliceOutcome {
        index,
        lines_inserted: insert_lines.len(),
        line_count: merged_lines,
        terminators_added,
        text,
    })
}

/// Splice with default options: reject out-of-range indices and complete
/// unterminated lines.
pub fn splice(target_path: &Path, insertion_path: &Path, index: usize) -> Result<SpliceReport> {
    splice_file(target_path, insertion_path, index, &SpliceOptions::default())
}

/// Insert the lines of `insertion_path` into `target_path` before line
/// `index`, replacing the target atomically.
///
/// # Returns
/// * `Ok(SpliceReport)` - What was inserted, with before/after hashes
/// * `Err(SpliceError)` - First failure; the target is left unchanged
pub fn splice_file(
    target_path: &Path,
    insertion_path: &Path,
    index: usize,
    options: &SpliceOptions,
) -> Result<SpliceReport> {
    // Step 1: Read both files fully before touching the target
    let target = read_text(target_path)?;
    let insertion = read_text(insertion_path)?;
    let before_hash = compute_hash(target.as_bytes());

    // Step 2: Build merged text in memory
    let outcome = splice_text(&target, &insertion, index, options)
        .map_err(|e| out_of_range(target_path, e))?;

    // Step 3: Replace target (skipped when nothing changes)
    let written = outcome.lines_inserted > 0;
    if written {
        write_atomic(target_path, outcome.text.as_bytes())?;
        log::info!(
            "Inserted {} lines into {} at index {}",
            outcome.lines_inserted,
            target_path.display(),
            outcome.index
        );
    } else {
        log::debug!(
            "{} is empty, leaving {} untouched",
            insertion_path.display(),
            target_path.display()
        );
    }

    Ok(SpliceReport {
        target: target_path.to_path_buf(),
        insertion: insertion_path.to_path_buf(),
        requested_index: index,
        index: outcome.index,
        lines_inserted: outcome.lines_inserted,
        line_count: outcome.line_count,
        bytes_before: target.len(),
        bytes_after: outcome.text.len(),
        after_hash: compute_hash(outcome.text.as_bytes()),
        before_hash,
        written,
    })
}

/// Compute what a splice would do without writing anything.
pub fn preview_splice(
    target_path: &Path,
    insertion_path: &Path,
    index: usize,
    options: &SpliceOptions,
) -> Result<PreviewReport> {
    let target = read_text(target_path)?;
    let insertion = read_text(insertion_path)?;

    let outcome = splice_text(&target, &insertion, index, options)
        .map_err(|e| out_of_range(target_path, e))?;

    let (line_start, line_end) = if outcome.lines_inserted == 0 {
        (outcome.index, outcome.index)
    } else {
        (outcome.index + 1, outcome.index + outcome.lines_inserted)
    };

    Ok(PreviewReport {
        file: target_path.to_string_lossy().to_string(),
        index: outcome.index,
        line_start,
        line_end,
        lines_added: outcome.lines_inserted,
        bytes_added: outcome.text.len() - target.len(),
        clamped: outcome.index != index,
    })
}

/// Read a whole file as UTF-8; the handle is closed on return.
fn read_text(path: &Path) -> Result<String> {
    log::debug!("Reading {}", path.display());
    let bytes = fs::read(path).map_err(|e| SpliceError::io(path, Operation::Read, e))?;
    String::from_utf8(bytes).map_err(|e| SpliceError::Decode {
        path: path.to_path_buf(),
        source: e.utf8_error(),
    })
}

fn out_of_range(path: &Path, err: IndexOutOfRange) -> SpliceError {
    SpliceError::IndexOutOfRange {
        path: path.to_path_buf(),
        index: err.index,
        line_count: err.line_count,
    }
}

/// Compute SHA-256 hash of bytes.
fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(target: &str, insertion: &str, index: usize) -> String {
        splice_text(target, insertion, index, &SpliceOptions::default())
            .expect("splice failed")
            .text
    }

    fn verbatim() -> SpliceOptions {
        SpliceOptions::from_flags(false, true)
    }

    #[test]
    fn test_insert_in_middle() {
        assert_eq!(run("a\nb\nc\n", "X\n", 1), "a\nX\nb\nc\n");
    }

    #[test]
    fn test_insert_at_start() {
        assert_eq!(run("a\nb\n", "X\nY\n", 0), "X\nY\na\nb\n");
    }

    #[test]
    fn test_empty_insertion_is_noop() {
        let outcome = splice_text("a\nb\n", "", 1, &SpliceOptions::default()).expect("splice");
        assert_eq!(outcome.text, "a\nb\n");
        assert_eq!(outcome.lines_inserted, 0);
    }

    #[test]
    fn test_insert_at_end_appends() {
        assert_eq!(run("a\nb\n", "X\n", 2), "a\nb\nX\n");
    }

    #[test]
    fn test_every_index_matches_list_concatenation() {
        let target = ["one\n", "two\r\n", "three\n", "four\n"];
        let insertion = ["X\n", "Y\r\n"];
        for i in 0..=target.len() {
            let expected = [&target[..i], &insertion[..], &target[i..]].concat().concat();
            assert_eq!(
                run(&target.concat(), &insertion.concat(), i),
                expected,
                "index {}",
                i
            );
        }
    }

    #[test]
    fn test_splicing_twice_inserts_twice() {
        let once = run("a\nb\n", "X\n", 1);
        let twice = run(&once, "X\n", 1);
        assert_eq!(twice, "a\nX\nX\nb\n");
    }

    #[test]
    fn test_out_of_range_rejected_by_default() {
        let err = splice_text("a\n", "X\n", 5, &SpliceOptions::default())
            .expect_err("should reject");
        assert_eq!(
            err,
            IndexOutOfRange {
                index: 5,
                line_count: 1
            }
        );
    }

    #[test]
    fn test_out_of_range_clamped_appends() {
        let options = SpliceOptions::from_flags(true, false);
        let outcome = splice_text("a\n", "X\n", 5, &options).expect("splice");
        assert_eq!(outcome.text, "a\nX\n");
        assert_eq!(outcome.index, 1);
    }

    #[test]
    fn test_empty_target_accepts_index_zero() {
        assert_eq!(run("", "X\n", 0), "X\n");
    }

    #[test]
    fn test_unterminated_target_tail_completed_on_append() {
        let outcome = splice_text("a\nb", "X\n", 2, &SpliceOptions::default()).expect("splice");
        assert_eq!(outcome.text, "a\nb\nX\n");
        assert_eq!(outcome.terminators_added, 1);
        assert_eq!(outcome.line_count, 3);
    }

    #[test]
    fn test_unterminated_target_tail_kept_when_still_last() {
        assert_eq!(run("a\nb", "X\n", 1), "a\nX\nb");
    }

    #[test]
    fn test_unterminated_insertion_completed_before_tail() {
        assert_eq!(run("a\nb\n", "X", 1), "a\nX\nb\n");
    }

    #[test]
    fn test_unterminated_insertion_kept_at_end() {
        assert_eq!(run("a\nb\n", "X", 2), "a\nb\nX");
    }

    #[test]
    fn test_completion_uses_target_crlf() {
        assert_eq!(run("a\r\nb\r\n", "X", 1), "a\r\nX\r\nb\r\n");
    }

    #[test]
    fn test_verbatim_fuses_unterminated_lines() {
        let outcome = splice_text("a\nb", "X\n", 2, &verbatim()).expect("splice");
        assert_eq!(outcome.text, "a\nbX\n");
        assert_eq!(outcome.terminators_added, 0);
        assert_eq!(outcome.line_count, 2);

        let outcome = splice_text("a\nb\n", "X", 1, &verbatim()).expect("splice");
        assert_eq!(outcome.text, "a\nXb\n");
    }

    #[test]
    fn test_multibyte_text_is_preserved() {
        assert_eq!(run("äöü\n€\n", "日本\n", 1), "äöü\n日本\n€\n");
    }

    #[test]
    fn test_options_from_flags() {
        assert_eq!(SpliceOptions::from_flags(false, false), SpliceOptions::default());
        let options = SpliceOptions::from_flags(true, true);
        assert_eq!(options.index_policy, IndexPolicy::Clamp);
        assert_eq!(options.terminator_policy, TerminatorPolicy::Verbatim);
    }

    #[test]
    fn test_compute_hash_is_sha256_hex() {
        assert_eq!(
            compute_hash(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
