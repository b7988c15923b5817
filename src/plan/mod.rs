//! JSON plan format for sequential multi-step insertions.
//!
//! This module provides plan parsing and execution for running several
//! splices in a deterministic order.

use crate::error::{Operation, Result, SpliceError};
use crate::splice::{splice_file, SpliceOptions, SpliceReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A plan containing multiple sequential insertion steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Sequential insertion steps to execute.
    pub steps: Vec<InsertStep>,
}

/// A single insertion step in the plan.
///
/// Each step is equivalent to one `linesplice insert` invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsertStep {
    /// Path to the target file.
    pub file: String,

    /// Path to file containing the lines to insert.
    #[serde(rename = "with")]
    pub with_file: String,

    /// Zero-based line index to insert before.
    pub line: usize,

    /// Append when `line` is past the end instead of failing.
    #[serde(default)]
    pub clamp: bool,

    /// Join unterminated lines by plain concatenation.
    #[serde(default)]
    pub verbatim: bool,
}

impl InsertStep {
    /// Splice options selected by this step.
    pub fn options(&self) -> SpliceOptions {
        SpliceOptions::from_flags(self.clamp, self.verbatim)
    }
}

/// Parse a plan from a JSON file.
///
/// # Returns
/// * `Ok(Plan)` - Parsed plan with validated schema
/// * `Err(SpliceError)` - Read error, JSON parse error or schema error
pub fn parse_plan(plan_path: &Path) -> Result<Plan> {
    let content = fs::read_to_string(plan_path)
        .map_err(|e| SpliceError::io(plan_path, Operation::Read, e))?;
    parse_plan_str(&content)
}

/// Parse and validate plan JSON.
pub fn parse_plan_str(content: &str) -> Result<Plan> {
    let plan: Plan = serde_json::from_str(content).map_err(|e| SpliceError::InvalidPlanSchema {
        message: format!("JSON parse error: {}", e),
    })?;

    if plan.steps.is_empty() {
        return Err(SpliceError::InvalidPlanSchema {
            message: "Plan must contain at least one step".to_string(),
        });
    }

    for (i, step) in plan.steps.iter().enumerate() {
        if step.file.is_empty() {
            return Err(SpliceError::InvalidPlanSchema {
                message: format!("Step {} has empty 'file' field", i + 1),
            });
        }

        if step.with_file.is_empty() {
            return Err(SpliceError::InvalidPlanSchema {
                message: format!("Step {} has empty 'with' field", i + 1),
            });
        }
    }

    Ok(plan)
}

/// Execute a plan step by step.
///
/// Relative paths resolve against `base_dir`. Execution stops at the first
/// failing step; steps before it stay applied.
pub fn execute_plan(plan_path: &Path, base_dir: &Path) -> Result<Vec<SpliceReport>> {
    let plan = parse_plan(plan_path)?;
    let mut reports = Vec::with_capacity(plan.steps.len());

    for (step_num, step) in plan.steps.iter().enumerate() {
        let step_index = step_num + 1;
        let file_path = base_dir.join(&step.file);
        let with_file_path = base_dir.join(&step.with_file);

        log::debug!(
            "Plan step {}: {} <- {} at {}",
            step_index,
            file_path.display(),
            with_file_path.display(),
            step.line
        );

        let report = splice_file(&file_path, &with_file_path, step.line, &step.options())
            .map_err(|e| SpliceError::PlanExecutionFailed {
                step: step_index,
                error: Box::new(e),
            })?;
        reports.push(report);
    }

    Ok(reports)
}
