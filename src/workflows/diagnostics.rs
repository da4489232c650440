use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A non-fatal condition met while discovering jobs.
///
/// None of these stop a run: the affected file or branch is skipped (or, for a
/// missing reusable workflow, reported under the calling job's own name) and
/// the remaining workflows are still resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    #[error("workflows directory does not exist: {}", .path.display())]
    MissingWorkflowsDirectory { path: PathBuf },

    #[error("failed to parse {}: {reason}", .path.display())]
    ParseFailure { path: PathBuf, reason: String },

    #[error("reusable workflow {uses} not found (job '{job}' in {workflow})")]
    ReusableWorkflowNotFound {
        workflow: String,
        job: String,
        uses: String,
    },

    #[error("reusable workflow cycle {chain} (job '{job}' in {workflow})")]
    ReusableWorkflowCycle {
        workflow: String,
        job: String,
        chain: String,
    },

    #[error("reusable workflow nesting deeper than {depth} levels (job '{job}' in {workflow})")]
    MaxDepthExceeded {
        workflow: String,
        job: String,
        depth: usize,
    },
}
