use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::workflows::{Diagnostic, ResolvedJob};

/// Everything learned about one repository's workflows in a single run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobReport {
    pub repo_root: PathBuf,
    pub workflows_dir: PathBuf,
    pub collected_at: DateTime<Utc>,
    pub total_workflows: usize,
    pub top_level_workflows: Vec<String>,
    pub reusable_workflows: Vec<String>,
    /// Deduplicated, sorted by workflow name then job name.
    pub jobs: Vec<ResolvedJob>,
    pub diagnostics: Vec<Diagnostic>,
}

impl JobReport {
    /// Distinct qualified job names, sorted, without their workflow names.
    pub fn job_names(&self) -> Vec<&str> {
        self.jobs
            .iter()
            .map(|job| job.job_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
