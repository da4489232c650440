use std::collections::BTreeSet;
use std::path::Path;

use chrono::Utc;
use log::info;

use crate::config::WorkflowsConfig;
use crate::report::JobReport;

use super::classifier::partition;
use super::resolver::Resolver;
use super::store::{WorkflowFile, WorkflowStore};
use super::types::ResolvedJob;

/// Discovers every job that runs for the repository at `repo_root`.
///
/// Every top-level workflow is resolved independently; a workflow that fails
/// to parse or contains broken references only loses its own jobs. Results
/// are deduplicated on the exact `(workflow, job)` pair and sorted.
pub fn run(repo_root: &Path, config: &WorkflowsConfig) -> JobReport {
    let store = WorkflowStore::load(repo_root, config);
    collect(&store, config.max_depth)
}

/// Resolves all top-level workflows in an already loaded store.
pub fn collect(store: &WorkflowStore, max_depth: usize) -> JobReport {
    let partition = partition(store);
    let resolver = Resolver::new(store, max_depth);

    let mut jobs: BTreeSet<ResolvedJob> = BTreeSet::new();
    let mut resolver_diagnostics = Vec::new();

    for &workflow in &partition.top_level {
        info!("Resolving {}", relative_display(store, workflow));
        let resolution = resolver.resolve(workflow);
        jobs.extend(resolution.jobs);
        resolver_diagnostics.extend(resolution.diagnostics);
    }

    // Store diagnostics include parse failures, so gather them after resolving.
    let mut diagnostics = store.diagnostics();
    diagnostics.extend(resolver_diagnostics);

    info!(
        "Resolved {} distinct jobs from {} top-level workflows",
        jobs.len(),
        partition.top_level.len()
    );

    JobReport {
        repo_root: store.repo_root().to_path_buf(),
        workflows_dir: store.workflows_dir().to_path_buf(),
        collected_at: Utc::now(),
        total_workflows: store.len(),
        top_level_workflows: file_names(&partition.top_level),
        reusable_workflows: file_names(&partition.reusable),
        jobs: jobs.into_iter().collect(),
        diagnostics,
    }
}

fn file_names(files: &[&WorkflowFile]) -> Vec<String> {
    let mut names: Vec<String> = files.iter().map(|file| file.file_name().to_string()).collect();
    names.sort();
    names
}

fn relative_display(store: &WorkflowStore, file: &WorkflowFile) -> String {
    file.path()
        .strip_prefix(store.repo_root())
        .unwrap_or(file.path())
        .display()
        .to_string()
}
