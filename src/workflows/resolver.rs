use log::{debug, warn};

use super::diagnostics::Diagnostic;
use super::store::{WorkflowFile, WorkflowStore};
use super::types::{JobDefinition, ResolvedJob, UsesReference, WorkflowDefinition};

/// Jobs and conditions produced by resolving one top-level workflow.
#[derive(Debug, Default)]
pub struct Resolution {
    pub jobs: Vec<ResolvedJob>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Expands workflows into the jobs that actually run, following calls to
/// reusable workflows in the same repository.
pub struct Resolver<'a> {
    store: &'a WorkflowStore,
    max_depth: usize,
}

/// Per-walk state: the chain of workflow files currently being expanded.
struct Walk<'a> {
    stack: Vec<&'a WorkflowFile>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a WorkflowStore, max_depth: usize) -> Self {
        Self { store, max_depth }
    }

    /// Resolves every job of `workflow`, in declaration order.
    ///
    /// Terminal jobs and jobs calling external workflows or actions are
    /// reported under their own display name. Jobs calling a local reusable
    /// workflow are replaced by the callee's jobs, each prefixed with the
    /// caller's display name and reported under `workflow`'s name, however
    /// deep the chain goes.
    ///
    /// A workflow that fails to parse resolves to nothing. Cycles and chains
    /// deeper than the configured limit are cut off and reported.
    pub fn resolve(&self, workflow: &'a WorkflowFile) -> Resolution {
        let Some(definition) = workflow.definition() else {
            return Resolution::default();
        };

        debug!("Resolving jobs of {}", workflow.file_name());

        let mut walk = Walk {
            stack: vec![workflow],
            diagnostics: Vec::new(),
        };
        let jobs = self.expand(definition, &mut walk);

        Resolution {
            jobs,
            diagnostics: walk.diagnostics,
        }
    }

    fn expand(&self, definition: &WorkflowDefinition, walk: &mut Walk<'a>) -> Vec<ResolvedJob> {
        let mut resolved = Vec::new();

        for job in definition.jobs.values() {
            match &job.uses {
                Some(uses @ UsesReference::LocalReusableCall { .. }) => {
                    self.expand_local_call(definition, job, uses, walk, &mut resolved);
                }
                Some(UsesReference::ExternalCall(_)) | None => {
                    resolved.push(ResolvedJob::new(&definition.name, job.effective_name()));
                }
            }
        }

        resolved
    }

    fn expand_local_call(
        &self,
        caller: &WorkflowDefinition,
        job: &JobDefinition,
        uses: &UsesReference,
        walk: &mut Walk<'a>,
        resolved: &mut Vec<ResolvedJob>,
    ) {
        let caller_file = walk
            .stack
            .last()
            .map(|file| file.file_name().to_string())
            .unwrap_or_default();
        let job_name = job.effective_name();

        let callee = uses
            .file_name()
            .and_then(|file_name| self.store.find_by_file_name(file_name));

        let Some(callee) = callee else {
            let target = uses
                .local_path()
                .map(|path| self.store.repo_root().join(path))
                .unwrap_or_default();
            warn!(
                "Reusable workflow not found: {} (job '{}' in {}, expected at {})",
                uses,
                job.job_id,
                caller_file,
                target.display()
            );
            walk.diagnostics.push(Diagnostic::ReusableWorkflowNotFound {
                workflow: caller_file,
                job: job.job_id.clone(),
                uses: uses.to_string(),
            });
            resolved.push(ResolvedJob::new(&caller.name, job_name));
            return;
        };

        if walk.stack.iter().any(|file| file.path() == callee.path()) {
            let chain = walk
                .stack
                .iter()
                .map(|file| file.file_name())
                .chain(std::iter::once(callee.file_name()))
                .collect::<Vec<_>>()
                .join(" -> ");
            warn!("Reusable workflow cycle detected: {chain}; skipping job '{}'", job.job_id);
            walk.diagnostics.push(Diagnostic::ReusableWorkflowCycle {
                workflow: caller_file,
                job: job.job_id.clone(),
                chain,
            });
            return;
        }

        if walk.stack.len() > self.max_depth {
            warn!(
                "Reusable workflow nesting exceeds {} levels at job '{}' in {}; skipping",
                self.max_depth, job.job_id, caller_file
            );
            walk.diagnostics.push(Diagnostic::MaxDepthExceeded {
                workflow: caller_file,
                job: job.job_id.clone(),
                depth: self.max_depth,
            });
            return;
        }

        let Some(callee_definition) = callee.definition() else {
            debug!(
                "Skipping job '{}': {} could not be parsed",
                job.job_id,
                callee.file_name()
            );
            return;
        };

        debug!("Following {} -> {}", caller_file, callee.file_name());

        walk.stack.push(callee);
        let nested = self.expand(callee_definition, walk);
        walk.stack.pop();

        resolved.extend(
            nested
                .into_iter()
                .map(|sub_job| sub_job.nested_under(&caller.name, job_name)),
        );
    }
}
