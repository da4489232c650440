use super::store::{WorkflowFile, WorkflowStore};
use super::types::{Triggers, WorkflowDefinition};

/// Trigger that makes a workflow callable from other workflows.
pub const REUSABLE_CALL_TRIGGER: &str = "workflow_call";

/// Returns `true` if the workflow can only run when another workflow calls it.
///
/// That is the case only when `on` is a mapping whose single key is
/// `workflow_call`. A bare `on: workflow_call`, a list of events, a missing
/// `on`, or `workflow_call` alongside any other trigger all make the workflow
/// top-level. Jobs are never inspected.
pub fn is_purely_reusable(definition: &WorkflowDefinition) -> bool {
    match &definition.triggers {
        Triggers::Map(triggers) => {
            triggers.len() == 1 && triggers.contains_key(REUSABLE_CALL_TRIGGER)
        }
        _ => false,
    }
}

/// Workflow files split by whether they run on their own.
#[derive(Debug, Default)]
pub struct Partition<'a> {
    pub top_level: Vec<&'a WorkflowFile>,
    pub reusable: Vec<&'a WorkflowFile>,
}

/// Classifies every file in the store.
///
/// Files that fail to parse cannot be shown to be reusable and land in
/// `top_level`, where they resolve to no jobs.
pub fn partition(store: &WorkflowStore) -> Partition<'_> {
    let mut partition = Partition::default();

    for file in store.files() {
        if file.definition().is_some_and(is_purely_reusable) {
            partition.reusable.push(file);
        } else {
            partition.top_level.push(file);
        }
    }

    log::info!(
        "Classified {} top-level and {} reusable workflows",
        partition.top_level.len(),
        partition.reusable.len()
    );

    partition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorkflowsConfig;

    fn definition(yaml: &str) -> WorkflowDefinition {
        WorkflowDefinition::from_yaml(yaml, "wf").unwrap()
    }

    #[cfg(test)]
    mod is_purely_reusable {
        use super::*;

        #[test]
        fn returns_true_for_workflow_call_only() {
            assert!(is_purely_reusable(&definition("on:\n  workflow_call: {}\n")));
        }

        #[test]
        fn returns_true_for_workflow_call_with_inputs() {
            let yaml = r"
on:
  workflow_call:
    inputs:
      target:
        type: string
";
            assert!(is_purely_reusable(&definition(yaml)));
        }

        #[test]
        fn returns_true_for_null_workflow_call_config() {
            assert!(is_purely_reusable(&definition("on:\n  workflow_call:\n")));
        }

        #[test]
        fn returns_false_when_another_trigger_is_present() {
            assert!(!is_purely_reusable(&definition(
                "on:\n  workflow_call: {}\n  push: {}\n"
            )));
        }

        #[test]
        fn returns_false_for_bare_token() {
            assert!(!is_purely_reusable(&definition("on: workflow_call\n")));
        }

        #[test]
        fn returns_false_for_sequence() {
            assert!(!is_purely_reusable(&definition("on: [workflow_call]\n")));
        }

        #[test]
        fn returns_false_without_triggers() {
            assert!(!is_purely_reusable(&definition("jobs:\n  a: {}\n")));
        }

        #[test]
        fn returns_false_for_single_other_trigger() {
            assert!(!is_purely_reusable(&definition("on:\n  push: {}\n")));
        }
    }

    #[test]
    fn partition_puts_unparseable_files_in_top_level() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join(".github/workflows");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("ci.yml"), "on: push\n").unwrap();
        std::fs::write(dir.join("lib.yml"), "on:\n  workflow_call: {}\n").unwrap();
        std::fs::write(dir.join("bad.yml"), "on: [\n").unwrap();

        let store = WorkflowStore::load(repo.path(), &WorkflowsConfig::default());
        let partition = partition(&store);

        let top: Vec<&str> = partition.top_level.iter().map(|f| f.file_name()).collect();
        let reusable: Vec<&str> = partition.reusable.iter().map(|f| f.file_name()).collect();
        assert_eq!(top, vec!["bad.yml", "ci.yml"]);
        assert_eq!(reusable, vec!["lib.yml"]);
    }
}
