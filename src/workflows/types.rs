use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::error::ParseError;

/// Prefix of a `uses` value that points at a reusable workflow in the same repository.
pub const LOCAL_WORKFLOW_PREFIX: &str = "./.github/workflows/";

/// Separator placed between display names along a delegation chain.
pub const JOB_NAME_SEPARATOR: &str = " / ";

/// Decoded content of one workflow file.
#[derive(Debug, Clone)]
pub struct WorkflowDefinition {
    /// Display name, falling back to the file stem.
    pub name: String,
    pub triggers: Triggers,
    /// Jobs in declaration order.
    pub jobs: IndexMap<String, JobDefinition>,
}

/// Typed view of the `on` key.
#[derive(Debug, Clone, PartialEq)]
pub enum Triggers {
    Absent,
    Event(String),
    Events(Vec<String>),
    Map(IndexMap<String, Value>),
    Other,
}

/// One entry under `jobs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDefinition {
    pub job_id: String,
    pub display_name: Option<String>,
    pub uses: Option<UsesReference>,
}

/// Where a delegating job sends its work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsesReference {
    /// `./.github/workflows/<file>`, stored relative to the repository root.
    LocalReusableCall { path: PathBuf },
    /// Remote workflow, tagged reference, marketplace action or anything else opaque.
    ExternalCall(String),
}

/// A job that will actually run, as reported to the user.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResolvedJob {
    pub workflow_name: String,
    pub job_name: String,
}

#[derive(Deserialize, Default)]
struct RawWorkflow {
    name: Option<Value>,
    on: Option<Value>,
    jobs: Option<IndexMap<String, Option<RawJob>>>,
}

#[derive(Deserialize, Default)]
struct RawJob {
    name: Option<Value>,
    uses: Option<String>,
}

impl WorkflowDefinition {
    /// Decodes a workflow document, using `default_name` when it has no `name`.
    ///
    /// Only `name`, `on`, `jobs.<id>.name` and `jobs.<id>.uses` are read; every
    /// other key is ignored. An empty document yields a workflow with no
    /// triggers and no jobs.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Yaml`] for malformed YAML or unexpected shapes of the
    /// keys above, and [`ParseError::NotAMapping`] when the document is a scalar
    /// or a sequence.
    pub fn from_yaml(contents: &str, default_name: &str) -> Result<Self, ParseError> {
        if contents.trim().is_empty() {
            return Ok(Self {
                name: default_name.to_string(),
                triggers: Triggers::Absent,
                jobs: IndexMap::new(),
            });
        }

        let raw: RawWorkflow = match serde_yaml::from_str::<Value>(contents)? {
            Value::Null => RawWorkflow::default(),
            value @ Value::Mapping(_) => serde_yaml::from_value(value)?,
            _ => return Err(ParseError::NotAMapping),
        };

        let jobs = raw
            .jobs
            .unwrap_or_default()
            .into_iter()
            .map(|(job_id, job)| {
                let job = job.unwrap_or_default();
                let definition = JobDefinition {
                    job_id: job_id.clone(),
                    display_name: job.name.as_ref().and_then(scalar_to_string),
                    uses: job.uses.as_deref().map(UsesReference::parse),
                };
                (job_id, definition)
            })
            .collect();

        Ok(Self {
            name: raw
                .name
                .as_ref()
                .and_then(scalar_to_string)
                .unwrap_or_else(|| default_name.to_string()),
            triggers: Triggers::from_value(raw.on),
            jobs,
        })
    }
}

impl Triggers {
    fn from_value(value: Option<Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Absent,
            Some(Value::String(event)) => Self::Event(event),
            Some(Value::Sequence(events)) => {
                Self::Events(events.iter().filter_map(scalar_to_string).collect())
            }
            Some(Value::Mapping(mapping)) => Self::Map(
                mapping
                    .into_iter()
                    .filter_map(|(key, config)| scalar_to_string(&key).map(|key| (key, config)))
                    .collect(),
            ),
            Some(_) => Self::Other,
        }
    }
}

impl JobDefinition {
    /// The name GitHub shows for this job: `name` if set, otherwise the job id.
    pub fn effective_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.job_id)
    }
}

impl UsesReference {
    pub fn parse(uses: &str) -> Self {
        match uses.strip_prefix("./") {
            Some(relative) if uses.starts_with(LOCAL_WORKFLOW_PREFIX) => Self::LocalReusableCall {
                path: PathBuf::from(relative),
            },
            _ => Self::ExternalCall(uses.to_string()),
        }
    }

    /// Base file name of a local reference, used to look the callee up.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::LocalReusableCall { path } => path.file_name().and_then(|name| name.to_str()),
            Self::ExternalCall(_) => None,
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            Self::LocalReusableCall { path } => Some(path),
            Self::ExternalCall(_) => None,
        }
    }
}

impl fmt::Display for UsesReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalReusableCall { path } => write!(f, "./{}", path.display()),
            Self::ExternalCall(uses) => f.write_str(uses),
        }
    }
}

impl ResolvedJob {
    pub fn new(workflow_name: impl Into<String>, job_name: impl Into<String>) -> Self {
        Self {
            workflow_name: workflow_name.into(),
            job_name: job_name.into(),
        }
    }

    /// Re-parents a callee result under the calling job, reporting it as
    /// belonging to the caller's workflow.
    #[must_use]
    pub fn nested_under(self, workflow_name: &str, caller_job_name: &str) -> Self {
        Self {
            workflow_name: workflow_name.to_string(),
            job_name: format!("{caller_job_name}{JOB_NAME_SEPARATOR}{}", self.job_name),
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
