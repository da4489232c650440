use std::cell::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::config::WorkflowsConfig;
use crate::error::ParseError;

use super::diagnostics::Diagnostic;
use super::types::WorkflowDefinition;

/// Handle to one workflow file on disk.
///
/// Content is parsed the first time it is asked for and cached, so a broken
/// file is reported once no matter how many times it is consulted.
#[derive(Debug)]
pub struct WorkflowFile {
    path: PathBuf,
    file_name: String,
    stem: String,
    definition: OnceCell<Result<WorkflowDefinition, ParseError>>,
}

impl WorkflowFile {
    pub fn new(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            path,
            file_name,
            stem,
            definition: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    /// Parsed content, or `None` if the file could not be read or decoded.
    pub fn definition(&self) -> Option<&WorkflowDefinition> {
        self.definition.get_or_init(|| self.parse()).as_ref().ok()
    }

    /// The parse failure for this file, if parsing was attempted and failed.
    pub fn parse_error(&self) -> Option<&ParseError> {
        self.definition.get().and_then(|result| result.as_ref().err())
    }

    fn parse(&self) -> Result<WorkflowDefinition, ParseError> {
        let result = fs::read_to_string(&self.path)
            .map_err(ParseError::from)
            .and_then(|contents| WorkflowDefinition::from_yaml(&contents, &self.stem));

        match &result {
            Ok(definition) => debug!(
                "Parsed {} ('{}', {} jobs)",
                self.path.display(),
                definition.name,
                definition.jobs.len()
            ),
            Err(err) => error!("Failed to parse workflow {}: {err}", self.path.display()),
        }

        result
    }
}

/// Index of the workflow files found in one repository.
#[derive(Debug)]
pub struct WorkflowStore {
    repo_root: PathBuf,
    workflows_dir: PathBuf,
    files: Vec<WorkflowFile>,
    missing_dir: bool,
}

impl WorkflowStore {
    /// Scans `<repo_root>/<config.directory>` for workflow files.
    ///
    /// Only the directory itself is scanned, not its subdirectories. Files are
    /// kept in path order. A missing or unreadable directory yields an empty
    /// store and a [`Diagnostic::MissingWorkflowsDirectory`], never an error.
    pub fn load(repo_root: &Path, config: &WorkflowsConfig) -> Self {
        let workflows_dir = repo_root.join(&config.directory);
        let mut store = Self {
            repo_root: repo_root.to_path_buf(),
            workflows_dir,
            files: Vec::new(),
            missing_dir: false,
        };

        if !store.workflows_dir.is_dir() {
            warn!(
                "Workflows directory does not exist: {}",
                store.workflows_dir.display()
            );
            store.missing_dir = true;
            return store;
        }

        let entries = match fs::read_dir(&store.workflows_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "Failed to read workflows directory {}: {err}",
                    store.workflows_dir.display()
                );
                store.missing_dir = true;
                return store;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_extension(path, &config.extensions))
            .collect();
        paths.sort();

        store.files = paths.into_iter().map(WorkflowFile::new).collect();

        info!(
            "Found {} workflow files in {}",
            store.files.len(),
            store.workflows_dir.display()
        );

        store
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn workflows_dir(&self) -> &Path {
        &self.workflows_dir
    }

    pub fn files(&self) -> &[WorkflowFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// First file, in store order, whose base name is `file_name`.
    pub fn find_by_file_name(&self, file_name: &str) -> Option<&WorkflowFile> {
        self.files.iter().find(|file| file.file_name() == file_name)
    }

    /// Conditions met while scanning and parsing so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();

        if self.missing_dir {
            diagnostics.push(Diagnostic::MissingWorkflowsDirectory {
                path: self.workflows_dir.clone(),
            });
        }

        diagnostics.extend(self.files.iter().filter_map(|file| {
            file.parse_error().map(|err| Diagnostic::ParseFailure {
                path: file.path().to_path_buf(),
                reason: err.to_string(),
            })
        }));

        diagnostics
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn repo_with(files: &[(&str, &str)]) -> TempDir {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join(".github").join("workflows");
        fs::create_dir_all(&dir).unwrap();
        for (name, contents) in files {
            fs::write(dir.join(name), contents).unwrap();
        }
        repo
    }

    #[test]
    fn collects_both_extensions_in_path_order() {
        let repo = repo_with(&[
            ("b.yaml", "on: push\n"),
            ("a.yml", "on: push\n"),
            ("notes.md", "# not a workflow\n"),
        ]);

        let store = WorkflowStore::load(repo.path(), &WorkflowsConfig::default());
        let names: Vec<&str> = store.files().iter().map(WorkflowFile::file_name).collect();

        assert_eq!(names, vec!["a.yml", "b.yaml"]);
        assert!(store.diagnostics().is_empty());
    }

    #[test]
    fn ignores_subdirectories() {
        let repo = repo_with(&[("ci.yml", "on: push\n")]);
        let nested = repo.path().join(".github/workflows/nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("inner.yml"), "on: push\n").unwrap();

        let store = WorkflowStore::load(repo.path(), &WorkflowsConfig::default());
        assert_eq!(store.len(), 1);
        assert!(store.find_by_file_name("inner.yml").is_none());
    }

    #[test]
    fn missing_directory_is_empty_with_diagnostic() {
        let repo = tempfile::tempdir().unwrap();

        let store = WorkflowStore::load(repo.path(), &WorkflowsConfig::default());

        assert!(store.is_empty());
        assert_eq!(
            store.diagnostics(),
            vec![Diagnostic::MissingWorkflowsDirectory {
                path: repo.path().join(".github/workflows")
            }]
        );
    }

    #[test]
    fn honours_configured_directory_and_extensions() {
        let repo = tempfile::tempdir().unwrap();
        let dir = repo.path().join("ci");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("one.yml"), "on: push\n").unwrap();
        fs::write(dir.join("two.yaml"), "on: push\n").unwrap();

        let config = WorkflowsConfig {
            directory: PathBuf::from("ci"),
            extensions: vec!["yaml".to_string()],
            ..WorkflowsConfig::default()
        };
        let store = WorkflowStore::load(repo.path(), &config);

        assert_eq!(store.len(), 1);
        assert_eq!(store.files()[0].file_name(), "two.yaml");
    }

    #[test]
    fn parse_failure_is_isolated_and_reported_once() {
        let repo = repo_with(&[
            ("broken.yml", "jobs: [unclosed\n"),
            ("ok.yml", "name: OK\non: push\n"),
        ]);
        let store = WorkflowStore::load(repo.path(), &WorkflowsConfig::default());

        let broken = store.find_by_file_name("broken.yml").unwrap();
        assert!(broken.parse_error().is_none(), "Parsing should be lazy");
        assert!(broken.definition().is_none());
        assert!(broken.definition().is_none());
        assert_eq!(store.find_by_file_name("ok.yml").unwrap().definition().unwrap().name, "OK");

        let diagnostics = store.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            &diagnostics[0],
            Diagnostic::ParseFailure { path, .. } if path.ends_with("broken.yml")
        ));
    }

    #[test]
    fn definition_defaults_name_to_stem() {
        let repo = repo_with(&[("deploy.yaml", "on: push\n")]);
        let store = WorkflowStore::load(repo.path(), &WorkflowsConfig::default());

        let file = store.find_by_file_name("deploy.yaml").unwrap();
        assert_eq!(file.stem(), "deploy");
        assert_eq!(file.definition().unwrap().name, "deploy");
    }
}
