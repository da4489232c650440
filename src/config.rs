use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::GhJobsError;

/// Configuration file structure for ghjobs.
///
/// Lets users point the scan at a non-standard workflows directory and pick
/// their preferred output without repeating flags on every run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Where and how workflow files are discovered
    #[serde(default)]
    pub workflows: WorkflowsConfig,

    /// Output format preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowsConfig {
    /// Workflows directory, relative to the repository root
    #[serde(default = "default_workflows_directory")]
    pub directory: PathBuf,

    /// File extensions treated as workflow files
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Maximum number of nested reusable-workflow calls to follow
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Default output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Summary,
    Json,
    Csv,
    Names,
}

impl Default for WorkflowsConfig {
    fn default() -> Self {
        Self {
            directory: default_workflows_directory(),
            extensions: default_extensions(),
            max_depth: default_max_depth(),
        }
    }
}

fn default_workflows_directory() -> PathBuf {
    PathBuf::from(".github").join("workflows")
}

fn default_extensions() -> Vec<String> {
    vec!["yml".to_string(), "yaml".to_string()]
}

fn default_max_depth() -> usize {
    32
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./ghjobs.toml
    /// 3. ./ghjobs.json
    /// 4. ./ghjobs.yaml
    /// 5. ./ghjobs.yml
    /// 6. `<user config dir>/ghjobs/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["ghjobs.toml", "ghjobs.json", "ghjobs.yaml", "ghjobs.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(user_config) = dirs::config_dir().map(|dir| dir.join("ghjobs").join("config.toml")) {
            if user_config.exists() {
                return Self::load_from_path(&user_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading configuration from: {}", path.display());

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        let config: Self = match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?,
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?,
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::error::Result<()> {
        if self.workflows.max_depth == 0 {
            return Err(GhJobsError::Config("max-depth must be at least 1".into()));
        }
        if self.workflows.extensions.is_empty() {
            return Err(GhJobsError::Config(
                "at least one workflow file extension is required".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.workflows.directory, Path::new(".github/workflows"));
        assert_eq!(config.workflows.extensions, vec!["yml", "yaml"]);
        assert_eq!(config.workflows.max_depth, 32);
        assert_eq!(config.output.format, OutputFormat::Summary);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[workflows]
directory = "ci/workflows"
max-depth = 4

[output]
format = "json"
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.workflows.directory, Path::new("ci/workflows"));
        assert_eq!(config.workflows.max_depth, 4);
        assert_eq!(config.workflows.extensions, vec!["yml", "yaml"]);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        let json_content = r#"{
  "workflows": {
    "extensions": ["yml"]
  },
  "output": {
    "format": "csv"
  }
}"#;
        write!(temp_file, "{}", json_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.workflows.extensions, vec!["yml"]);
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        write!(temp_file, "output:\n  format: names\n").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Names);
        assert_eq!(config.workflows.max_depth, 32);
    }

    #[test]
    fn test_rejects_zero_max_depth() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(temp_file, "[workflows]\nmax-depth = 0\n").unwrap();

        let err = Config::load_from_path(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("max-depth"));
    }

    #[test]
    fn test_explicit_missing_path_is_an_error() {
        let result = Config::load(Some(Path::new("definitely-missing-ghjobs.toml")));
        assert!(result.is_err());
    }
}
