use thiserror::Error;

#[derive(Error, Debug)]
pub enum GhJobsError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a single workflow file could not be decoded.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("top-level document is not a mapping")]
    NotAMapping,
}

pub type Result<T> = std::result::Result<T, GhJobsError>;
