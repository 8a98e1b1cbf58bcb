//! Error types for parsing and running pipelines

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors raised while turning a CI definition into a [`crate::Pipeline`].
#[derive(Error, Debug)]
pub enum ParseError {
    /// The definition file could not be read
    #[error("failed to read CI file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML
    #[error("failed to parse CI YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    /// Valid YAML, but the top level is not a mapping
    #[error("invalid CI document: {0}")]
    InvalidDocument(String),
}

/// A dialect name that no parser handles.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unsupported CI type '{0}', expected 'gitlab' or 'github'")]
pub struct UnsupportedDialect(pub String);

/// Why a single step did not succeed.
#[derive(Error, Debug)]
pub enum StepFailure {
    #[error("failed to start command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("{0}")]
    Exit(ExitStatus),
}

/// A step failed; the run stops here.
#[derive(Error, Debug)]
#[error("error in stage '{stage}', step '{step}': {source}")]
pub struct StepExecutionError {
    pub stage: String,
    pub step: String,
    #[source]
    pub source: StepFailure,
}

/// Result type for parse operations
pub type Result<T> = std::result::Result<T, ParseError>;
