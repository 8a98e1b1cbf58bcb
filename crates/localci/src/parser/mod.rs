//! CI definition parsers.
//!
//! Both dialects map onto the same [`Pipeline`]; [`Dialect`] picks one.

mod document;
pub mod github;
pub mod gitlab;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::info;

use crate::error::{ParseError, Result, UnsupportedDialect};
use crate::model::Pipeline;

/// Supported CI definition formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `.gitlab-ci.yml`: top-level jobs with `stage:` / `script:`
    GitLab,

    /// `.github/workflows/*.yml`: `jobs:` with `steps:` of `name:` / `run:`
    GitHub,
}

impl Dialect {
    /// Name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::GitLab => "gitlab",
            Dialect::GitHub => "github",
        }
    }

    /// Parse a document held in memory.
    pub fn parse(&self, bytes: &[u8]) -> Result<Pipeline> {
        match self {
            Dialect::GitLab => gitlab::parse(bytes),
            Dialect::GitHub => github::parse(bytes),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = UnsupportedDialect;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gitlab" => Ok(Dialect::GitLab),
            "github" => Ok(Dialect::GitHub),
            other => Err(UnsupportedDialect(other.to_string())),
        }
    }
}

/// Read a CI definition from disk and parse it.
pub fn parse_file(dialect: Dialect, path: &Path) -> Result<Pipeline> {
    let bytes = std::fs::read(path).map_err(|source| ParseError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let pipeline = dialect.parse(&bytes)?;
    info!(
        dialect = %dialect,
        file = %path.display(),
        stages = pipeline.stages.len(),
        steps = pipeline.step_count(),
        "Loaded pipeline"
    );
    Ok(pipeline)
}
