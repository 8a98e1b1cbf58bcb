//! local-ci - run CI definitions on the local machine
//!
//! Provides a sequential pipeline runner that:
//! - Maps GitLab-style and GitHub-style YAML onto one pipeline model
//! - Executes every step through the shell, one at a time
//! - Redraws a boxed progress view in the terminal before each step

pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod runner;
pub mod telemetry;

// Re-export key types
pub use error::{ParseError, StepExecutionError, StepFailure, UnsupportedDialect};
pub use model::{Pipeline, SkipSet, Stage, Step};
pub use parser::{parse_file, Dialect};
pub use pipeline::{Executor, RunOptions, RunSummary};
pub use render::{format_command, render, Status};
pub use telemetry::init_tracing;
