//! GitLab-style definitions: top-level jobs with `stage:` and `script:`.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use super::document::{decode, seq_field, str_field, string_keyed};
use crate::error::Result;
use crate::model::{Pipeline, Stage, Step};

/// Stage used for jobs that do not name one.
pub const DEFAULT_STAGE: &str = "default";

/// Parse a GitLab-style document.
///
/// Declared `stages:` come first, in declared order; stages that only appear
/// on jobs follow in the order they were first referenced.
pub fn parse(bytes: &[u8]) -> Result<Pipeline> {
    let doc = decode(bytes)?;
    let declared = declared_order(&doc);

    // Insertion order doubles as first-appearance order.
    let mut found: Vec<Stage> = Vec::new();

    for (job_name, value) in string_keyed(&doc) {
        let Some(job) = value.as_mapping() else {
            continue;
        };
        let Some(commands) = script_commands(job) else {
            debug!(job = %job_name, "Skipping job without a script");
            continue;
        };

        let stage_name = str_field(job, "stage").unwrap_or(DEFAULT_STAGE);
        let index = match found.iter().position(|s| s.name == stage_name) {
            Some(index) => index,
            None => {
                found.push(Stage::new(stage_name));
                found.len() - 1
            }
        };

        found[index]
            .steps
            .extend(commands.into_iter().map(|cmd| Step::new(cmd, cmd)));
    }

    let mut stages = Vec::with_capacity(found.len());
    for name in &declared {
        if let Some(index) = found.iter().position(|s| &s.name == name) {
            stages.push(found.remove(index));
        }
    }
    stages.extend(found);

    debug!(stages = stages.len(), "Parsed GitLab pipeline");
    Ok(Pipeline::new(stages))
}

/// String entries of the top-level `stages:` list.
fn declared_order(doc: &Mapping) -> Vec<String> {
    seq_field(doc, "stages")
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Commands of a job's `script`, which may be a list or a single string.
/// `None` when the job has no usable script at all.
fn script_commands(job: &Mapping) -> Option<Vec<&str>> {
    if let Some(single) = str_field(job, "script") {
        return Some(vec![single]);
    }
    seq_field(job, "script").map(|entries| entries.iter().filter_map(Value::as_str).collect())
}
