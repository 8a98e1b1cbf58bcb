//! GitHub-style definitions: `jobs:` each holding a list of `steps:`.

use tracing::debug;

use super::document::{decode, map_field, seq_field, str_field, string_keyed};
use crate::error::Result;
use crate::model::{Pipeline, Stage, Step};

/// Parse a GitHub-style document. Every job becomes one stage, in document
/// order. A document without `jobs:` yields an empty pipeline.
pub fn parse(bytes: &[u8]) -> Result<Pipeline> {
    let doc = decode(bytes)?;

    let Some(jobs) = map_field(&doc, "jobs") else {
        debug!("No jobs mapping found");
        return Ok(Pipeline::default());
    };

    let mut stages = Vec::new();
    for (job_name, value) in string_keyed(jobs) {
        let Some(job) = value.as_mapping() else {
            debug!(job = %job_name, "Skipping job that is not a mapping");
            continue;
        };

        let mut stage = Stage::new(job_name);
        for entry in seq_field(job, "steps").unwrap_or_default() {
            let Some(step) = entry.as_mapping() else {
                continue;
            };
            stage.steps.push(Step::new(
                str_field(step, "name").unwrap_or_default(),
                str_field(step, "run").unwrap_or_default(),
            ));
        }
        stages.push(stage);
    }

    debug!(stages = stages.len(), "Parsed GitHub pipeline");
    Ok(Pipeline::new(stages))
}
