//! Reusable containers for record IDs.
use serde::Deserialize;
use serde::Serialize;

/// Identify a deploy pipeline (stage) of a project.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PipelineID {
    /// ID of the project the pipeline deploys.
    pub project_id: i64,

    /// ID of the stage implementing the pipeline.
    pub stage_id: i64,
}
