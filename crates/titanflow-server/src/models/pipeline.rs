//! Full pipeline request DTO

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use titanflow::{ContentAnalysis, PipelineError, PipelineStage, Script};

/// Full pipeline request
#[derive(Debug, Deserialize, ToSchema)]
pub struct FullPipelineRequest {
    /// Raw video mappings; any niche key selects niche analysis
    #[schema(value_type = Vec<Object>)]
    pub videos: Vec<serde_json::Value>,
    #[schema(example = "TikTok")]
    pub platform: Option<String>,
    pub target_niche: Option<String>,
    pub target_problem: Option<String>,
    pub tone: Option<String>,
    /// Cache the analysis under this id
    pub video_id: Option<String>,
}

/// Failed run: the failing stage plus the outputs completed before it
#[derive(Debug, Serialize, ToSchema)]
pub struct PipelineFailure {
    pub stage: PipelineStage,
    #[schema(example = "composition_error")]
    pub kind: String,
    pub error: String,
    pub analysis: Option<ContentAnalysis>,
    pub script: Option<Script>,
}

impl From<PipelineError> for PipelineFailure {
    fn from(err: PipelineError) -> Self {
        Self {
            stage: err.stage,
            kind: err.source.kind().to_string(),
            error: err.to_string(),
            analysis: err.analysis,
            script: err.script,
        }
    }
}
