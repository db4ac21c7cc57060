//! Analysis request DTOs

use serde::Deserialize;
use utoipa::ToSchema;

use titanflow::VideoRecordInput;

use crate::application::CacheMode;

/// Analyze request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub videos: Vec<VideoRecordInput>,
    #[serde(default = "super::default_analysis_type")]
    pub analysis_type: String,
    /// Cache the result under this id
    pub video_id: Option<String>,
    /// Cache under a key derived from the request when no `video_id` is given
    #[serde(default)]
    pub cache: bool,
    /// Platform recorded with the cached entry
    pub platform: Option<String>,
}

/// Niche analysis request
#[derive(Debug, Deserialize, ToSchema)]
pub struct NicheAnalyzeRequest {
    pub videos: Vec<VideoRecordInput>,
    #[serde(default = "super::default_analysis_type")]
    pub analysis_type: String,
    pub target_niche: Option<String>,
    pub target_problem: Option<String>,
    pub target_audience: Option<String>,
    pub video_id: Option<String>,
    #[serde(default)]
    pub cache: bool,
    pub platform: Option<String>,
}

pub fn cache_mode(video_id: Option<String>, cache: bool) -> CacheMode {
    match video_id.filter(|id| !id.trim().is_empty()) {
        Some(id) => CacheMode::Key(id),
        None if cache => CacheMode::Auto,
        None => CacheMode::Disabled,
    }
}
