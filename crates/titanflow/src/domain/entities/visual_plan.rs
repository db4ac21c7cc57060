//! VisualPlan - Shot-by-shot production plan derived from a script

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::value_objects::Platform;

/// Role of a scene within the video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Hook,
    Body,
    CallToAction,
}

/// One timestamped scene. `start_secs` is inclusive, `end_secs` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Scene {
    pub index: usize,
    pub kind: SceneKind,
    pub start_secs: u32,
    pub end_secs: u32,
    /// `m:ss-m:ss` rendering of the range
    pub timestamp: String,
    pub script_excerpt: String,
    pub footage: String,
    pub text_overlay: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
}

impl Scene {
    pub fn duration(&self) -> u32 {
        self.end_secs - self.start_secs
    }
}

/// Visual production plan. Stateless and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VisualPlan {
    pub scenes: Vec<Scene>,
    pub total_duration: u32,
    pub voiceover_guidance: String,
    pub music_guidance: String,
    #[schema(value_type = String, example = "TikTok")]
    pub platform: Platform,
    pub platform_tips: Vec<String>,
}

/// Format whole seconds as `m:ss`
pub fn format_timestamp(secs: u32) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
