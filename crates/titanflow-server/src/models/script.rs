//! Script request DTO

use serde::Deserialize;
use utoipa::ToSchema;

use titanflow::{ContentAnalysis, HookPattern, NicheInsights};

/// Script request: the analysis fields plus a platform
#[derive(Debug, Deserialize, ToSchema)]
pub struct ScriptRequest {
    #[serde(default)]
    pub hook_patterns: Vec<HookPattern>,
    #[serde(default)]
    pub format_trends: Vec<String>,
    #[serde(default)]
    pub engagement_tactics: Vec<String>,
    #[serde(default)]
    pub content_themes: Vec<String>,
    #[serde(default)]
    pub summary: String,
    pub niche_insights: Option<NicheInsights>,
    #[schema(example = "TikTok")]
    pub platform: Option<String>,
}

impl ScriptRequest {
    pub fn into_parts(self) -> (ContentAnalysis, Option<String>) {
        (
            ContentAnalysis {
                hook_patterns: self.hook_patterns,
                format_trends: self.format_trends,
                engagement_tactics: self.engagement_tactics,
                content_themes: self.content_themes,
                summary: self.summary,
                niche_insights: self.niche_insights,
            },
            self.platform,
        )
    }
}
