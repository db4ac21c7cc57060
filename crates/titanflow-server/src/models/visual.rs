//! Visual plan request DTO

use serde::Deserialize;
use utoipa::ToSchema;

use titanflow::{estimate_duration, Platform, Script};

/// Visual plan request: script fields plus tone and platform
#[derive(Debug, Deserialize, ToSchema)]
pub struct VisualPlanRequest {
    /// Script body; beats separated by blank lines
    pub script: String,
    /// Hook line
    #[serde(default, alias = "title")]
    pub hook: String,
    #[serde(default)]
    pub cta: String,
    /// Niche or theme of the video
    #[serde(default, alias = "theme")]
    pub niche: String,
    pub hook_type: Option<String>,
    pub tone: Option<String>,
    #[schema(example = "TikTok")]
    pub platform: Option<String>,
    /// Estimated when omitted
    pub estimated_duration: Option<u32>,
}

impl VisualPlanRequest {
    /// Rebuild the script, estimating the duration at `words_per_second` if needed
    pub fn to_script(&self, platform: Platform, words_per_second: f64) -> Script {
        let estimated_duration = self.estimated_duration.unwrap_or_else(|| {
            estimate_duration(
                &format!("{} {} {}", self.hook, self.script, self.cta),
                words_per_second,
            )
        });

        Script {
            title: self.hook.clone(),
            body: self.script.clone(),
            cta: self.cta.clone(),
            theme: self.niche.clone(),
            hook_type: self.hook_type.clone().unwrap_or_default(),
            estimated_duration,
            platform,
            notes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_duration_is_estimated() {
        let request: VisualPlanRequest = serde_json::from_value(serde_json::json!({
            "script": "one two three four five six seven eight nine ten",
            "hook": "hook",
            "cta": "follow",
            "niche": "productivity",
            "tone": "informative",
            "platform": "TikTok"
        }))
        .unwrap();

        let script = request.to_script(Platform::TikTok, 2.5);
        // 12 words at 2.5 wps
        assert_eq!(script.estimated_duration, 5);
        assert_eq!(script.theme, "productivity");
    }
}
