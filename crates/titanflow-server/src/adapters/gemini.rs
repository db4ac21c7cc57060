//! Gemini-backed ContentAnalyzer
//!
//! Sends the video records to Gemini with a JSON response schema and maps
//! the answer onto the five base analysis fields.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use titanflow::{ContentAnalysis, ContentAnalyzer, DomainError, HookPattern, VideoRecord};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Content analyzer calling the Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiContentAnalyzer {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiContentAnalyzer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Overrides the Gemini model name if needed.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the adapter at another endpoint (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: String) -> Result<String, DomainError> {
        // key goes in a header, never in the URL
        let url = format!("{}/{}:generateContent", self.base_url, self.model);

        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                temperature: 0.4,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::analysis_unavailable(format!(
                    "Gemini request failed: {}",
                    e.without_url()
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let payload: Value = response.json().await.map_err(|e| {
            DomainError::analysis_unavailable(format!(
                "Failed to parse Gemini response: {}",
                e.without_url()
            ))
        })?;

        extract_text(&payload)
            .ok_or_else(|| DomainError::analysis_unavailable("No content in Gemini response"))
    }
}

#[async_trait]
impl ContentAnalyzer for GeminiContentAnalyzer {
    async fn summarize(&self, records: &[VideoRecord]) -> Result<ContentAnalysis, DomainError> {
        let prompt = build_prompt(records)?;
        tracing::debug!(
            "Requesting analysis of {} records from {}",
            records.len(),
            self.model
        );
        let text = self.generate(prompt).await?;
        parse_analysis(&text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

// ============================================
// Request/Response Types
// ============================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    temperature: f32,
}

/// Shape the model is asked to return
#[derive(Deserialize)]
struct AnalysisPayload {
    #[serde(default)]
    hook_patterns: Vec<HookPatternPayload>,
    #[serde(default)]
    format_trends: Vec<String>,
    #[serde(default)]
    engagement_tactics: Vec<String>,
    #[serde(default)]
    content_themes: Vec<String>,
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
struct HookPatternPayload {
    #[serde(rename = "type", alias = "hook_type")]
    hook_type: String,
    #[serde(default)]
    example: String,
}

// ============================================
// Helper Functions
// ============================================

fn build_prompt(records: &[VideoRecord]) -> Result<String, DomainError> {
    let videos = serde_json::to_string_pretty(records)
        .map_err(|e| DomainError::analysis_unavailable(format!("Failed to encode records: {}", e)))?;

    Ok(format!(
        r#"You are a short-form video content strategist. Analyze the viral videos below
and extract reusable content-strategy insights.

Return ONLY a single JSON object with this schema:
{{
  "hook_patterns": [{{"type": "shock-based", "example": "You're doing this wrong, here's why."}}],
  "format_trends": ["Hook -> Insight -> Visual Demo -> CTA"],
  "engagement_tactics": ["Open loops (e.g., 'Wait for it...')"],
  "content_themes": ["Time management hacks"],
  "summary": "One paragraph describing what makes these videos work."
}}

Rules:
- List content_themes from most to least dominant.
- Every hook pattern needs a concrete example line.
- Base every insight on the videos provided.

VIDEOS:
{videos}
"#
    ))
}

/// Concatenated text parts of the first candidate
fn extract_text(root: &Value) -> Option<String> {
    let parts = root
        .get("candidates")?
        .as_array()?
        .first()?
        .get("content")?
        .get("parts")?
        .as_array()?;

    let text: Vec<&str> = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect();

    if text.is_empty() {
        None
    } else {
        Some(text.join(""))
    }
}

/// Parse the model's JSON answer, tolerating a markdown code fence
fn parse_analysis(text: &str) -> Result<ContentAnalysis, DomainError> {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);

    let payload: AnalysisPayload = serde_json::from_str(text.trim()).map_err(|e| {
        DomainError::analysis_unavailable(format!("Malformed analysis from model: {}", e))
    })?;

    if payload.hook_patterns.is_empty() && payload.summary.trim().is_empty() {
        return Err(DomainError::analysis_unavailable(
            "Model returned neither hook patterns nor a summary",
        ));
    }

    Ok(ContentAnalysis {
        hook_patterns: payload
            .hook_patterns
            .into_iter()
            .map(|h| HookPattern::new(h.hook_type, h.example))
            .collect(),
        format_trends: payload.format_trends,
        engagement_tactics: payload.engagement_tactics,
        content_themes: payload.content_themes,
        summary: payload.summary,
        niche_insights: None,
    })
}

fn map_http_error(status: StatusCode, body: String) -> DomainError {
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(|msg| msg.to_string())
        })
        .unwrap_or(body);

    if status == StatusCode::TOO_MANY_REQUESTS {
        return DomainError::analysis_unavailable(format!("Gemini rate limited: {}", message));
    }
    DomainError::analysis_unavailable(format!("Gemini API error ({}): {}", status.as_u16(), message))
}
