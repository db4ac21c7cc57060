//! Service information routes: index, health and sample requests

use axum::{extract::State, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use utoipa::ToSchema;

use crate::AppState;

const ENDPOINTS: &[&str] = &[
    "/analyze",
    "/niche-analysis",
    "/generate-script",
    "/create-visual-plan",
    "/full-pipeline",
    "/memory/{video_id}",
    "/memory/cleanup",
    "/memory/backup",
    "/sample",
    "/health",
];

/// Service index
#[derive(Debug, Serialize, ToSchema)]
pub struct IndexResponse {
    pub message: String,
    pub endpoints: Vec<String>,
    /// False in degraded mode: analysis endpoints answer 503
    pub analyzer_loaded: bool,
    pub analyzer: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheck {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

/// Service index
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Available endpoints", body = IndexResponse)
    ),
    tag = "System"
)]
pub async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    let analyzer = state.analysis_service.analyzer_name().map(str::to_string);
    Json(IndexResponse {
        message: "Welcome to TitanFlow Content Strategy API".to_string(),
        endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        analyzer_loaded: analyzer.is_some(),
        analyzer,
    })
}

/// Health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthCheck)
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Sample request bodies for every endpoint
#[utoipa::path(
    get,
    path = "/sample",
    responses(
        (status = 200, description = "Sample requests", body = Object)
    ),
    tag = "System"
)]
pub async fn sample() -> Json<Value> {
    Json(sample_requests())
}

pub fn sample_requests() -> Value {
    let videos = json!([
        {
            "title": "5 Morning Habits That Changed My Life",
            "description": "I tried these 5 morning habits for 30 days and here's what happened...",
            "views": 1500000,
            "publishedAt": "2023-05-15",
            "channel": "ProductivityGuru"
        },
        {
            "title": "You've Been Charging Your Phone Wrong",
            "description": "This simple trick will make your battery last twice as long!",
            "views": 2300000,
            "publishedAt": "2023-06-02",
            "channel": "TechHacks"
        }
    ]);

    let analysis = json!({
        "hook_patterns": [
            {"type": "shock-based", "example": "You're doing this wrong, here's why."},
            {"type": "question-based", "example": "What if I told you this one habit could change your life?"}
        ],
        "format_trends": [
            "Hook -> Insight -> Visual Demo -> CTA",
            "Fast-paced cuts with meme overlays and subtitles"
        ],
        "engagement_tactics": [
            "Open loops (e.g., 'Wait for it...')",
            "Direct CTAs ('Follow me for more')"
        ],
        "content_themes": [
            "Time management hacks",
            "Exposing common myths"
        ],
        "summary": "The most effective viral videos use fast-paced editing with captions and B-roll, lead with a curiosity or pain-point hook, and close with direct CTAs.",
        "platform": "TikTok"
    });

    let script = json!({
        "script": "We all struggle with having too much to do and too little time. [show overwhelmed person]\n\nHere's a simple system that changed everything for me: [cut to notebook] The 1-3-5 Rule. Each day, commit to 1 big thing, 3 medium things, and 5 small things. [show list]\n\nThis prevents overwhelm while still ensuring progress on what matters. [show completed list]",
        "hook": "I can't believe I didn't know this behind-the-scenes secret sooner.",
        "cta": "Stitch this with your results!",
        "niche": "productivity",
        "tone": "informative",
        "platform": "TikTok"
    });

    json!({
        "analyze_endpoint": {
            "videos": videos,
            "analysis_type": "full"
        },
        "niche_analysis_endpoint": {
            "videos": videos,
            "analysis_type": "full",
            "target_niche": "productivity"
        },
        "generate_script_endpoint": analysis,
        "create_visual_plan_endpoint": script,
        "full_pipeline_endpoint": {
            "videos": videos,
            "platform": "TikTok"
        }
    })
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/sample", get(sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AnalyzeRequest, ScriptRequest, VisualPlanRequest};

    #[test]
    fn test_samples_parse_as_requests() {
        let samples = sample_requests();

        let analyze: AnalyzeRequest =
            serde_json::from_value(samples["analyze_endpoint"].clone()).unwrap();
        assert_eq!(analyze.videos.len(), 2);
        assert_eq!(analyze.analysis_type, "full");

        let script: ScriptRequest =
            serde_json::from_value(samples["generate_script_endpoint"].clone()).unwrap();
        assert_eq!(script.hook_patterns.len(), 2);

        let visual: VisualPlanRequest =
            serde_json::from_value(samples["create_visual_plan_endpoint"].clone()).unwrap();
        assert!(visual.estimated_duration.is_none());
    }
}
