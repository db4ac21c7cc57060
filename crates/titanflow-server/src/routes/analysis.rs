//! Analysis Routes
//!
//! HTTP handlers that delegate to AnalysisService.

use axum::{extract::State, routing::post, Json, Router};

use titanflow::domain::validate_records;
use titanflow::{ContentAnalysis, NicheFilter};

use super::error::{domain_error, parse_platform, ApiError};
use crate::application::AnalyzeOptions;
use crate::models::{cache_mode, AnalyzeRequest, NicheAnalyzeRequest};
use crate::AppState;

/// Analyze videos
#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Content analysis", body = ContentAnalysis),
        (status = 400, description = "Invalid video record"),
        (status = 503, description = "Content analyzer unavailable")
    ),
    tag = "Analysis"
)]
pub async fn analyze(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<ContentAnalysis>, ApiError> {
    let records = validate_records(payload.videos).map_err(domain_error)?;
    let platform = parse_platform(
        payload.platform.as_deref(),
        state.pipeline_service.config().default_platform,
    )?;

    let options = AnalyzeOptions {
        niche_filter: None,
        analysis_type: payload.analysis_type,
        platform,
        cache: cache_mode(payload.video_id, payload.cache),
    };

    let analysis = state
        .analysis_service
        .analyze(records, options)
        .await
        .map_err(domain_error)?;

    Ok(Json(analysis))
}

/// Analyze videos filtered by niche, problem or audience
#[utoipa::path(
    post,
    path = "/niche-analysis",
    request_body = NicheAnalyzeRequest,
    responses(
        (status = 200, description = "Content analysis with niche insights", body = ContentAnalysis),
        (status = 400, description = "Invalid video record"),
        (status = 503, description = "Content analyzer unavailable")
    ),
    tag = "Analysis"
)]
pub async fn niche_analysis(
    State(state): State<AppState>,
    Json(payload): Json<NicheAnalyzeRequest>,
) -> Result<Json<ContentAnalysis>, ApiError> {
    let records = validate_records(payload.videos).map_err(domain_error)?;
    let platform = parse_platform(
        payload.platform.as_deref(),
        state.pipeline_service.config().default_platform,
    )?;

    let options = AnalyzeOptions {
        niche_filter: Some(NicheFilter::new(
            payload.target_niche,
            payload.target_problem,
            payload.target_audience,
        )),
        analysis_type: payload.analysis_type,
        platform,
        cache: cache_mode(payload.video_id, payload.cache),
    };

    let analysis = state
        .analysis_service
        .analyze(records, options)
        .await
        .map_err(domain_error)?;

    Ok(Json(analysis))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze))
        .route("/niche-analysis", post(niche_analysis))
}
