//! Full Pipeline Routes

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use titanflow::{DomainError, PipelineError, PipelineStage};

use super::error::{parse_platform, pipeline_error};
use crate::application::{PipelineOutcome, PipelineRequest};
use crate::models::{FullPipelineRequest, PipelineFailure};
use crate::AppState;

/// Run analysis, script and visual plan in one call
#[utoipa::path(
    post,
    path = "/full-pipeline",
    request_body = FullPipelineRequest,
    responses(
        (status = 200, description = "Analysis, script and visual plan", body = PipelineOutcome),
        (status = 400, description = "Invalid video record or platform", body = PipelineFailure),
        (status = 422, description = "Script or visual plan stage failed", body = PipelineFailure),
        (status = 503, description = "Content analyzer unavailable", body = PipelineFailure)
    ),
    tag = "Pipeline"
)]
pub async fn full_pipeline(
    State(state): State<AppState>,
    Json(payload): Json<FullPipelineRequest>,
) -> Result<Json<PipelineOutcome>, (StatusCode, Json<PipelineFailure>)> {
    let platform = parse_platform(
        payload.platform.as_deref(),
        state.pipeline_service.config().default_platform,
    )
    .map_err(|(_, message)| {
        pipeline_error(PipelineError::new(
            PipelineStage::Analysis,
            DomainError::validation(message),
        ))
    })?;

    let outcome = state
        .pipeline_service
        .run(PipelineRequest {
            records: payload.videos,
            platform: Some(platform),
            target_niche: payload.target_niche,
            target_problem: payload.target_problem,
            tone: payload.tone,
            video_id: payload.video_id,
        })
        .await
        .map_err(pipeline_error)?;

    Ok(Json(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/full-pipeline", post(full_pipeline))
}
