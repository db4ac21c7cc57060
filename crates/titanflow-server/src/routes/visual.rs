//! Visual Plan Routes

use axum::{extract::State, routing::post, Json, Router};

use titanflow::VisualPlan;

use super::error::{domain_error, parse_platform, ApiError};
use crate::models::VisualPlanRequest;
use crate::AppState;

/// Create a visual production plan from a script
#[utoipa::path(
    post,
    path = "/create-visual-plan",
    request_body = VisualPlanRequest,
    responses(
        (status = 200, description = "Scene-by-scene visual plan", body = VisualPlan),
        (status = 400, description = "Unknown platform"),
        (status = 422, description = "Script cannot be planned")
    ),
    tag = "Visual"
)]
pub async fn create_visual_plan(
    State(state): State<AppState>,
    Json(payload): Json<VisualPlanRequest>,
) -> Result<Json<VisualPlan>, ApiError> {
    let service = &state.pipeline_service;
    let platform = parse_platform(payload.platform.as_deref(), service.config().default_platform)?;
    let script = payload.to_script(platform, service.composer().words_per_second());

    let plan = service
        .plan_visuals(&script, payload.tone.as_deref())
        .map_err(domain_error)?;

    Ok(Json(plan))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/create-visual-plan", post(create_visual_plan))
}
