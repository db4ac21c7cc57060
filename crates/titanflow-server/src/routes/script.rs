//! Script Routes

use axum::{extract::State, routing::post, Json, Router};

use titanflow::Script;

use super::error::{domain_error, parse_platform, ApiError};
use crate::models::ScriptRequest;
use crate::AppState;

/// Generate a script from a content analysis
#[utoipa::path(
    post,
    path = "/generate-script",
    request_body = ScriptRequest,
    responses(
        (status = 200, description = "Composed script", body = Script),
        (status = 400, description = "Unknown platform"),
        (status = 422, description = "Nothing to compose from")
    ),
    tag = "Script"
)]
pub async fn generate_script(
    State(state): State<AppState>,
    Json(payload): Json<ScriptRequest>,
) -> Result<Json<Script>, ApiError> {
    let (analysis, platform) = payload.into_parts();
    let platform = parse_platform(
        platform.as_deref(),
        state.pipeline_service.config().default_platform,
    )?;

    let script = state
        .pipeline_service
        .compose_script(&analysis, Some(platform))
        .map_err(domain_error)?;

    Ok(Json(script))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/generate-script", post(generate_script))
}
