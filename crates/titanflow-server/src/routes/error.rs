//! Error mapping from domain errors to HTTP responses

use axum::{http::StatusCode, Json};

use titanflow::{DomainError, PipelineError, Platform};

use crate::models::PipelineFailure;

pub type ApiError = (StatusCode, String);

fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::AnalysisUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Composition(_) | DomainError::Planning(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn domain_error(err: DomainError) -> ApiError {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!("{}", err);
    }
    (status, err.to_string())
}

/// Keeps the status of the underlying error; the body names the stage
pub fn pipeline_error(err: PipelineError) -> (StatusCode, Json<PipelineFailure>) {
    let status = status_for(&err.source);
    if status.is_server_error() {
        tracing::error!("{}", err);
    }
    (status, Json(err.into()))
}

pub fn parse_platform(raw: Option<&str>, default: Platform) -> Result<Platform, ApiError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<Platform>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e)),
    }
}
