//! Bearer key authentication for the pipeline and memory routes
//!
//! Disabled when no `TITANFLOW_API_KEY` is configured.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

static API_KEY: OnceLock<String> = OnceLock::new();

pub fn init_api_key(key: String) {
    let _ = API_KEY.set(key);
}

#[derive(Debug, PartialEq, Eq)]
enum AuthFailure {
    MissingHeader,
    NotBearer,
    WrongKey,
}

/// Check an `Authorization` header value against the configured key
fn authorize(header: Option<&str>, expected: Option<&str>) -> Result<(), AuthFailure> {
    let Some(expected) = expected.filter(|key| !key.is_empty()) else {
        return Ok(());
    };

    let token = header
        .ok_or(AuthFailure::MissingHeader)?
        .strip_prefix("Bearer ")
        .ok_or(AuthFailure::NotBearer)?
        .trim();

    // fixed-length digests
    if Sha256::digest(token.as_bytes()) == Sha256::digest(expected.as_bytes()) {
        Ok(())
    } else {
        Err(AuthFailure::WrongKey)
    }
}

/// Authentication middleware
pub async fn auth_middleware(request: Request, next: Next) -> Result<Response, StatusCode> {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    match authorize(header, API_KEY.get().map(String::as_str)) {
        Ok(()) => Ok(next.run(request).await),
        Err(failure) => {
            tracing::warn!(
                "Rejected {} {}: {:?}",
                request.method(),
                request.uri().path(),
                failure
            );
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
