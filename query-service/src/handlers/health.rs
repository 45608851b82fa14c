use axum::{
    http::{Method, StatusCode, Uri},
    Json,
};
use service_core::error::AppError;

use crate::dtos::HealthResponse;

/// Liveness probe. The body is fixed; no dependency is consulted.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Readiness probe for orchestrators.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}

pub async fn fallback(method: Method, uri: Uri) -> AppError {
    AppError::NotFound(anyhow::anyhow!("{} {}", method, uri.path()))
}
