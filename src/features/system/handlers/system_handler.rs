use std::sync::Arc;

use axum::{extract::State, Json};

use crate::features::system::dtos::{ApiInfoDto, HealthResponseDto};
use crate::features::system::services::SystemService;

/// Service health
///
/// Always 200; `status` is `degraded` when the store does not answer.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health report", body = HealthResponseDto),
    ),
    tag = "system"
)]
pub async fn health_check(State(service): State<Arc<SystemService>>) -> Json<HealthResponseDto> {
    Json(service.health().await)
}

/// API banner with version and entry points
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "API info", body = ApiInfoDto),
    ),
    tag = "system"
)]
pub async fn api_info(State(service): State<Arc<SystemService>>) -> Json<ApiInfoDto> {
    Json(service.info())
}
