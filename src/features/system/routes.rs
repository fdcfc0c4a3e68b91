use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::system::handlers;
use crate::features::system::services::SystemService;

pub fn routes(service: Arc<SystemService>) -> Router {
    Router::new()
        .route("/", get(handlers::api_info))
        .route("/health", get(handlers::health_check))
        .with_state(service)
}
