use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/v1/categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/api/v1/categories/{id}",
            get(handlers::get_category)
                .patch(handlers::update_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .with_state(service)
}
