use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::products::handlers;
use crate::features::products::services::ProductService;

/// Create routes for the products feature
pub fn routes(service: Arc<ProductService>) -> Router {
    Router::new()
        .route(
            "/api/v1/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/api/v1/products/{id}",
            get(handlers::get_product)
                .patch(handlers::update_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route(
            "/api/v1/products/{id}/feature",
            patch(handlers::feature_product),
        )
        .with_state(service)
}
