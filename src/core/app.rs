use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::core::config::{AppConfig, CacheConfig, StoreConfig, SwaggerConfig};
use crate::core::middleware;
use crate::core::openapi::{ApiDoc, SwaggerInfoModifier};
use crate::features::categories::{routes as categories_routes, CategoryService};
use crate::features::products::{routes as products_routes, ProductService};
use crate::features::system::{routes as system_routes, SystemService};
use crate::modules::cache::ResponseCache;
use crate::modules::store::CatalogStore;

/// Services shared by the HTTP layer
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub products: Arc<ProductService>,
    pub system: Arc<SystemService>,
}

impl AppServices {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<ResponseCache>,
        store_config: &StoreConfig,
        cache_config: &CacheConfig,
    ) -> Self {
        let timeout = store_config.timeout;

        Self {
            categories: Arc::new(CategoryService::new(Arc::clone(&store), timeout)),
            products: Arc::new(ProductService::new(
                Arc::clone(&store),
                cache,
                cache_config.product_ttl,
                timeout,
            )),
            system: Arc::new(SystemService::new(store, timeout)),
        }
    }
}

/// Swagger UI plus the OpenAPI document, behind basic auth when credentials are set
fn swagger_router(swagger: &SwaggerConfig) -> Router {
    let swagger_modifier = SwaggerInfoModifier {
        title: swagger.title.clone(),
        version: swagger.version.clone(),
        description: swagger.description.clone(),
    };

    let mut openapi = ApiDoc::openapi();
    swagger_modifier.modify(&mut openapi);

    let router =
        Router::new().merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi));

    match swagger.credentials() {
        Some(credentials) => {
            tracing::info!("Swagger UI basic auth enabled");
            router.layer(from_fn(middleware::basic_auth_middleware(Arc::new(
                credentials,
            ))))
        }
        None => {
            tracing::info!("Swagger UI basic auth disabled (no credentials configured)");
            router
        }
    }
}

/// Full application router with middleware applied
pub fn build_app(services: AppServices, app: &AppConfig, swagger: &SwaggerConfig) -> Router {
    Router::new()
        .merge(swagger_router(swagger))
        .merge(system_routes::routes(services.system))
        .merge(categories_routes::routes(services.categories))
        .merge(products_routes::routes(services.products))
        .layer(DefaultBodyLimit::max(app.max_request_body_size))
        .layer(middleware::cors_layer(app.cors_allowed_origins.clone()))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}
