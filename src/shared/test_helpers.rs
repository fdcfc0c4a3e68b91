use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};

use crate::core::app::{build_app, AppServices};
use crate::core::config::{AppConfig, CacheConfig, StoreConfig, SwaggerConfig};
use crate::core::error::Result;
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryProduct, CategorySummary, NewCategory,
};
use crate::features::products::models::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::modules::cache::ResponseCache;
use crate::modules::store::{CatalogStore, MemoryCatalogStore};

pub fn test_app_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_allowed_origins: vec!["*".to_string()],
        max_request_body_size: 1024 * 1024,
    }
}

pub fn test_swagger_config() -> SwaggerConfig {
    SwaggerConfig {
        username: None,
        password: None,
        title: "Product Catalog API".to_string(),
        version: "test".to_string(),
        description: "test".to_string(),
    }
}

/// Full router over the given store, with default timeouts and cache TTL
pub fn test_server_with(store: Arc<dyn CatalogStore>, cache: Arc<ResponseCache>) -> TestServer {
    test_server_with_config(store, cache, &StoreConfig::default())
}

pub fn test_server_with_config(
    store: Arc<dyn CatalogStore>,
    cache: Arc<ResponseCache>,
    store_config: &StoreConfig,
) -> TestServer {
    let services = AppServices::new(store, cache, store_config, &CacheConfig::default());
    let app = build_app(services, &test_app_config(), &test_swagger_config());
    TestServer::new(app).unwrap()
}

/// Store config whose timeout a `StalledStore` always exceeds
pub fn short_timeout() -> StoreConfig {
    StoreConfig {
        timeout: Duration::from_millis(50),
        ..StoreConfig::default()
    }
}

/// Store that never answers in time; every call parks for ten seconds
pub struct StalledStore;

impl StalledStore {
    async fn stall<T>(&self) -> T {
        tokio::time::sleep(Duration::from_secs(10)).await;
        panic!("stalled store call outlived the store timeout");
    }
}

#[async_trait]
impl CatalogStore for StalledStore {
    async fn ping(&self) -> bool {
        self.stall().await
    }
    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        self.stall().await
    }
    async fn find_category(&self, _id: i64) -> Result<Option<Category>> {
        self.stall().await
    }
    async fn list_category_products(&self, _category_id: i64) -> Result<Vec<CategoryProduct>> {
        self.stall().await
    }
    async fn insert_category(&self, _category: &NewCategory) -> Result<Category> {
        self.stall().await
    }
    async fn update_category(
        &self,
        _id: i64,
        _changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        self.stall().await
    }
    async fn delete_category(&self, _id: i64) -> Result<bool> {
        self.stall().await
    }
    async fn list_products(&self, _filter: &ProductFilter) -> Result<(Vec<Product>, i64)> {
        self.stall().await
    }
    async fn find_product(&self, _id: i64) -> Result<Option<Product>> {
        self.stall().await
    }
    async fn insert_product(&self, _product: &NewProduct) -> Result<Product> {
        self.stall().await
    }
    async fn update_product(
        &self,
        _id: i64,
        _changes: &ProductChanges,
    ) -> Result<Option<Product>> {
        self.stall().await
    }
    async fn delete_product(&self, _id: i64) -> Result<bool> {
        self.stall().await
    }
    async fn feature_product(&self, _id: i64) -> Result<Option<Product>> {
        self.stall().await
    }
}

/// Router backed by an empty in-memory store
pub fn test_server() -> TestServer {
    test_server_with(
        Arc::new(MemoryCatalogStore::new()),
        Arc::new(ResponseCache::new()),
    )
}

pub async fn create_category(server: &TestServer, name: &str) -> Value {
    let response = server
        .post("/api/v1/categories")
        .json(&json!({ "category": { "name": name } }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

pub async fn create_product(server: &TestServer, body: Value) -> Value {
    let response = server
        .post("/api/v1/products")
        .json(&json!({ "product": body }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}
