//! Catalog persistence
//!
//! `CatalogStore` is the only way services reach category and product rows.
//! `PgCatalogStore` is the production backend; `MemoryCatalogStore` keeps the
//! same semantics in process and backs local runs without `DATABASE_URL` and
//! the test suite.
//!
//! Both backends:
//! - reject duplicate category names with a `name` validation error
//! - refuse to delete a category that still owns products (409)
//! - resolve `category_name` for a whole page in one lookup, never per row

mod memory;
mod postgres;
mod seed;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;
pub use seed::seed_demo_catalog;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryProduct, CategorySummary, NewCategory,
};
use crate::features::products::models::{NewProduct, Product, ProductChanges, ProductFilter};

pub const DUPLICATE_NAME_MESSAGE: &str = "has already been taken";
pub const MISSING_CATEGORY_MESSAGE: &str = "must exist";
pub const DEPENDENT_PRODUCTS_MESSAGE: &str = "cannot delete category with dependent products";

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Whether the backend currently answers queries
    async fn ping(&self) -> bool;

    /// All categories with product counts, aggregated in one pass
    async fn list_categories(&self) -> Result<Vec<CategorySummary>>;
    async fn find_category(&self, id: i64) -> Result<Option<Category>>;
    async fn list_category_products(&self, category_id: i64) -> Result<Vec<CategoryProduct>>;
    async fn insert_category(&self, category: &NewCategory) -> Result<Category>;
    async fn update_category(&self, id: i64, changes: &CategoryChanges)
        -> Result<Option<Category>>;
    /// `Ok(false)` when no such row; `Conflict` while products still reference it
    async fn delete_category(&self, id: i64) -> Result<bool>;

    /// One page of products with category names plus the unpaged total
    async fn list_products(&self, filter: &ProductFilter) -> Result<(Vec<Product>, i64)>;
    async fn find_product(&self, id: i64) -> Result<Option<Product>>;
    async fn insert_product(&self, product: &NewProduct) -> Result<Product>;
    async fn update_product(&self, id: i64, changes: &ProductChanges) -> Result<Option<Product>>;
    async fn delete_product(&self, id: i64) -> Result<bool>;
    /// Sets `is_featured = true` and nothing else
    async fn feature_product(&self, id: i64) -> Result<Option<Product>>;
}

/// Run a store call with an upper time bound; expiry surfaces as 503
pub async fn bounded<T, F>(timeout: Duration, operation: &str, call: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::error!("Store call timed out: {} after {:?}", operation, timeout);
            Err(AppError::StoreUnavailable(format!(
                "{} timed out after {:?}",
                operation, timeout
            )))
        }
    }
}
