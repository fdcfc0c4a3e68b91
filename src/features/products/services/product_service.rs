use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use validator::Validate;

use crate::core::error::{field_errors, AppError, FieldErrors, Result};
use crate::features::products::dtos::{
    CreateProductDto, ProductListQuery, ProductListResponseDto, ProductResponseDto,
    UpdateProductDto,
};
use crate::features::products::models::{Product, ProductChanges, ProductFilter};
use crate::modules::cache::{product_cache_key, ResponseCache};
use crate::modules::store::{bounded, CatalogStore, MISSING_CATEGORY_MESSAGE};
use crate::shared::types::PaginationMeta;

/// Service for product operations.
///
/// Show responses are cached under `product_<id>`; every write that changes a
/// product drops that key before returning.
pub struct ProductService {
    store: Arc<dyn CatalogStore>,
    cache: Arc<ResponseCache>,
    cache_ttl: Duration,
    timeout: Duration,
}

impl ProductService {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache: Arc<ResponseCache>,
        cache_ttl: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            cache_ttl,
            timeout,
        }
    }

    /// One page of products, optionally restricted to a category
    pub async fn list(&self, query: &ProductListQuery) -> Result<ProductListResponseDto> {
        let pagination = query.pagination();
        let filter = ProductFilter {
            category_id: query.category_id,
            offset: pagination.offset(),
            limit: pagination.limit(),
        };

        let (products, total) =
            bounded(self.timeout, "list products", self.store.list_products(&filter)).await?;

        Ok(ProductListResponseDto {
            products: products.into_iter().map(Into::into).collect(),
            pagination: PaginationMeta::new(&pagination, total),
        })
    }

    pub async fn get(&self, id: i64) -> Result<ProductResponseDto> {
        self.find(id).await.map(Into::into)
    }

    /// Serialized show body, served from the cache while the entry is live
    pub async fn get_cached(&self, id: i64) -> Result<Bytes> {
        self.cache
            .get_or_populate(&product_cache_key(id), self.cache_ttl, || async move {
                let product = self.get(id).await?;
                serde_json::to_vec(&product)
                    .map(Bytes::from)
                    .map_err(|e| AppError::Internal(format!("Failed to serialize product: {}", e)))
            })
            .await
    }

    pub async fn create(&self, dto: CreateProductDto) -> Result<ProductResponseDto> {
        let mut errors = collect_errors(&dto);
        self.check_category(dto.category_id, &mut errors).await?;
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let new_product = dto.into_new_product();
        let product = bounded(
            self.timeout,
            "insert product",
            self.store.insert_product(&new_product),
        )
        .await?;

        tracing::info!("Product created: id={}", product.id);
        Ok(product.into())
    }

    /// A missing product is a 404 even when the body would also fail validation
    pub async fn update(&self, id: i64, dto: UpdateProductDto) -> Result<ProductResponseDto> {
        self.find(id).await?;

        let mut errors = collect_errors(&dto);
        let changes = ProductChanges::from(dto);
        self.check_category(changes.target_category(), &mut errors)
            .await?;
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let product = bounded(
            self.timeout,
            "update product",
            self.store.update_product(id, &changes),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;

        self.cache.invalidate(&product_cache_key(id)).await;
        tracing::info!("Product updated: id={}", id);
        Ok(product.into())
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted =
            bounded(self.timeout, "delete product", self.store.delete_product(id)).await?;

        if !deleted {
            return Err(AppError::NotFound(format!("Product {}", id)));
        }

        self.cache.invalidate(&product_cache_key(id)).await;
        tracing::info!("Product deleted: id={}", id);
        Ok(())
    }

    /// Mark as featured; calling it again is a no-op apart from `updated_at`
    pub async fn feature(&self, id: i64) -> Result<ProductResponseDto> {
        let product = bounded(self.timeout, "feature product", self.store.feature_product(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))?;

        self.cache.invalidate(&product_cache_key(id)).await;
        tracing::info!("Product featured: id={}", id);
        Ok(product.into())
    }

    async fn find(&self, id: i64) -> Result<Product> {
        bounded(self.timeout, "find product", self.store.find_product(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Product {}", id)))
    }

    /// Adds a `category_id` error when the referenced category has no row
    async fn check_category(&self, category_id: Option<i64>, errors: &mut FieldErrors) -> Result<()> {
        let Some(category_id) = category_id else {
            return Ok(());
        };

        let category = bounded(
            self.timeout,
            "find category",
            self.store.find_category(category_id),
        )
        .await?;

        if category.is_none() {
            errors
                .entry("category_id".to_string())
                .or_default()
                .push(MISSING_CATEGORY_MESSAGE.to_string());
        }
        Ok(())
    }
}

fn collect_errors(dto: &impl Validate) -> FieldErrors {
    dto.validate()
        .err()
        .map(|e| field_errors(&e))
        .unwrap_or_default()
}
