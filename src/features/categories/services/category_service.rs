use std::sync::Arc;
use std::time::Duration;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryListItemDto, CategoryResponseDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::modules::store::{bounded, CatalogStore};

/// Service for category operations
pub struct CategoryService {
    store: Arc<dyn CatalogStore>,
    timeout: Duration,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CatalogStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// All categories with their product counts
    pub async fn list(&self) -> Result<Vec<CategoryListItemDto>> {
        let categories = bounded(self.timeout, "list categories", self.store.list_categories())
            .await?;

        Ok(categories.into_iter().map(Into::into).collect())
    }

    /// Category with its products, fetched as two queries regardless of product count
    pub async fn get(&self, id: i64) -> Result<CategoryDetailDto> {
        let category = bounded(self.timeout, "find category", self.store.find_category(id))
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Category {}", id)))?;

        let products = bounded(
            self.timeout,
            "list category products",
            self.store.list_category_products(id),
        )
        .await?;

        Ok(CategoryDetailDto::new(category, products))
    }

    pub async fn create(&self, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        dto.validate()?;

        let new_category = dto.into_new_category();
        let category = bounded(
            self.timeout,
            "insert category",
            self.store.insert_category(&new_category),
        )
        .await?;

        tracing::info!("Category created: id={}", category.id);
        Ok(category.into())
    }

    pub async fn update(&self, id: i64, dto: UpdateCategoryDto) -> Result<CategoryResponseDto> {
        dto.validate()?;

        let changes = dto.into();
        let category = bounded(
            self.timeout,
            "update category",
            self.store.update_category(id, &changes),
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {}", id)))?;

        tracing::info!("Category updated: id={}", id);
        Ok(category.into())
    }

    /// Fails with `Conflict` while products still belong to the category
    pub async fn delete(&self, id: i64) -> Result<()> {
        let deleted = bounded(self.timeout, "delete category", self.store.delete_category(id))
            .await?;

        if !deleted {
            return Err(AppError::NotFound(format!("Category {}", id)));
        }

        tracing::info!("Category deleted: id={}", id);
        Ok(())
    }
}
