use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::extractor::ResourceParams;
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryProduct, CategorySummary, NewCategory,
};
use crate::shared::validation::validate_not_blank;

/// Writable category attributes on create.
///
/// `name` is the only accepted field; anything else in the body is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(
        required(message = "can't be blank"),
        custom(function = "validate_not_blank"),
        length(max = 255, message = "is too long (maximum is 255 characters)")
    )]
    pub name: Option<String>,
}

impl ResourceParams for CreateCategoryDto {
    const ROOT_KEY: &'static str = "category";
}

impl CreateCategoryDto {
    /// Call after `validate()`
    pub fn into_new_category(self) -> NewCategory {
        NewCategory {
            name: self.name.unwrap_or_default(),
        }
    }
}

/// Writable category attributes on update; omitted fields are left as they are
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(
        custom(function = "validate_not_blank"),
        length(max = 255, message = "is too long (maximum is 255 characters)")
    )]
    pub name: Option<String>,
}

impl ResourceParams for UpdateCategoryDto {
    const ROOT_KEY: &'static str = "category";
}

impl From<UpdateCategoryDto> for CategoryChanges {
    fn from(dto: UpdateCategoryDto) -> Self {
        Self { name: dto.name }
    }
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// List entry with the number of products in the category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryListItemDto {
    pub id: i64,
    pub name: String,
    pub products_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategorySummary> for CategoryListItemDto {
    fn from(c: CategorySummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            products_count: c.products_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Product as nested under a category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryProductDto {
    pub id: i64,
    pub name: String,
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
    pub stock_quantity: i32,
}

impl From<CategoryProduct> for CategoryProductDto {
    fn from(p: CategoryProduct) -> Self {
        Self {
            id: p.id,
            name: p.name,
            price: p.price,
            stock_quantity: p.stock_quantity,
        }
    }
}

/// Category with its products
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryDetailDto {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub products: Vec<CategoryProductDto>,
}

impl CategoryDetailDto {
    pub fn new(category: Category, products: Vec<CategoryProduct>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            created_at: category.created_at,
            updated_at: category.updated_at,
            products: products.into_iter().map(Into::into).collect(),
        }
    }
}
