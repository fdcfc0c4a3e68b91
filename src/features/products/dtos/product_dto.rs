use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::core::extractor::ResourceParams;
use crate::features::products::models::{NewProduct, Product, ProductChanges};
use crate::shared::types::{double_option, PaginationMeta, PaginationQuery};
use crate::shared::validation::{validate_not_blank, validate_price};

/// Writable product attributes on create.
///
/// These fields are the whole allow-list. `is_admin` and any other key in
/// the body are dropped while deserializing.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateProductDto {
    #[validate(
        required(message = "can't be blank"),
        custom(function = "validate_not_blank")
    )]
    pub name: Option<String>,

    pub description: Option<String>,

    /// Decimal as a JSON string or number; defaults to 0
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "15.99")]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub stock_quantity: Option<i32>,

    pub category_id: Option<i64>,

    pub published_at: Option<DateTime<Utc>>,

    pub is_featured: Option<bool>,
}

impl ResourceParams for CreateProductDto {
    const ROOT_KEY: &'static str = "product";
}

impl CreateProductDto {
    /// Apply column defaults; call after `validate()`
    pub fn into_new_product(self) -> NewProduct {
        NewProduct {
            name: self.name.unwrap_or_default(),
            description: self.description,
            price: self.price.unwrap_or(Decimal::ZERO),
            stock_quantity: self.stock_quantity.unwrap_or(0),
            category_id: self.category_id,
            published_at: self.published_at,
            is_featured: self.is_featured.unwrap_or(false),
        }
    }
}

/// Writable product attributes on update.
///
/// Absent fields are left unchanged. `null` clears `description`,
/// `category_id` and `published_at`; on the other fields it is ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProductDto {
    #[validate(custom(function = "validate_not_blank"))]
    pub name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,

    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<String>, example = "15.99")]
    pub price: Option<Decimal>,

    #[validate(range(min = 0, message = "must be greater than or equal to 0"))]
    pub stock_quantity: Option<i32>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<i64>)]
    pub category_id: Option<Option<i64>>,

    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub published_at: Option<Option<DateTime<Utc>>>,

    pub is_featured: Option<bool>,
}

impl ResourceParams for UpdateProductDto {
    const ROOT_KEY: &'static str = "product";
}

impl From<UpdateProductDto> for ProductChanges {
    fn from(dto: UpdateProductDto) -> Self {
        Self {
            name: dto.name,
            description: dto.description,
            price: dto.price,
            stock_quantity: dto.stock_quantity,
            category_id: dto.category_id,
            published_at: dto.published_at,
            is_featured: dto.is_featured,
        }
    }
}

/// Response DTO for product
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponseDto {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "15.99")]
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_featured: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponseDto {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            stock_quantity: p.stock_quantity,
            category_id: p.category_id,
            category_name: p.category_name,
            published_at: p.published_at,
            is_featured: p.is_featured,
            is_admin: p.is_admin,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// One page of products
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponseDto {
    pub products: Vec<ProductResponseDto>,
    pub pagination: PaginationMeta,
}

/// Query params for listing products
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Only products in this category
    pub category_id: Option<i64>,

    /// Page number (1-indexed, default: 1)
    #[param(minimum = 1)]
    pub page: Option<i64>,

    /// Items per page (default: 10, clamped to 1..=100)
    #[param(minimum = 1, maximum = 100)]
    pub per_page: Option<i64>,
}

impl ProductListQuery {
    pub fn pagination(&self) -> PaginationQuery {
        PaginationQuery::new(self.page, self.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::field_errors;

    #[test]
    fn test_is_admin_is_not_bindable() {
        let dto: CreateProductDto = serde_json::from_str(
            r#"{"name": "Widget", "price": "9.50", "is_admin": true, "id": 7}"#,
        )
        .unwrap();
        let product = dto.into_new_product();
        assert_eq!(product.name, "Widget");
        assert_eq!(product.price, Decimal::new(950, 2));
    }

    #[test]
    fn test_create_defaults() {
        let dto: CreateProductDto = serde_json::from_str(r#"{"name": "Widget"}"#).unwrap();
        assert!(dto.validate().is_ok());

        let product = dto.into_new_product();
        assert_eq!(product.price, Decimal::ZERO);
        assert_eq!(product.stock_quantity, 0);
        assert!(!product.is_featured);
        assert_eq!(product.category_id, None);
    }

    #[test]
    fn test_price_accepts_number_or_string() {
        let from_number: CreateProductDto =
            serde_json::from_str(r#"{"name": "A", "price": 15.99}"#).unwrap();
        let from_string: CreateProductDto =
            serde_json::from_str(r#"{"name": "A", "price": "15.99"}"#).unwrap();
        assert_eq!(from_number.price, Some(Decimal::new(1599, 2)));
        assert_eq!(from_number.price, from_string.price);
    }

    #[test]
    fn test_create_collects_every_field_error() {
        let dto: CreateProductDto =
            serde_json::from_str(r#"{"price": "-1", "stock_quantity": -3}"#).unwrap();
        let errors = field_errors(&dto.validate().unwrap_err());

        assert_eq!(errors["name"], vec!["can't be blank".to_string()]);
        assert_eq!(
            errors["price"],
            vec!["must be greater than or equal to 0".to_string()]
        );
        assert_eq!(
            errors["stock_quantity"],
            vec!["must be greater than or equal to 0".to_string()]
        );
    }

    #[test]
    fn test_update_distinguishes_null_from_absent() {
        let dto: UpdateProductDto =
            serde_json::from_str(r#"{"description": null, "name": null, "price": null}"#)
                .unwrap();
        assert!(dto.validate().is_ok());

        let changes = ProductChanges::from(dto);
        assert_eq!(changes.description, Some(None));
        assert_eq!(changes.category_id, None);
        assert_eq!(changes.published_at, None);
        assert_eq!(changes.name, None);
        assert_eq!(changes.price, None);
    }

    #[test]
    fn test_update_sets_category() {
        let dto: UpdateProductDto = serde_json::from_str(r#"{"category_id": 4}"#).unwrap();
        let changes = ProductChanges::from(dto);
        assert_eq!(changes.category_id, Some(Some(4)));
        assert_eq!(changes.target_category(), Some(4));
    }

    #[test]
    fn test_list_query_pagination() {
        let query = ProductListQuery {
            category_id: None,
            page: Some(3),
            per_page: Some(500),
        };
        let pagination = query.pagination();
        assert_eq!(pagination.per_page(), 100);
        assert_eq!(pagination.offset(), 200);
    }
}
