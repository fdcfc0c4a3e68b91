use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Product row joined with the name of its category.
///
/// `category_name` is `None` when `category_id` is null or points at a
/// category that no longer exists.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
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

/// Validated attributes for a new product.
///
/// There is no `is_admin` here: it can only ever hold the column default.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub category_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_featured: bool,
}

/// Validated partial update.
///
/// Outer `None` leaves a column unchanged; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price: Option<Decimal>,
    pub stock_quantity: Option<i32>,
    pub category_id: Option<Option<i64>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
    pub is_featured: Option<bool>,
}

impl ProductChanges {
    /// Category the product will point at after this update, if it is being set
    pub fn target_category(&self) -> Option<i64> {
        self.category_id.flatten()
    }
}

/// List filter plus window
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFilter {
    pub category_id: Option<i64>,
    pub offset: i64,
    pub limit: i64,
}
