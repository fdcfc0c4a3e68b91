use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// Database model for category
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row with its aggregated product count
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CategorySummary {
    pub id: i64,
    pub name: String,
    pub products_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Product columns nested under a category
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct CategoryProduct {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: i32,
}

/// Validated attributes for a new category
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
}

/// Validated partial update; `None` leaves the column unchanged
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
}
