use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryProduct, CategorySummary, NewCategory,
};
use crate::features::products::models::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::modules::store::{
    CatalogStore, DEPENDENT_PRODUCTS_MESSAGE, DUPLICATE_NAME_MESSAGE, MISSING_CATEGORY_MESSAGE,
};

/// Product rows are kept with `category_name` unset; it is resolved on read
#[derive(Debug, Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    products: BTreeMap<i64, Product>,
    last_category_id: i64,
    last_product_id: i64,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<i64>) -> bool {
        self.categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except)
    }

    fn ensure_category(&self, category_id: Option<i64>) -> Result<()> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => {
                Err(AppError::field("category_id", MISSING_CATEGORY_MESSAGE))
            }
            _ => Ok(()),
        }
    }

    /// Attach category names to a batch of rows with a single lookup pass
    fn with_category_names<'a>(&self, rows: impl Iterator<Item = &'a Product>) -> Vec<Product> {
        let rows: Vec<&Product> = rows.collect();
        let wanted: BTreeSet<i64> = rows.iter().filter_map(|row| row.category_id).collect();
        let names: HashMap<i64, &str> = wanted
            .iter()
            .filter_map(|id| self.categories.get(id).map(|c| (*id, c.name.as_str())))
            .collect();

        rows.into_iter()
            .map(|row| {
                let mut product = row.clone();
                product.category_name = product
                    .category_id
                    .and_then(|id| names.get(&id).map(|name| name.to_string()));
                product
            })
            .collect()
    }

    fn resolved(&self, id: i64) -> Option<Product> {
        self.products
            .get(&id)
            .and_then(|row| self.with_category_names(std::iter::once(row)).pop())
    }
}

/// NUMERIC(10, 2) keeps two decimal places
fn to_column_scale(price: Decimal) -> Decimal {
    let mut price = price;
    price.rescale(2);
    price
}

/// In-process catalog store with the same constraints as the Postgres schema
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn ping(&self) -> bool {
        true
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        let tables = self.tables.read().await;

        let mut counts: HashMap<i64, i64> = HashMap::new();
        for row in tables.products.values() {
            if let Some(category_id) = row.category_id {
                *counts.entry(category_id).or_default() += 1;
            }
        }

        Ok(tables
            .categories
            .values()
            .map(|c| CategorySummary {
                id: c.id,
                name: c.name.clone(),
                products_count: counts.get(&c.id).copied().unwrap_or(0),
                created_at: c.created_at,
                updated_at: c.updated_at,
            })
            .collect())
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn list_category_products(&self, category_id: i64) -> Result<Vec<CategoryProduct>> {
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .values()
            .filter(|row| row.category_id == Some(category_id))
            .map(|row| CategoryProduct {
                id: row.id,
                name: row.name.clone(),
                price: row.price,
                stock_quantity: row.stock_quantity,
            })
            .collect())
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category> {
        let mut tables = self.tables.write().await;
        if tables.name_taken(&category.name, None) {
            return Err(AppError::field("name", DUPLICATE_NAME_MESSAGE));
        }

        tables.last_category_id += 1;
        let now = Utc::now();
        let row = Category {
            id: tables.last_category_id,
            name: category.name.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Ok(None);
        }
        if let Some(name) = &changes.name {
            if tables.name_taken(name, Some(id)) {
                return Err(AppError::field("name", DUPLICATE_NAME_MESSAGE));
            }
        }

        let Some(row) = tables.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            row.name = name.clone();
        }
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&id) {
            return Ok(false);
        }
        if tables
            .products
            .values()
            .any(|row| row.category_id == Some(id))
        {
            return Err(AppError::Conflict(DEPENDENT_PRODUCTS_MESSAGE.to_string()));
        }

        Ok(tables.categories.remove(&id).is_some())
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<(Vec<Product>, i64)> {
        let tables = self.tables.read().await;
        let matching: Vec<&Product> = tables
            .products
            .values()
            .filter(|p| filter.category_id.is_none() || p.category_id == filter.category_id)
            .collect();

        let total = matching.len() as i64;
        let offset = usize::try_from(filter.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(filter.limit).unwrap_or(0);
        let page = tables.with_category_names(matching.into_iter().skip(offset).take(limit));

        Ok((page, total))
    }

    async fn find_product(&self, id: i64) -> Result<Option<Product>> {
        Ok(self.tables.read().await.resolved(id))
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<Product> {
        let mut tables = self.tables.write().await;
        tables.ensure_category(product.category_id)?;

        tables.last_product_id += 1;
        let now = Utc::now();
        let id = tables.last_product_id;
        tables.products.insert(
            id,
            Product {
                id,
                name: product.name.clone(),
                description: product.description.clone(),
                price: to_column_scale(product.price),
                stock_quantity: product.stock_quantity,
                category_id: product.category_id,
                category_name: None,
                published_at: product.published_at,
                is_featured: product.is_featured,
                is_admin: false,
                created_at: now,
                updated_at: now,
            },
        );

        tables
            .resolved(id)
            .ok_or_else(|| AppError::Internal(format!("Product {} vanished after insert", id)))
    }

    async fn update_product(&self, id: i64, changes: &ProductChanges) -> Result<Option<Product>> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        tables.ensure_category(changes.target_category())?;

        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &changes.name {
            product.name = name.clone();
        }
        if let Some(description) = &changes.description {
            product.description = description.clone();
        }
        if let Some(price) = changes.price {
            product.price = to_column_scale(price);
        }
        if let Some(stock_quantity) = changes.stock_quantity {
            product.stock_quantity = stock_quantity;
        }
        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        if let Some(published_at) = changes.published_at {
            product.published_at = published_at;
        }
        if let Some(is_featured) = changes.is_featured {
            product.is_featured = is_featured;
        }
        product.updated_at = Utc::now();

        Ok(tables.resolved(id))
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }

    async fn feature_product(&self, id: i64) -> Result<Option<Product>> {
        let mut tables = self.tables.write().await;
        let Some(product) = tables.products.get_mut(&id) else {
            return Ok(None);
        };
        product.is_featured = true;
        product.updated_at = Utc::now();

        Ok(tables.resolved(id))
    }
}
