use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::categories::models::{
    Category, CategoryChanges, CategoryProduct, CategorySummary, NewCategory,
};
use crate::features::products::models::{NewProduct, Product, ProductChanges, ProductFilter};
use crate::modules::store::{
    CatalogStore, DEPENDENT_PRODUCTS_MESSAGE, DUPLICATE_NAME_MESSAGE, MISSING_CATEGORY_MESSAGE,
};
use crate::shared::validation::NEGATIVE_MESSAGE;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";
const CHECK_VIOLATION: &str = "23514";
const NUMERIC_OUT_OF_RANGE: &str = "22003";

/// Select list for a product joined with its category (`p` / `c` aliases)
const PRODUCT_COLUMNS: &str = r#"
    p.id, p.name, p.description, p.price, p.stock_quantity, p.category_id,
    c.name AS category_name, p.published_at, p.is_featured, p.is_admin,
    p.created_at, p.updated_at
"#;

/// Convert database error to a more specific AppError with client-facing messages
fn handle_db_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => return AppError::field("name", DUPLICATE_NAME_MESSAGE),
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::field("category_id", MISSING_CATEGORY_MESSAGE)
            }
            Some(CHECK_VIOLATION) => {
                let field = match db_err.constraint() {
                    Some(c) if c.contains("stock_quantity") => "stock_quantity",
                    _ => "price",
                };
                return AppError::field(field, NEGATIVE_MESSAGE);
            }
            Some(NUMERIC_OUT_OF_RANGE) => {
                return AppError::field("price", "must be less than or equal to 99999999.99")
            }
            _ => {}
        }
    }

    match e {
        sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => AppError::StoreUnavailable(e.to_string()),
        other => AppError::Database(other),
    }
}

fn log_and_map(context: &'static str) -> impl Fn(sqlx::Error) -> AppError {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        handle_db_error(e)
    }
}

/// Postgres-backed catalog store
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl std::fmt::Debug for PgCatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgCatalogStore")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

impl PgCatalogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn ping(&self) -> bool {
        match sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Database ping failed: {}", e);
                false
            }
        }
    }

    async fn list_categories(&self) -> Result<Vec<CategorySummary>> {
        sqlx::query_as::<_, CategorySummary>(
            r#"
            SELECT c.id, c.name, COUNT(p.id) AS products_count, c.created_at, c.updated_at
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(log_and_map("list categories"))
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(log_and_map("get category"))
    }

    async fn list_category_products(&self, category_id: i64) -> Result<Vec<CategoryProduct>> {
        sqlx::query_as::<_, CategoryProduct>(
            r#"
            SELECT id, name, price, stock_quantity
            FROM products
            WHERE category_id = $1
            ORDER BY id
            "#,
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(log_and_map("list category products"))
    }

    async fn insert_category(&self, category: &NewCategory) -> Result<Category> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(&category.name)
        .fetch_one(&self.pool)
        .await
        .map_err(log_and_map("create category"))
    }

    async fn update_category(
        &self,
        id: i64,
        changes: &CategoryChanges,
    ) -> Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = COALESCE($2, name), updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(log_and_map("update category"))
    }

    async fn delete_category(&self, id: i64) -> Result<bool> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(log_and_map("begin category delete"))?;

        let dependents = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE category_id = $1",
        )
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(log_and_map("count category products"))?;

        if dependents > 0 {
            return Err(AppError::Conflict(DEPENDENT_PRODUCTS_MESSAGE.to_string()));
        }

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // a product was attached between the count and the delete
                let restricted = matches!(
                    &e,
                    sqlx::Error::Database(db_err)
                        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION)
                );
                if restricted {
                    AppError::Conflict(DEPENDENT_PRODUCTS_MESSAGE.to_string())
                } else {
                    log_and_map("delete category")(e)
                }
            })?;

        tx.commit()
            .await
            .map_err(log_and_map("commit category delete"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_products(&self, filter: &ProductFilter) -> Result<(Vec<Product>, i64)> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE ($1::BIGINT IS NULL OR category_id = $1)",
        )
        .bind(filter.category_id)
        .fetch_one(&self.pool)
        .await
        .map_err(log_and_map("count products"))?;

        let query = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE ($1::BIGINT IS NULL OR p.category_id = $1)
            ORDER BY p.id
            OFFSET $2 LIMIT $3
            "#
        );
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(filter.category_id)
            .bind(filter.offset)
            .bind(filter.limit)
            .fetch_all(&self.pool)
            .await
            .map_err(log_and_map("list products"))?;

        Ok((products, total))
    }

    async fn find_product(&self, id: i64) -> Result<Option<Product>> {
        let query = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.id = $1
            "#
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_and_map("get product"))
    }

    async fn insert_product(&self, product: &NewProduct) -> Result<Product> {
        let query = format!(
            r#"
            WITH p AS (
                INSERT INTO products
                    (name, description, price, stock_quantity, category_id, published_at, is_featured)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS}
            FROM p
            LEFT JOIN categories c ON c.id = p.category_id
            "#
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&product.name)
            .bind(product.description.as_deref())
            .bind(product.price)
            .bind(product.stock_quantity)
            .bind(product.category_id)
            .bind(product.published_at)
            .bind(product.is_featured)
            .fetch_one(&self.pool)
            .await
            .map_err(log_and_map("create product"))
    }

    async fn update_product(&self, id: i64, changes: &ProductChanges) -> Result<Option<Product>> {
        let query = format!(
            r#"
            WITH p AS (
                UPDATE products SET
                    name = COALESCE($2, name),
                    description = CASE WHEN $3 THEN $4 ELSE description END,
                    price = COALESCE($5, price),
                    stock_quantity = COALESCE($6, stock_quantity),
                    category_id = CASE WHEN $7 THEN $8 ELSE category_id END,
                    published_at = CASE WHEN $9 THEN $10 ELSE published_at END,
                    is_featured = COALESCE($11, is_featured),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS}
            FROM p
            LEFT JOIN categories c ON c.id = p.category_id
            "#
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(changes.name.as_deref())
            .bind(changes.description.is_some())
            .bind(changes.description.clone().flatten())
            .bind(changes.price)
            .bind(changes.stock_quantity)
            .bind(changes.category_id.is_some())
            .bind(changes.category_id.flatten())
            .bind(changes.published_at.is_some())
            .bind(changes.published_at.flatten())
            .bind(changes.is_featured)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_and_map("update product"))
    }

    async fn delete_product(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(log_and_map("delete product"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn feature_product(&self, id: i64) -> Result<Option<Product>> {
        let query = format!(
            r#"
            WITH p AS (
                UPDATE products SET is_featured = TRUE, updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            SELECT {PRODUCT_COLUMNS}
            FROM p
            LEFT JOIN categories c ON c.id = p.category_id
            "#
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(log_and_map("feature product"))
    }
}
