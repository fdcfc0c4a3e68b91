use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::core::error::Result;
use crate::features::categories::models::NewCategory;
use crate::features::products::models::NewProduct;
use crate::modules::store::CatalogStore;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    stock_quantity: i32,
    category: Option<&'static str>,
    published_days_ago: i64,
    is_featured: bool,
}

const CATEGORIES: [&str; 3] = ["Electronics", "Books", "Clothing"];

const PRODUCTS: [SeedProduct; 7] = [
    SeedProduct {
        name: "Laptop Pro X",
        description: "Powerful laptop for professionals.",
        price_cents: 120_000,
        stock_quantity: 50,
        category: Some("Electronics"),
        published_days_ago: 0,
        is_featured: false,
    },
    SeedProduct {
        name: "The Great Novel",
        description: "A captivating story.",
        price_cents: 1_599,
        stock_quantity: 200,
        category: Some("Books"),
        published_days_ago: 0,
        is_featured: false,
    },
    SeedProduct {
        name: "Wireless Headphones",
        description: "High-fidelity sound.",
        price_cents: 7_999,
        stock_quantity: 150,
        category: Some("Electronics"),
        published_days_ago: 1,
        is_featured: false,
    },
    SeedProduct {
        name: "Vintage T-Shirt",
        description: "Comfortable cotton tee.",
        price_cents: 2_500,
        stock_quantity: 100,
        category: Some("Clothing"),
        published_days_ago: 0,
        is_featured: true,
    },
    SeedProduct {
        name: "Product With Missing Category",
        description: "This product has no assigned category.",
        price_cents: 1_000,
        stock_quantity: 10,
        category: None,
        published_days_ago: 0,
        is_featured: false,
    },
    SeedProduct {
        name: "Another Book",
        description: "Another great read.",
        price_cents: 1_250,
        stock_quantity: 75,
        category: Some("Books"),
        published_days_ago: 2,
        is_featured: false,
    },
    SeedProduct {
        name: "Secret Admin Product",
        description: "Only admins should manage this.",
        price_cents: 99_900,
        stock_quantity: 1,
        category: Some("Electronics"),
        published_days_ago: 0,
        is_featured: false,
    },
];

/// Load the demo catalog into an empty store.
///
/// Returns `false` without writing anything when categories already exist.
pub async fn seed_demo_catalog(store: &dyn CatalogStore) -> Result<bool> {
    if !store.list_categories().await?.is_empty() {
        return Ok(false);
    }

    let mut category_ids = Vec::with_capacity(CATEGORIES.len());
    for name in CATEGORIES {
        let category = store
            .insert_category(&NewCategory {
                name: name.to_string(),
            })
            .await?;
        category_ids.push((name, category.id));
    }

    let now = Utc::now();
    for seed in &PRODUCTS {
        let category_id = seed.category.and_then(|wanted| {
            category_ids
                .iter()
                .find(|(name, _)| *name == wanted)
                .map(|(_, id)| *id)
        });

        store
            .insert_product(&NewProduct {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                price: Decimal::new(seed.price_cents, 2),
                stock_quantity: seed.stock_quantity,
                category_id,
                published_at: Some(now - Duration::days(seed.published_days_ago)),
                is_featured: seed.is_featured,
            })
            .await?;
    }

    tracing::info!(
        "Seeded demo catalog: {} categories, {} products",
        CATEGORIES.len(),
        PRODUCTS.len()
    );
    Ok(true)
}
