use std::sync::Arc;

use axum::http::StatusCode;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use serde_json::{json, Value};

use crate::features::products::dtos::ProductResponseDto;
use crate::modules::cache::{product_cache_key, ResponseCache};
use crate::modules::store::MemoryCatalogStore;
use crate::shared::test_helpers::{
    create_category, create_product, short_timeout, test_server, test_server_with,
    test_server_with_config, StalledStore,
};

fn product_body(name: &str) -> Value {
    let description: String = Sentence(3..8).fake();
    json!({
        "name": name,
        "description": description,
        "price": "19.99",
        "stock_quantity": (1..500).fake::<i32>(),
    })
}

#[tokio::test]
async fn test_create_drops_is_admin() {
    let server = test_server();

    let response = server
        .post("/api/v1/products")
        .json(&json!({ "product": { "name": "Gadget", "price": "10.00", "is_admin": true } }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let product: Value = response.json();
    assert_eq!(product["is_admin"], false);
    assert_eq!(product["price"], "10.00");
    assert_eq!(product["stock_quantity"], 0);
    assert_eq!(product["is_featured"], false);

    let id = product["id"].as_i64().unwrap();
    let stored: Value = server.get(&format!("/api/v1/products/{}", id)).await.json();
    assert_eq!(stored["is_admin"], false);
}

#[tokio::test]
async fn test_update_cannot_set_is_admin() {
    let server = test_server();
    let product = create_product(&server, product_body("Gadget")).await;
    let id = product["id"].as_i64().unwrap();

    let response = server
        .patch(&format!("/api/v1/products/{}", id))
        .json(&json!({ "is_admin": true, "stock_quantity": 3 }))
        .await;

    response.assert_status_ok();
    let updated: Value = response.json();
    assert_eq!(updated["is_admin"], false);
    assert_eq!(updated["stock_quantity"], 3);
}

#[tokio::test]
async fn test_create_accepts_bare_body() {
    let server = test_server();

    let response = server
        .post("/api/v1/products")
        .json(&json!({ "name": "Bare", "price": 4.5 }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let product: Value = response.json();
    assert_eq!(product["name"], "Bare");
    assert_eq!(product["price"], "4.50");
}

#[tokio::test]
async fn test_create_validation_errors() {
    let server = test_server();

    let response = server
        .post("/api/v1/products")
        .json(&json!({ "product": { "price": "-5", "stock_quantity": -1, "category_id": 999 } }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let errors: Value = response.json();
    assert_eq!(errors["name"], json!(["can't be blank"]));
    assert_eq!(errors["price"], json!(["must be greater than or equal to 0"]));
    assert_eq!(
        errors["stock_quantity"],
        json!(["must be greater than or equal to 0"])
    );
    assert_eq!(errors["category_id"], json!(["must exist"]));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = test_server();

    let response = server
        .post("/api/v1/products")
        .content_type("application/json")
        .bytes("{\"name\": ".into())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/products")
        .json(&json!({ "name": "Widget", "stock_quantity": "many" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_category_name_is_resolved() {
    let server = test_server();
    let category_name: String = CompanyName().fake();
    let category = create_category(&server, &category_name).await;

    let mut body = product_body("In category");
    body["category_id"] = category["id"].clone();
    let in_category = create_product(&server, body).await;
    let orphan = create_product(&server, product_body("No category")).await;

    assert_eq!(in_category["category_name"], category_name.as_str());
    assert_eq!(orphan["category_id"], Value::Null);
    assert_eq!(orphan["category_name"], Value::Null);

    let page: Value = server.get("/api/v1/products").await.json();
    let products = page["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    for product in products {
        if product["id"] == in_category["id"] {
            assert_eq!(product["category_name"], category_name.as_str());
        } else {
            assert_eq!(product["category_name"], Value::Null);
        }
    }
}

#[tokio::test]
async fn test_list_filters_by_category() {
    let server = test_server();
    let books = create_category(&server, "Books").await;
    create_category(&server, "Garden").await;

    for i in 0..3 {
        let mut body = product_body(&format!("Book {}", i));
        body["category_id"] = books["id"].clone();
        create_product(&server, body).await;
    }
    create_product(&server, product_body("Loose")).await;

    let page: Value = server
        .get("/api/v1/products")
        .add_query_param("category_id", books["id"].as_i64().unwrap())
        .await
        .json();

    assert_eq!(page["pagination"]["total_count"], 3);
    assert!(page["products"]
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["category_name"] == "Books"));
}

#[tokio::test]
async fn test_pagination_defaults_and_clamping() {
    let server = test_server();
    for i in 0..12 {
        create_product(&server, product_body(&format!("Item {}", i))).await;
    }

    let page: Value = server.get("/api/v1/products").await.json();
    assert_eq!(page["products"].as_array().unwrap().len(), 10);
    assert_eq!(
        page["pagination"],
        json!({
            "current_page": 1,
            "per_page": 10,
            "total_pages": 2,
            "total_count": 12,
            "has_next_page": true,
            "has_prev_page": false,
        })
    );

    let page: Value = server
        .get("/api/v1/products")
        .add_query_param("page", 2)
        .await
        .json();
    assert_eq!(page["products"].as_array().unwrap().len(), 2);
    assert_eq!(page["pagination"]["has_prev_page"], true);

    let page: Value = server
        .get("/api/v1/products")
        .add_query_param("per_page", 1000)
        .await
        .json();
    assert_eq!(page["pagination"]["per_page"], 100);
    assert_eq!(page["products"].as_array().unwrap().len(), 12);

    let page: Value = server
        .get("/api/v1/products")
        .add_query_param("per_page", 0)
        .await
        .json();
    assert_eq!(page["pagination"]["per_page"], 1);
    assert_eq!(page["products"].as_array().unwrap().len(), 1);

    let page: Value = server
        .get("/api/v1/products")
        .add_query_param("page", 9)
        .await
        .json();
    assert!(page["products"].as_array().unwrap().is_empty());
    assert_eq!(page["pagination"]["total_count"], 12);
}

#[tokio::test]
async fn test_invalid_query_is_bad_request() {
    let server = test_server();

    server
        .get("/api/v1/products")
        .add_query_param("page", "two")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_show_missing_and_non_numeric_ids() {
    let server = test_server();

    let response = server.get("/api/v1/products/999").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "not found" }));

    let response = server.get("/api/v1/products/abc").await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "not found" }));
}

#[tokio::test]
async fn test_show_is_cached_and_byte_identical() {
    let cache = Arc::new(ResponseCache::new());
    let server = test_server_with(Arc::new(MemoryCatalogStore::new()), Arc::clone(&cache));
    let product = create_product(&server, product_body("Cached")).await;
    let id = product["id"].as_i64().unwrap();
    let path = format!("/api/v1/products/{}", id);

    let first = server.get(&path).await;
    first.assert_status_ok();
    first.assert_header("content-type", "application/json");
    assert!(cache.get(&product_cache_key(id)).await.is_some());

    let second = server.get(&path).await;
    assert_eq!(first.as_bytes(), second.as_bytes());

    let dto: ProductResponseDto = second.json();
    assert_eq!(dto.name, "Cached");
}

#[tokio::test]
async fn test_update_invalidates_cache() {
    let cache = Arc::new(ResponseCache::new());
    let server = test_server_with(Arc::new(MemoryCatalogStore::new()), Arc::clone(&cache));
    let product = create_product(&server, product_body("Before")).await;
    let id = product["id"].as_i64().unwrap();
    let path = format!("/api/v1/products/{}", id);

    server.get(&path).await.assert_status_ok();

    server
        .patch(&path)
        .json(&json!({ "product": { "name": "After", "price": "1.25" } }))
        .await
        .assert_status_ok();
    assert!(cache.get(&product_cache_key(id)).await.is_none());

    let fresh: Value = server.get(&path).await.json();
    assert_eq!(fresh["name"], "After");
    assert_eq!(fresh["price"], "1.25");
}

#[tokio::test]
async fn test_update_null_handling() {
    let server = test_server();
    let category = create_category(&server, "Tools").await;
    let mut body = product_body("Hammer");
    body["category_id"] = category["id"].clone();
    let product = create_product(&server, body).await;
    let path = format!("/api/v1/products/{}", product["id"]);

    let updated: Value = server
        .patch(&path)
        .json(&json!({ "name": null, "description": null, "category_id": null }))
        .await
        .json();

    assert_eq!(updated["name"], "Hammer");
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["category_id"], Value::Null);
    assert_eq!(updated["category_name"], Value::Null);
    assert_eq!(updated["price"], product["price"]);
}

#[tokio::test]
async fn test_update_rejects_unknown_category_and_blank_name() {
    let server = test_server();
    let product = create_product(&server, product_body("Lamp")).await;
    let path = format!("/api/v1/products/{}", product["id"]);

    let response = server
        .put(&path)
        .json(&json!({ "name": " ", "category_id": 4242 }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    response.assert_json(&json!({
        "category_id": ["must exist"],
        "name": ["can't be blank"],
    }));
}

#[tokio::test]
async fn test_update_missing_product() {
    let server = test_server();

    server
        .patch("/api/v1/products/77")
        .json(&json!({ "name": "Ghost" }))
        .await
        .assert_status_not_found();

    let response = server
        .patch("/api/v1/products/999")
        .json(&json!({ "category_id": 12345, "name": "" }))
        .await;
    response.assert_status_not_found();
    response.assert_json(&json!({ "error": "not found" }));
}

#[tokio::test]
async fn test_feature_is_idempotent() {
    let cache = Arc::new(ResponseCache::new());
    let server = test_server_with(Arc::new(MemoryCatalogStore::new()), Arc::clone(&cache));
    let product = create_product(&server, product_body("Star")).await;
    let id = product["id"].as_i64().unwrap();
    let path = format!("/api/v1/products/{}", id);

    let before: Value = server.get(&path).await.json();
    assert_eq!(before["is_featured"], false);

    let first: Value = server
        .patch(&format!("{}/feature", path))
        .await
        .json();
    assert_eq!(first["is_featured"], true);
    assert!(cache.get(&product_cache_key(id)).await.is_none());

    let second: Value = server
        .patch(&format!("{}/feature", path))
        .await
        .json();
    assert_eq!(second["is_featured"], true);
    assert_eq!(second["name"], first["name"]);
    assert_eq!(second["price"], first["price"]);
    assert_eq!(second["stock_quantity"], first["stock_quantity"]);

    let after: Value = server.get(&path).await.json();
    assert_eq!(after["is_featured"], true);

    server
        .patch("/api/v1/products/999/feature")
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_product() {
    let cache = Arc::new(ResponseCache::new());
    let server = test_server_with(Arc::new(MemoryCatalogStore::new()), Arc::clone(&cache));
    let product = create_product(&server, product_body("Doomed")).await;
    let id = product["id"].as_i64().unwrap();
    let path = format!("/api/v1/products/{}", id);

    server.get(&path).await.assert_status_ok();

    server
        .delete(&path)
        .await
        .assert_status(StatusCode::NO_CONTENT);
    assert!(cache.get(&product_cache_key(id)).await.is_none());

    server.get(&path).await.assert_status_not_found();
    server.delete(&path).await.assert_status_not_found();
}

#[tokio::test]
async fn test_stalled_store_is_service_unavailable() {
    let cache = Arc::new(ResponseCache::new());
    let server = test_server_with_config(Arc::new(StalledStore), Arc::clone(&cache), &short_timeout());

    let response = server.get("/api/v1/products").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response.assert_json(&json!({ "error": "service unavailable" }));

    let response = server.get("/api/v1/products/1").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    response.assert_json(&json!({ "error": "service unavailable" }));
    assert_eq!(cache.len().await, 0);

    server
        .post("/api/v1/products")
        .json(&product_body("Widget"))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
