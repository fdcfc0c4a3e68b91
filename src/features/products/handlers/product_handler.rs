use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppPath, AppQuery, ResourceJson};
use crate::features::products::dtos::{
    CreateProductDto, ProductListQuery, ProductListResponseDto, ProductResponseDto,
    UpdateProductDto,
};
use crate::features::products::services::ProductService;

/// List products
///
/// Paginated; `per_page` is clamped to 1..=100.
#[utoipa::path(
    get,
    path = "/api/v1/products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "Page of products", body = ProductListResponseDto),
        (status = 400, description = "Invalid query parameter")
    ),
    tag = "products"
)]
pub async fn list_products(
    State(service): State<Arc<ProductService>>,
    AppQuery(query): AppQuery<ProductListQuery>,
) -> Result<Json<ProductListResponseDto>> {
    let page = service.list(&query).await?;
    Ok(Json(page))
}

/// Get a product
#[utoipa::path(
    get,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductResponseDto),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn get_product(
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    let body = service.get_cached(id).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body))
}

/// Create a product
///
/// Only the documented fields are read from the body.
#[utoipa::path(
    post,
    path = "/api/v1/products",
    request_body = CreateProductDto,
    responses(
        (status = 201, description = "Product created", body = ProductResponseDto),
        (status = 400, description = "Malformed body"),
        (status = 422, description = "Validation failed")
    ),
    tag = "products"
)]
pub async fn create_product(
    State(service): State<Arc<ProductService>>,
    ResourceJson(dto): ResourceJson<CreateProductDto>,
) -> Result<(StatusCode, Json<ProductResponseDto>)> {
    let product = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Update a product
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProductDto,
    responses(
        (status = 200, description = "Product updated", body = ProductResponseDto),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "products"
)]
pub async fn update_product(
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<i64>,
    ResourceJson(dto): ResourceJson<UpdateProductDto>,
) -> Result<Json<ProductResponseDto>> {
    let product = service.update(id, dto).await?;
    Ok(Json(product))
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/api/v1/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn delete_product(
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a product as featured
#[utoipa::path(
    patch,
    path = "/api/v1/products/{id}/feature",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product featured", body = ProductResponseDto),
        (status = 404, description = "Product not found")
    ),
    tag = "products"
)]
pub async fn feature_product(
    State(service): State<Arc<ProductService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<ProductResponseDto>> {
    let product = service.feature(id).await?;
    Ok(Json(product))
}
