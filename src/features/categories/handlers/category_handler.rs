use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::{AppPath, ResourceJson};
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryListItemDto, CategoryResponseDto, CreateCategoryDto,
    UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;

/// List all categories
///
/// Each entry carries `products_count`, aggregated in the same query.
#[utoipa::path(
    get,
    path = "/api/v1/categories",
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryListItemDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
) -> Result<Json<Vec<CategoryListItemDto>>> {
    let categories = service.list().await?;
    Ok(Json(categories))
}

/// Get a category with its products
#[utoipa::path(
    get,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = CategoryDetailDto),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<CategoryDetailDto>> {
    let category = service.get(id).await?;
    Ok(Json(category))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/api/v1/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = CategoryResponseDto),
        (status = 400, description = "Malformed body"),
        (status = 422, description = "Validation failed")
    ),
    tag = "categories"
)]
pub async fn create_category(
    State(service): State<Arc<CategoryService>>,
    ResourceJson(dto): ResourceJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<CategoryResponseDto>)> {
    let category = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// Update a category
#[utoipa::path(
    patch,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponseDto),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Validation failed")
    ),
    tag = "categories"
)]
pub async fn update_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<i64>,
    ResourceJson(dto): ResourceJson<UpdateCategoryDto>,
) -> Result<Json<CategoryResponseDto>> {
    let category = service.update(id, dto).await?;
    Ok(Json(category))
}

/// Delete a category
#[utoipa::path(
    delete,
    path = "/api/v1/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Category still has products")
    ),
    tag = "categories"
)]
pub async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode> {
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
