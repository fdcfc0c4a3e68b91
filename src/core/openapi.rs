use utoipa::{Modify, OpenApi};

use crate::features::categories::{dtos as categories_dtos, handlers as categories_handlers};
use crate::features::products::{dtos as products_dtos, handlers as products_handlers};
use crate::features::system::{dtos as system_dtos, handlers as system_handlers};
use crate::shared::types::PaginationMeta;

#[derive(OpenApi)]
#[openapi(
    paths(
        // System
        system_handlers::api_info,
        system_handlers::health_check,
        // Categories
        categories_handlers::list_categories,
        categories_handlers::get_category,
        categories_handlers::create_category,
        categories_handlers::update_category,
        categories_handlers::delete_category,
        // Products
        products_handlers::list_products,
        products_handlers::get_product,
        products_handlers::create_product,
        products_handlers::update_product,
        products_handlers::delete_product,
        products_handlers::feature_product,
    ),
    components(
        schemas(
            // Shared
            PaginationMeta,
            // System
            system_dtos::HealthStatus,
            system_dtos::HealthResponseDto,
            system_dtos::EndpointsDto,
            system_dtos::ApiInfoDto,
            // Categories
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryListItemDto,
            categories_dtos::CategoryProductDto,
            categories_dtos::CategoryDetailDto,
            // Products
            products_dtos::CreateProductDto,
            products_dtos::UpdateProductDto,
            products_dtos::ProductResponseDto,
            products_dtos::ProductListResponseDto,
        )
    ),
    tags(
        (name = "system", description = "Service banner and health"),
        (name = "categories", description = "Product categories"),
        (name = "products", description = "Product catalog"),
    ),
    info(
        title = "Product Catalog API",
        version = "0.1.0",
        description = "REST API for products and categories",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();

        for expected in [
            "/",
            "/health",
            "/api/v1/categories",
            "/api/v1/categories/{id}",
            "/api/v1/products",
            "/api/v1/products/{id}",
            "/api/v1/products/{id}/feature",
        ] {
            assert!(paths.contains(&expected), "missing path {}", expected);
        }
    }

    #[test]
    fn test_info_modifier_overrides() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Catalog".to_string(),
            version: "9.9.9".to_string(),
            description: "staging".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Catalog");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("staging"));
    }
}
