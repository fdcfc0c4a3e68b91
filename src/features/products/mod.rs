//! Product catalog.
//!
//! Writes bind an explicit allow-list of fields, so `is_admin` can never be
//! set through the API. Show responses are cached per product.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/products` | Paginated list, optional `category_id` filter |
//! | POST | `/api/v1/products` | Create a product |
//! | GET | `/api/v1/products/{id}` | Get a product (cached) |
//! | PATCH/PUT | `/api/v1/products/{id}` | Update a product |
//! | DELETE | `/api/v1/products/{id}` | Delete a product |
//! | PATCH | `/api/v1/products/{id}/feature` | Mark a product as featured |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
mod tests;

pub use services::ProductService;
