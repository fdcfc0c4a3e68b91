//! Product categories.
//!
//! Category names are unique. A category that still owns products cannot be
//! deleted.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/v1/categories` | List categories with product counts |
//! | POST | `/api/v1/categories` | Create a category |
//! | GET | `/api/v1/categories/{id}` | Get a category with its products |
//! | PATCH/PUT | `/api/v1/categories/{id}` | Rename a category |
//! | DELETE | `/api/v1/categories/{id}` | Delete an empty category |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;


pub use services::CategoryService;
