//! Service banner and health check.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | API name, version and entry points |
//! | GET | `/health` | Liveness and store reachability |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;


pub use services::SystemService;
