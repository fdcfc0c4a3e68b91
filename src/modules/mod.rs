//! Modules layer - Infrastructure components behind the features
//!
//! Contains the catalog store backends and the response cache.

pub mod cache;
pub mod store;
