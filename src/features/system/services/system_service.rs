use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::features::system::dtos::{ApiInfoDto, EndpointsDto, HealthResponseDto, HealthStatus};
use crate::modules::store::CatalogStore;

pub struct SystemService {
    store: Arc<dyn CatalogStore>,
    timeout: Duration,
}

impl SystemService {
    pub fn new(store: Arc<dyn CatalogStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Liveness plus store reachability; a slow or failing store reports degraded
    pub async fn health(&self) -> HealthResponseDto {
        let database = tokio::time::timeout(self.timeout, self.store.ping())
            .await
            .unwrap_or(false);

        if !database {
            tracing::warn!("Health check: catalog store unreachable");
        }

        HealthResponseDto {
            status: if database {
                HealthStatus::Healthy
            } else {
                HealthStatus::Degraded
            },
            timestamp: Utc::now(),
            database,
        }
    }

    pub fn info(&self) -> ApiInfoDto {
        ApiInfoDto {
            message: "Product Catalog API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints: EndpointsDto {
                products: "/api/v1/products".to_string(),
                categories: "/api/v1/categories".to_string(),
                health: "/health".to_string(),
            },
        }
    }
}
