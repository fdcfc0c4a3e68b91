use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    /// Whether the catalog store answered a ping
    pub database: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndpointsDto {
    pub products: String,
    pub categories: String,
    pub health: String,
}

/// Service banner returned at `/`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiInfoDto {
    pub message: String,
    pub version: String,
    pub endpoints: EndpointsDto,
}
