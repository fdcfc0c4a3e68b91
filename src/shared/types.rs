use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// PAGINATION
// =============================================================================

/// Page/per-page pair for list endpoints.
///
/// Both values are optional on the wire; accessors apply the defaults and
/// clamp `per_page` into `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationQuery {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    /// Effective page, never below 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Effective page size (respects MAX_PAGE_SIZE)
    pub fn per_page(&self) -> i64 {
        self.per_page
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// SQL OFFSET for the effective page
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }

    pub fn limit(&self) -> i64 {
        self.per_page()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    pub current_page: i64,
    pub per_page: i64,
    pub total_pages: i64,
    pub total_count: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginationMeta {
    pub fn new(query: &PaginationQuery, total_count: i64) -> Self {
        let current_page = query.page();
        let per_page = query.per_page();
        let total_pages = if total_count <= 0 {
            0
        } else {
            (total_count + per_page - 1) / per_page
        };

        Self {
            current_page,
            per_page,
            total_pages,
            total_count,
            has_next_page: current_page < total_pages,
            has_prev_page: current_page > 1,
        }
    }
}

// =============================================================================
// PARTIAL UPDATES
// =============================================================================

/// Deserialize a present field into `Some(..)`, so that together with
/// `#[serde(default)]` an absent field stays `None` while an explicit
/// `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
