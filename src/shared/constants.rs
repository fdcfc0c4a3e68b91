/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

/// Prefix of the per-product response cache key (`product_<id>`)
pub const PRODUCT_CACHE_PREFIX: &str = "product";

/// Upper bound representable by `NUMERIC(10, 2)`
pub const MAX_PRICE_CENTS: i64 = 9_999_999_999;
