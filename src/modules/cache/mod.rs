//! Response cache
//!
//! Keyed store of serialized JSON bodies with a per-entry TTL. Writers drop
//! entries explicitly; expired entries are recomputed on the next read.

mod response_cache;

pub use response_cache::ResponseCache;

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::shared::constants::PRODUCT_CACHE_PREFIX;

/// Cache key for a single product's show response
pub fn product_cache_key(id: i64) -> String {
    format!("{}_{}", PRODUCT_CACHE_PREFIX, id)
}

/// Shortest period the purge loop will tick at
const MIN_PURGE_PERIOD: Duration = Duration::from_millis(10);

/// Periodically drop expired entries; abort the handle on shutdown
pub fn spawn_purge_task(cache: Arc<ResponseCache>, period: Duration) -> JoinHandle<()> {
    let period = period.max(MIN_PURGE_PERIOD);

    tokio::spawn(async move {
        tracing::info!("Cache purge task started: interval={:?}", period);

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                tracing::debug!("Purged {} expired cache entries", removed);
            }
        }
    })
}
