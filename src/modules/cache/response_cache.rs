use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use axum::body::Bytes;
use tokio::sync::RwLock;
use tracing::debug;

struct CacheEntry {
    body: Bytes,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    /// Bumped by every invalidate; a load that started under an older value is not stored
    generations: HashMap<String, u64>,
}

impl CacheState {
    fn generation(&self, key: &str) -> u64 {
        self.generations.get(key).copied().unwrap_or(0)
    }
}

/// In-process cache of rendered response bodies
#[derive(Default)]
pub struct ResponseCache {
    state: RwLock<CacheState>,
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache").finish_non_exhaustive()
    }
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entry for `key`, if any
    pub async fn get(&self, key: &str) -> Option<Bytes> {
        let state = self.state.read().await;
        state
            .entries
            .get(key)
            .filter(|entry| !entry.is_expired(Instant::now()))
            .map(|entry| entry.body.clone())
    }

    /// Return the cached body for `key`, or run `loader` and cache its output for `ttl`.
    ///
    /// Loader failures are returned as-is and leave the cache untouched. When
    /// `key` is invalidated while the loader runs, the loaded body is returned
    /// to this caller but not stored.
    pub async fn get_or_populate<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        loader: F,
    ) -> Result<Bytes, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Bytes, E>>,
    {
        let generation = {
            let state = self.state.read().await;
            let live = state
                .entries
                .get(key)
                .filter(|entry| !entry.is_expired(Instant::now()));
            if let Some(entry) = live {
                debug!("Cache hit: {}", key);
                return Ok(entry.body.clone());
            }
            state.generation(key)
        };

        debug!("Cache miss: {}", key);
        let body = loader().await?;

        let mut state = self.state.write().await;
        if state.generation(key) != generation {
            debug!("Cache store skipped, invalidated during load: {}", key);
            return Ok(body);
        }
        state.entries.insert(
            key.to_string(),
            CacheEntry {
                body: body.clone(),
                expires_at: Instant::now() + ttl,
            },
        );

        Ok(body)
    }

    /// Remove `key` unconditionally; returns whether an entry was present
    pub async fn invalidate(&self, key: &str) -> bool {
        let mut state = self.state.write().await;
        *state.generations.entry(key.to_string()).or_default() += 1;
        let removed = state.entries.remove(key).is_some();
        debug!("Cache invalidate: {} (present={})", key, removed);
        removed
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut state = self.state.write().await;
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        before - state.entries.len()
    }

    /// Number of stored entries, expired ones included
    pub async fn len(&self) -> usize {
        self.state.read().await.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tokio::sync::oneshot;

    const TTL: Duration = Duration::from_secs(60);

    async fn load(calls: &AtomicUsize, body: &'static str) -> Result<Bytes, String> {
        calls.fetch_add(1, Ordering::SeqCst);
        Ok(Bytes::from_static(body.as_bytes()))
    }

    #[tokio::test]
    async fn test_populates_once_then_hits() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        let first = cache
            .get_or_populate("product_1", TTL, || load(&calls, "a"))
            .await
            .unwrap();
        let second = cache
            .get_or_populate("product_1", TTL, || load(&calls, "b"))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(second, Bytes::from_static(b"a"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache
            .get_or_populate("product_1", TTL, || load(&calls, "old"))
            .await
            .unwrap();
        assert!(cache.invalidate("product_1").await);
        assert!(!cache.invalidate("product_1").await);

        let body = cache
            .get_or_populate("product_1", TTL, || load(&calls, "new"))
            .await
            .unwrap();
        assert_eq!(body, Bytes::from_static(b"new"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_loader_errors_are_not_cached() {
        let cache = ResponseCache::new();

        let result: Result<Bytes, String> = cache
            .get_or_populate("product_9", TTL, || async { Err("not found".to_string()) })
            .await;
        assert_eq!(result.unwrap_err(), "not found");
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_expired_entries_are_recomputed() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_millis(20);

        cache
            .get_or_populate("product_2", ttl, || load(&calls, "first"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(cache.get("product_2").await.is_none());
        let body = cache
            .get_or_populate("product_2", ttl, || load(&calls, "second"))
            .await
            .unwrap();
        assert_eq!(body, Bytes::from_static(b"second"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = ResponseCache::new();
        let calls = AtomicUsize::new(0);

        cache
            .get_or_populate("short", Duration::ZERO, || load(&calls, "x"))
            .await
            .unwrap();
        cache
            .get_or_populate("long", TTL, || load(&calls, "y"))
            .await
            .unwrap();

        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get("long").await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_during_load_discards_loaded_body() {
        let cache = Arc::new(ResponseCache::new());
        let (loading_tx, loading_rx) = oneshot::channel::<()>();
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let reader = tokio::spawn({
            let cache = Arc::clone(&cache);
            async move {
                cache
                    .get_or_populate("product_1", TTL, || async move {
                        let _ = loading_tx.send(());
                        let _ = release_rx.await;
                        Ok::<_, String>(Bytes::from_static(b"old"))
                    })
                    .await
            }
        });

        loading_rx.await.unwrap();
        cache.invalidate("product_1").await;
        release_tx.send(()).unwrap();

        // the in-flight reader still gets what it loaded
        assert_eq!(reader.await.unwrap().unwrap(), Bytes::from_static(b"old"));
        assert!(cache.get("product_1").await.is_none());

        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let body = cache
                .get_or_populate("product_1", TTL, || load(&calls, "new"))
                .await
                .unwrap();
            assert_eq!(body, Bytes::from_static(b"new"));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
