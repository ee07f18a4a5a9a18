//! Permanent response cache.
//!
//! [`ResponseCache`] memoises AI responses forever: once a `(kind, prompt)`
//! pair has been answered, every identical request is served locally.
//! There is no TTL and no eviction from the durable layer.
//!
//! # Layers
//!
//! - The durable layer is the host's [`KeyValueStore`]. It holds the raw
//!   JSON payload under [`cache_key`]. Reads that fail (storage error,
//!   corrupt JSON, payload that no longer validates) are treated as misses;
//!   writes that fail are logged and dropped.
//! - The hot layer is a bounded moka cache of validated responses in front
//!   of the store. It is also the single-flight point: [`get_or_fetch`]
//!   funnels concurrent misses for one key into a single fetch, and every
//!   waiter receives that fetch's outcome.
//!
//! Because durable entries never expire, evicting a hot entry only costs a
//! store read; it can never serve something the store would not.
//!
//! # Legacy keys
//!
//! Entries written under [`legacy_cache_key`] by earlier app versions are
//! found on a primary-key miss and copied to the primary key.
//!
//! [`get_or_fetch`]: ResponseCache::get_or_fetch

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use moka::future::Cache;
use serde_json::Value;
use tracing::{debug, warn};

use super::key::{cache_key, legacy_cache_key};
use crate::storage::KeyValueStore;
use crate::telemetry;
use crate::types::{AiKind, AiResponse};
use crate::{Result, ScholarGateError};

/// Default capacity of the hot layer.
pub const DEFAULT_HOT_ENTRIES: u64 = 1_000;

pub struct ResponseCache {
    store: Arc<dyn KeyValueStore>,
    hot: Cache<String, AiResponse>,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_hot_entries(store, DEFAULT_HOT_ENTRIES)
    }

    pub fn with_hot_entries(store: Arc<dyn KeyValueStore>, max_hot_entries: u64) -> Self {
        Self {
            store,
            hot: Cache::new(max_hot_entries),
        }
    }

    /// Look up a cached response.
    ///
    /// Never fails: anything unreadable is a miss. Emits hit/miss metrics.
    pub async fn get(&self, kind: AiKind, prompt: &str) -> Option<AiResponse> {
        let key = cache_key(kind, prompt);

        if let Some(response) = self.hot.get(&key).await {
            return Some(self.hit(kind, &key, response));
        }

        if let Some(response) = self.read_durable(kind, &key).await {
            self.hot.insert(key.clone(), response.clone()).await;
            return Some(self.hit(kind, &key, response));
        }

        let legacy = legacy_cache_key(kind, prompt);
        if let Some(response) = self.read_durable(kind, &legacy).await {
            self.migrate(&legacy, &key).await;
            self.hot.insert(key.clone(), response.clone()).await;
            return Some(self.hit(kind, &key, response));
        }

        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "kind" => kind.as_str()).increment(1);
        None
    }

    /// Persist a raw payload under the key for `(kind, prompt)`.
    ///
    /// Best effort: a failed write is logged and otherwise ignored.
    pub async fn persist(&self, kind: AiKind, prompt: &str, raw: &Value) {
        let key = cache_key(kind, prompt);
        let result = match serde_json::to_string(raw) {
            Ok(json) => self.store.set(&key, &json).await,
            Err(e) => Err(ScholarGateError::Storage(e.to_string())),
        };
        if let Err(e) = result {
            warn!(%kind, key = %key, error = %e, "failed to persist cached response");
        }
    }

    /// Return the hot entry for `key`, or run `fetch` to produce it.
    ///
    /// Concurrent callers for the same key share one `fetch`; the second
    /// element of the result is `true` when this caller's own `fetch` ran.
    /// Errors are not cached, so the next call after a failure fetches again.
    pub async fn get_or_fetch<F>(&self, key: &str, fetch: F) -> Result<(AiResponse, bool)>
    where
        F: Future<Output = Result<AiResponse>>,
    {
        let ran = AtomicBool::new(false);
        let tracked = async {
            ran.store(true, Ordering::Relaxed);
            fetch.await
        };
        let response = self
            .hot
            .try_get_with(key.to_string(), tracked)
            .await
            .map_err(|e: Arc<ScholarGateError>| (*e).clone())?;
        Ok((response, ran.load(Ordering::Relaxed)))
    }

    fn hit(&self, kind: AiKind, key: &str, response: AiResponse) -> AiResponse {
        debug!(%kind, key, "cache hit");
        metrics::counter!(telemetry::CACHE_HITS_TOTAL, "kind" => kind.as_str()).increment(1);
        response
    }

    async fn read_durable(&self, kind: AiKind, key: &str) -> Option<AiResponse> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(%kind, key, error = %e, "cache read failed, treating as miss");
                return None;
            }
        };
        let parsed = serde_json::from_str::<Value>(&raw)
            .map_err(ScholarGateError::from)
            .and_then(|value| AiResponse::from_value(kind, value));
        match parsed {
            Ok(response) => Some(response),
            Err(e) => {
                warn!(%kind, key, error = %e, "corrupt cache entry, treating as miss");
                None
            }
        }
    }

    async fn migrate(&self, from: &str, to: &str) {
        let raw = match self.store.get(from).await {
            Ok(Some(raw)) => raw,
            _ => return,
        };
        match self.store.set(to, &raw).await {
            Ok(()) => {
                debug!(from, to, "migrated legacy cache entry");
                if let Err(e) = self.store.remove(from).await {
                    warn!(key = from, error = %e, "failed to remove legacy cache entry");
                }
            }
            Err(e) => warn!(from, to, error = %e, "failed to migrate legacy cache entry"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::types::TextResult;
    use serde_json::json;

    fn text(s: &str) -> AiResponse {
        AiResponse::Text(TextResult { text: s.into() })
    }

    #[tokio::test]
    async fn persisted_entry_is_served() {
        let store = Arc::new(MemoryStore::new());
        let cache = ResponseCache::new(store.clone());

        assert!(cache.get(AiKind::Explain, "q").await.is_none());
        cache.persist(AiKind::Explain, "q", &json!({"text": "a"})).await;

        assert_eq!(cache.get(AiKind::Explain, "Q ").await, Some(text("a")));
        assert_eq!(store.keys_with_prefix("ai-cache-").len(), 1);
    }

    #[tokio::test]
    async fn corrupt_entry_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(&cache_key(AiKind::Explain, "q"), "{not json")
            .await
            .unwrap();
        let cache = ResponseCache::new(store);
        assert!(cache.get(AiKind::Explain, "q").await.is_none());
    }

    #[tokio::test]
    async fn entry_of_wrong_shape_is_a_miss() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(&cache_key(AiKind::Quiz, "q"), r#"{"text":"not a quiz"}"#)
            .await
            .unwrap();
        let cache = ResponseCache::new(store);
        assert!(cache.get(AiKind::Quiz, "q").await.is_none());
    }

    #[tokio::test]
    async fn legacy_entry_is_migrated() {
        let store = Arc::new(MemoryStore::new());
        let legacy = legacy_cache_key(AiKind::Formula, "Area of a circle");
        store.set(&legacy, r#"{"text":"pi r^2"}"#).await.unwrap();

        let cache = ResponseCache::new(store.clone());
        assert_eq!(
            cache.get(AiKind::Formula, "area of a circle").await,
            Some(text("pi r^2"))
        );

        let primary = cache_key(AiKind::Formula, "area of a circle");
        assert!(store.get(&primary).await.unwrap().is_some());
        assert!(store.get(&legacy).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_fetch_is_not_cached() {
        let cache = ResponseCache::new(Arc::new(MemoryStore::new()));

        let err = cache
            .get_or_fetch("k", async { Err(ScholarGateError::QuotaExhausted) })
            .await
            .unwrap_err();
        assert!(matches!(err, ScholarGateError::QuotaExhausted));

        let (resp, ran) = cache
            .get_or_fetch("k", async { Ok(text("ok")) })
            .await
            .unwrap();
        assert_eq!(resp, text("ok"));
        assert!(ran);

        let (_, ran) = cache
            .get_or_fetch("k", async { Ok(text("other")) })
            .await
            .unwrap();
        assert!(!ran);
    }
}
