//! Durable key-value storage backends.
//!
//! The gateway persists everything (daily counter, bonus ledger, cached
//! responses) as string values under string keys. Hosts plug in whatever
//! store their platform offers by implementing [`KeyValueStore`]:
//!
//! - [`MemoryStore`]: process-local map, for tests and ephemeral sessions.
//! - [`FileStore`]: a single JSON document on disk, written atomically.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::Result;

/// Storage key of the daily usage counter.
pub const DAILY_COUNTER_KEY: &str = "ai-daily-counter";

/// Storage key of the bonus-uses ledger.
pub const BONUS_LEDGER_KEY: &str = "ai-bonus-uses";

/// Prefix shared by every cached response key.
pub const CACHE_PREFIX: &str = "ai-cache-";

/// Minimal string key-value contract the gateway needs from its host.
///
/// Errors are reported as [`ScholarGateError::Storage`](crate::ScholarGateError::Storage);
/// the gateway decides per call site whether a failure is fatal or swallowed.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
