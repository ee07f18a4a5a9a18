//! Response caching.
//!
//! - [`key`]: cache key derivation from request kind and normalised prompt.
//! - [`response::ResponseCache`]: permanent memo of AI responses backed by
//!   the host's [`KeyValueStore`](crate::storage::KeyValueStore), with an
//!   in-memory layer that also coalesces concurrent identical requests.

pub mod key;
pub mod response;

pub use key::{cache_key, legacy_cache_key, normalize_prompt};
pub use response::ResponseCache;
