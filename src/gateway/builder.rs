//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::AiGateway;
use crate::cache::ResponseCache;
use crate::cache::response::DEFAULT_HOT_ENTRIES;
use crate::clock::{Clock, SystemClock};
use crate::config::GatewayConfig;
use crate::connectivity::{AlwaysOnline, Connectivity};
use crate::providers::edge_function::DEFAULT_FUNCTION;
use crate::providers::{AiBackend, EdgeFunctionClient};
use crate::storage::{FileStore, KeyValueStore, MemoryStore};
use crate::usage::{DEFAULT_DAILY_LIMIT, UsageLedger};
use crate::{Result, ScholarGateError};

/// Main entry point for creating gateway instances.
pub struct ScholarGate;

impl ScholarGate {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> ScholarGateBuilder {
        ScholarGateBuilder::new()
    }
}

/// Where remote calls go.
enum BackendChoice {
    Custom(Arc<dyn AiBackend>),
    /// Hosted function; the HTTP client is created in `build()` so it picks
    /// up the final request timeout.
    EdgeFunction {
        base_url: String,
        anon_key: Option<String>,
        function: String,
    },
}

/// Builder for configuring gateway instances.
///
/// Only the backend is required. Defaults: in-memory store, UTC system
/// clock, always online, 15 free calls/day, 10 bonus uses per rewarded ad,
/// 15 s request timeout.
pub struct ScholarGateBuilder {
    backend: Option<BackendChoice>,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    connectivity: Option<Arc<dyn Connectivity>>,
    daily_limit: u32,
    reward_amount: u32,
    request_timeout: Duration,
    hot_cache_entries: u64,
}

impl ScholarGateBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            store: None,
            clock: None,
            connectivity: None,
            daily_limit: DEFAULT_DAILY_LIMIT,
            reward_amount: 10,
            request_timeout: Duration::from_secs(15),
            hot_cache_entries: DEFAULT_HOT_ENTRIES,
        }
    }

    /// Builder pre-filled from a [`GatewayConfig`]: HTTP backend, file store,
    /// quota and limits.
    ///
    /// Fails if no project URL is configured.
    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let base_url = config.base_url().ok_or_else(|| {
            ScholarGateError::Configuration(
                "no endpoint configured: set [endpoint] base_url or SUPABASE_URL".to_string(),
            )
        })?;

        let store = match config.storage.path {
            Some(ref path) => FileStore::new(path),
            None => FileStore::default_location(),
        };
        debug!(url = %base_url, store = %store.path().display(), "gateway configured");

        let mut builder = Self::new();
        builder.backend = Some(BackendChoice::EdgeFunction {
            base_url,
            anon_key: config.anon_key(),
            function: config.endpoint.function.clone(),
        });
        Ok(builder
            .store(Arc::new(store))
            .daily_limit(config.quota.daily_limit)
            .reward_amount(config.quota.reward_amount)
            .request_timeout(config.limits.request_timeout())
            .hot_cache_entries(config.limits.hot_cache_entries))
    }

    /// Remote AI backend. Replaces any earlier [`edge_function`](Self::edge_function).
    pub fn backend(mut self, backend: Arc<dyn AiBackend>) -> Self {
        self.backend = Some(BackendChoice::Custom(backend));
        self
    }

    /// Use the hosted function at `base_url` with the given public key.
    ///
    /// The HTTP client uses the [`request_timeout`](Self::request_timeout)
    /// in effect when [`build`](Self::build) runs.
    pub fn edge_function(
        mut self,
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
    ) -> Self {
        self.backend = Some(BackendChoice::EdgeFunction {
            base_url: base_url.into(),
            anon_key: Some(anon_key.into()),
            function: DEFAULT_FUNCTION.to_string(),
        });
        self
    }

    /// Durable store for counters and cached responses.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Clock deciding what "today" is.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Online/offline predicate.
    pub fn connectivity(mut self, connectivity: Arc<dyn Connectivity>) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    /// Free calls per day.
    pub fn daily_limit(mut self, limit: u32) -> Self {
        self.daily_limit = limit;
        self
    }

    /// Bonus uses granted by [`AiGateway::award_rewarded_ad`].
    pub fn reward_amount(mut self, amount: u32) -> Self {
        self.reward_amount = amount;
        self
    }

    /// Upper bound on a single remote call.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Capacity of the in-memory response layer.
    pub fn hot_cache_entries(mut self, entries: u64) -> Self {
        self.hot_cache_entries = entries;
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<AiGateway> {
        if self.reward_amount == 0 {
            return Err(ScholarGateError::Configuration(
                "reward amount must be positive".to_string(),
            ));
        }
        if self.request_timeout.is_zero() {
            return Err(ScholarGateError::Configuration(
                "request timeout must be non-zero".to_string(),
            ));
        }

        let backend: Arc<dyn AiBackend> = match self.backend {
            Some(BackendChoice::Custom(backend)) => backend,
            Some(BackendChoice::EdgeFunction {
                base_url,
                anon_key,
                function,
            }) => {
                let mut client = EdgeFunctionClient::with_timeout(base_url, self.request_timeout)?
                    .function(function);
                if let Some(key) = anon_key {
                    client = client.anon_key(key);
                }
                Arc::new(client)
            }
            None => {
                return Err(ScholarGateError::Configuration(
                    "no AI backend configured".to_string(),
                ));
            }
        };

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>);
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let connectivity = self
            .connectivity
            .unwrap_or_else(|| Arc::new(AlwaysOnline) as Arc<dyn Connectivity>);

        let cache = ResponseCache::with_hot_entries(store.clone(), self.hot_cache_entries);
        let usage = UsageLedger::new(store, clock, self.daily_limit);

        Ok(AiGateway::new(
            backend,
            cache,
            usage,
            connectivity,
            self.request_timeout,
            self.reward_amount,
        ))
    }
}

impl Default for ScholarGateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
