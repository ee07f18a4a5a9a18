//! AiGateway - quota, cache and metering around the remote AI backend

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::cache::{ResponseCache, cache_key};
use crate::connectivity::Connectivity;
use crate::providers::{AiBackend, payload_error};
use crate::telemetry;
use crate::types::{AiKind, AiRequest, AiResponse, FlashcardSet, Quiz, TextResult, UsageBreakdown};
use crate::usage::UsageLedger;
use crate::{Result, ScholarGateError};

/// Mediates every request for AI-generated content.
///
/// - identical requests are answered from a permanent local cache,
/// - remote calls are limited to a daily allowance plus earned bonus uses,
/// - offline conditions fail fast with [`ScholarGateError::Offline`]
///   unless the cache can answer.
///
/// Construct with [`ScholarGate::builder()`](crate::ScholarGate::builder).
/// The gateway is `Send + Sync`; share it behind an `Arc`.
pub struct AiGateway {
    backend: Arc<dyn AiBackend>,
    cache: ResponseCache,
    usage: UsageLedger,
    connectivity: Arc<dyn Connectivity>,
    request_timeout: Duration,
    reward_amount: u32,
}

impl AiGateway {
    pub(crate) fn new(
        backend: Arc<dyn AiBackend>,
        cache: ResponseCache,
        usage: UsageLedger,
        connectivity: Arc<dyn Connectivity>,
        request_timeout: Duration,
        reward_amount: u32,
    ) -> Self {
        Self {
            backend,
            cache,
            usage,
            connectivity,
            request_timeout,
            reward_amount,
        }
    }

    // ===== Quota =====

    /// Calls left today: `max(0, daily_limit - used) + bonus`.
    pub async fn remaining_uses(&self) -> Result<u32> {
        self.usage.remaining().await
    }

    /// Remaining allowance split into daily and bonus parts.
    pub async fn usage_breakdown(&self) -> Result<UsageBreakdown> {
        self.usage.breakdown().await
    }

    /// Grant `amount` extra uses for today. `amount` must be positive.
    pub async fn add_bonus_uses(&self, amount: u32) -> Result<()> {
        self.usage.add_bonus(amount).await.map(|_| ())
    }

    /// Grant the configured reward for watching a rewarded ad.
    pub async fn award_rewarded_ad(&self) -> Result<()> {
        self.add_bonus_uses(self.reward_amount).await
    }

    pub fn daily_limit(&self) -> u32 {
        self.usage.daily_limit()
    }

    pub fn reward_amount(&self) -> u32 {
        self.reward_amount
    }

    // ===== Cache =====

    /// Cached response for `(kind, prompt)`, if any. Never fails.
    pub async fn cached_result(&self, kind: AiKind, prompt: &str) -> Option<AiResponse> {
        self.cache.get(kind, prompt).await
    }

    // ===== Calls =====

    /// Get AI content for `(kind, prompt)`.
    ///
    /// Offline: answered from the cache or rejected with `Offline`.
    /// Online: cache hits are free; otherwise one use (bonus first) is
    /// reserved before the remote call and kept only for a well-formed
    /// response.
    /// Concurrent identical calls share a single remote invocation.
    pub async fn call(&self, kind: AiKind, prompt: &str) -> Result<AiResponse> {
        if prompt.trim().is_empty() {
            return Err(ScholarGateError::InvalidInput(
                "prompt must not be empty".to_string(),
            ));
        }

        if !self.connectivity.is_online() {
            return match self.cache.get(kind, prompt).await {
                Some(response) => {
                    debug!(%kind, "offline, served from cache");
                    Ok(response)
                }
                None => Err(ScholarGateError::Offline),
            };
        }

        if let Some(response) = self.cache.get(kind, prompt).await {
            return Ok(response);
        }

        let key = cache_key(kind, prompt);
        let (response, fetched) = self
            .cache
            .get_or_fetch(&key, self.fetch(kind, prompt))
            .await?;
        if !fetched {
            debug!(%kind, key = %key, "answered by an in-flight identical call");
            metrics::counter!(telemetry::COALESCED_TOTAL, "kind" => kind.as_str()).increment(1);
        }
        Ok(response)
    }

    /// Explain a homework question.
    pub async fn explain(&self, question: &str) -> Result<TextResult> {
        self.call(AiKind::Explain, question).await?.into_text()
    }

    /// Generate flashcards on a topic.
    pub async fn flashcards(&self, topic: &str) -> Result<FlashcardSet> {
        self.call(AiKind::Flashcards, topic).await?.into_flashcards()
    }

    /// Generate a multiple-choice quiz on a topic.
    pub async fn quiz(&self, topic: &str) -> Result<Quiz> {
        self.call(AiKind::Quiz, topic).await?.into_quiz()
    }

    /// Find and explain the formula matching a natural language query.
    pub async fn formula(&self, query: &str) -> Result<TextResult> {
        self.call(AiKind::Formula, query).await?.into_text()
    }

    /// Reserve a use, call the backend, validate, cache.
    ///
    /// The reserved use is released again if the call fails in any way.
    async fn fetch(&self, kind: AiKind, prompt: &str) -> Result<AiResponse> {
        let Some(reservation) = self.usage.reserve().await? else {
            metrics::counter!(telemetry::QUOTA_EXHAUSTED_TOTAL, "kind" => kind.as_str())
                .increment(1);
            info!(%kind, "quota exhausted");
            return Err(ScholarGateError::QuotaExhausted);
        };

        let request = AiRequest::new(kind, prompt);
        let start = Instant::now();
        let outcome = self.invoke(&request).await;
        let elapsed = start.elapsed();

        let status = if outcome.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::REQUESTS_TOTAL, "kind" => kind.as_str(), "status" => status)
            .increment(1);
        metrics::histogram!(telemetry::REQUEST_DURATION_SECONDS, "kind" => kind.as_str())
            .record(elapsed.as_secs_f64());

        let (payload, response) = match outcome {
            Ok(ok) => ok,
            Err(e) => {
                warn!(%kind, backend = self.backend.name(), error = %e, "AI request failed");
                if let Err(release_err) = self.usage.release(reservation).await {
                    warn!(%kind, error = %release_err, "failed to release reserved use");
                }
                return Err(e);
            }
        };

        self.cache.persist(kind, prompt, &payload).await;

        let source = reservation.source().as_str();
        metrics::counter!(telemetry::USES_CONSUMED_TOTAL, "source" => source).increment(1);
        debug!(%kind, source, "use charged");

        Ok(response)
    }

    async fn invoke(&self, request: &AiRequest) -> Result<(serde_json::Value, AiResponse)> {
        let payload = tokio::time::timeout(self.request_timeout, self.backend.invoke(request))
            .await
            .map_err(|_| ScholarGateError::Timeout(self.request_timeout))??;

        if let Some(message) = payload_error(&payload) {
            return Err(ScholarGateError::Remote {
                status: None,
                message,
            });
        }

        let response = AiResponse::from_value(request.kind, payload.clone())?;
        Ok((payload, response))
    }
}
