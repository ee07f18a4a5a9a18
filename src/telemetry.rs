//! Telemetry metric name constants.
//!
//! Centralised metric names for scholargate operations. Hosts install their
//! own `metrics` recorder; without one, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `scholargate_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `kind`: request kind ("explain", "flashcards", "quiz", "formula")
//! - `status`: outcome: "ok" or "error"
//! - `source`: where a quota unit came from: "bonus" or "daily"

/// Remote invocations attempted.
///
/// Labels: `kind`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "scholargate_requests_total";

/// Remote invocation duration in seconds.
///
/// Labels: `kind`.
pub const REQUEST_DURATION_SECONDS: &str = "scholargate_request_duration_seconds";

/// Responses served from the cache.
///
/// Labels: `kind`.
pub const CACHE_HITS_TOTAL: &str = "scholargate_cache_hits_total";

/// Cache lookups that found nothing.
///
/// Labels: `kind`.
pub const CACHE_MISSES_TOTAL: &str = "scholargate_cache_misses_total";

/// Calls answered by another in-flight identical call.
///
/// Labels: `kind`.
pub const COALESCED_TOTAL: &str = "scholargate_coalesced_total";

/// Calls rejected because daily and bonus allowance were both used up.
///
/// Labels: `kind`.
pub const QUOTA_EXHAUSTED_TOTAL: &str = "scholargate_quota_exhausted_total";

/// Quota units consumed by successful calls.
///
/// Labels: `source` ("bonus" | "daily").
pub const USES_CONSUMED_TOTAL: &str = "scholargate_uses_consumed_total";

/// Reserved uses handed back after a failed call.
///
/// Labels: `source` ("bonus" | "daily").
pub const USES_RELEASED_TOTAL: &str = "scholargate_uses_released_total";

/// Bonus uses granted.
pub const BONUS_GRANTED_TOTAL: &str = "scholargate_bonus_granted_total";
