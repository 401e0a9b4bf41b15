//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus, statsd);
//! without a recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `cellgpt_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `operation`: endpoint invoked: "chat" or "models"
//! - `status`: outcome: "ok" or "error"
//! - `reason`: why a result was empty: "input" or "upstream"

/// Total requests sent to the completion API.
///
/// Labels: `operation`, `status` ("ok" | "error").
pub const REQUESTS_TOTAL: &str = "cellgpt_requests_total";

/// Request duration in seconds.
///
/// Labels: `operation`.
pub const REQUEST_DURATION_SECONDS: &str = "cellgpt_request_duration_seconds";

/// Total request cache hits.
pub const CACHE_HITS_TOTAL: &str = "cellgpt_cache_hits_total";

/// Total request cache misses (including lookups while caching is disabled).
pub const CACHE_MISSES_TOTAL: &str = "cellgpt_cache_misses_total";

/// Total cells that resolved to the empty sentinel.
///
/// Labels: `reason` ("input" | "upstream").
pub const EMPTY_RESULTS_TOTAL: &str = "cellgpt_empty_results_total";
