//! Prometheus Metrics Definitions
//!
//! Defines all nicebrick metrics and the `/metrics` scrape endpoint.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0,
];

/// Global metrics instance - registered on first use.
pub static METRICS: Lazy<ApiResult<NiceMetrics>> = Lazy::new(NiceMetrics::new);

/// The registered metrics, or `None` if registration failed.
pub fn metrics() -> Option<&'static NiceMetrics> {
    METRICS.as_ref().ok()
}

/// Outcome label for `nicebrick_votes_total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteMetricOutcome {
    Recorded,
    Duplicate,
    Failed,
}

impl VoteMetricOutcome {
    fn as_str(self) -> &'static str {
        match self {
            Self::Recorded => "recorded",
            Self::Duplicate => "duplicate",
            Self::Failed => "failed",
        }
    }
}

/// Container for all nicebrick metrics.
#[derive(Clone)]
pub struct NiceMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Vote attempts - labels: kind, outcome
    pub votes_total: CounterVec,

    /// Reads served from the zero fallback - labels: operation
    pub store_fallbacks_total: CounterVec,

    /// Artifact cache lookups - labels: result (hit/miss)
    pub artifact_cache_total: CounterVec,
}

fn registration_error(name: &str, e: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, e))
}

impl NiceMetrics {
    /// Create and register all metrics with the default Prometheus registry.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "nicebrick_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| registration_error("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "nicebrick_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| registration_error("http_request_duration_seconds", e))?,

            votes_total: register_counter_vec!(
                "nicebrick_votes_total",
                "Vote attempts by kind and outcome",
                &["kind", "outcome"]
            )
            .map_err(|e| registration_error("votes_total", e))?,

            store_fallbacks_total: register_counter_vec!(
                "nicebrick_store_fallbacks_total",
                "Reads answered with the zero fallback because the store failed",
                &["operation"]
            )
            .map_err(|e| registration_error("store_fallbacks_total", e))?,

            artifact_cache_total: register_counter_vec!(
                "nicebrick_artifact_cache_total",
                "Artifact cache lookups by result",
                &["result"]
            )
            .map_err(|e| registration_error("artifact_cache_total", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, status_str.as_str()])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    pub fn record_vote(&self, kind: &str, outcome: VoteMetricOutcome) {
        self.votes_total
            .with_label_values(&[kind, outcome.as_str()])
            .inc();
    }

    pub fn record_store_fallback(&self, operation: &str) {
        self.store_fallbacks_total
            .with_label_values(&[operation])
            .inc();
    }

    pub fn record_artifact_cache(&self, hit: bool) {
        let result = if hit { "hit" } else { "miss" };
        self.artifact_cache_total.with_label_values(&[result]).inc();
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
))]
pub async fn metrics_handler() -> impl IntoResponse {
    // Force registration so a fresh process still exposes every family.
    let _ = metrics();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
