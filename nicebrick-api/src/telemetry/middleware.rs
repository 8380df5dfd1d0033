//! Axum middleware for request metrics and logging.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::metrics;

/// Numeric path segments, e.g. subject ids.
static ID_SEGMENT: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"/\d+(/|$)").ok());

/// Normalize a path for metric labels (replace numeric ids with `{id}`).
///
/// Keeps Prometheus label cardinality bounded.
pub fn normalize_path(path: &str) -> String {
    match ID_SEGMENT.as_ref() {
        Some(pattern) => pattern.replace_all(path, "/{id}$1").into_owned(),
        None => path.to_string(),
    }
}

/// Observability middleware for Axum.
///
/// Wraps every request in a span, records Prometheus metrics and logs
/// completion.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Some(metrics) = metrics() {
        metrics.record_http_request(
            method.as_str(),
            &normalized_path,
            status.as_u16(),
            duration.as_secs_f64(),
        );
    }

    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = duration.as_millis() as u64,
            "Request completed"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_numeric_id() {
        assert_eq!(normalize_path("/api/artifact-image/12345"), "/api/artifact-image/{id}");
        assert_eq!(normalize_path("/api/metadata/777000"), "/api/metadata/{id}");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/content-status"), "/api/content-status");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }

    #[test]
    fn test_normalize_path_keeps_non_numeric_segments() {
        assert_eq!(normalize_path("/api/artifact-image/abc"), "/api/artifact-image/abc");
        assert_eq!(normalize_path("/api/v1/items/42/sub"), "/api/v1/items/{id}/sub");
    }
}
