//! Nicebrick Telemetry
//!
//! Structured logging through `tracing` and Prometheus metrics for the API
//! layer. Everything works standalone, with no collector required.

pub mod metrics;
pub mod middleware;
pub mod tracer;

pub use metrics::{metrics, metrics_handler, NiceMetrics, VoteMetricOutcome, METRICS};
pub use middleware::observability_middleware;
pub use tracer::init_tracing;
