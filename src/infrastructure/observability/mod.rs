//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{
    create_metrics_router, init_metrics, record_cache_lookup, record_cache_sweep, record_http_request,
    record_provider_fallback, record_provider_request, PrometheusMetrics,
};
