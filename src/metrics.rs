//! Prometheus metrics
//!
//! Request counters, a latency histogram and the `customers_total` gauge,
//! recorded through the `metrics` facade and rendered at `/metrics` together
//! with the default `process_*` metrics.

use crate::types::{AppError, Result};
use axum::{extract::Request, middleware::Next, response::Response};
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use metrics_process::Collector;
use parking_lot::{const_mutex, Mutex};
use std::time::Instant;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const CUSTOMERS_TOTAL: &str = "customers_total";

const DURATION_BUCKETS: &[f64] = &[0.1, 0.3, 0.5, 0.7, 1.0, 3.0, 5.0, 7.0, 10.0];

static RECORDER: Mutex<Option<PrometheusHandle>> = const_mutex(None);

/// Installs the process-wide Prometheus recorder and returns a handle to it.
///
/// Only the first call installs anything; later calls (a second app in the
/// same process, parallel tests) get a clone of the same handle.
pub fn setup_metrics_recorder() -> Result<PrometheusHandle> {
    let mut slot = RECORDER.lock();
    if let Some(handle) = slot.as_ref() {
        return Ok(handle.clone());
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
            DURATION_BUCKETS,
        )
        .map_err(|e| AppError::Internal(format!("Invalid histogram buckets: {}", e)))?
        .install_recorder()
        .map_err(|e| AppError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
    describe_histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "Duration of HTTP requests in seconds"
    );
    describe_gauge!(CUSTOMERS_TOTAL, "Total number of customers");
    Collector::default().describe();

    *slot = Some(handle.clone());
    Ok(handle)
}

pub fn record_http_request(method: &str, route: &str, status: u16) {
    counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status_code" => status.to_string()
    )
    .increment(1);
}

pub fn record_http_duration(method: &str, route: &str, duration_secs: f64) {
    histogram!(
        HTTP_REQUEST_DURATION_SECONDS,
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(duration_secs);
}

/// Refreshes the `process_*` gauges (CPU, memory, descriptors, threads).
pub fn collect_process_metrics() {
    Collector::default().collect();
}

pub fn set_customers_count(count: u64) {
    gauge!(CUSTOMERS_TOTAL).set(count as f64);
}

/// Replaces numeric path segments with `:id`.
///
/// `/api/customers/42` → `/api/customers/:id`
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit()) {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Records count and latency of every request, error responses included.
pub async fn metrics_layer(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let route = normalize_path(request.uri().path());

    let response = next.run(request).await;

    record_http_request(&method, &route, response.status().as_u16());
    record_http_duration(&method, &route, start.elapsed().as_secs_f64());

    response
}
