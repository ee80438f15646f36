//! Prometheus metrics for the clinic server.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};
use uuid::Uuid;

lazy_static! {
    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "molar_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "molar_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "molar_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");
}

/// Collapse entity IDs out of a path so metric label cardinality stays
/// bounded ("/api/patients/3f1c.../findings" -> "/api/patients/:id/findings").
pub fn sanitize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if Uuid::parse_str(segment).is_ok() {
                ":id"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
