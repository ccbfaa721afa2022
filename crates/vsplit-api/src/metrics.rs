//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "vsplit_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vsplit_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vsplit_http_requests_in_flight";

    // Upload metrics
    pub const UPLOAD_BYTES_TOTAL: &str = "vsplit_upload_bytes_total";

    // Job metrics (counters themselves live in vsplit-jobs)
    pub const JOBS_SUBMITTED_TOTAL: &str = "vsplit_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "vsplit_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vsplit_jobs_failed_total";
    pub const SEGMENTS_PRODUCED_TOTAL: &str = "vsplit_segments_produced_total";
    pub const SEGMENT_DURATION_SECONDS: &str = "vsplit_segment_duration_seconds";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record uploaded bytes.
pub fn record_upload_bytes(bytes: u64) {
    counter!(names::UPLOAD_BYTES_TOTAL).increment(bytes);
}

/// Sanitize path for metrics labels (collapse IDs and file names).
fn sanitize_path(path: &str) -> String {
    let path = regex_lite::Regex::new(
        r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}",
    )
    .unwrap()
    .replace_all(path, ":job_id");
    let path = regex_lite::Regex::new(r"/files/[^/]+$")
        .unwrap()
        .replace_all(&path, "/files/:file_name");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/jobs/550e8400-e29b-41d4-a716-446655440000"),
            "/api/jobs/:job_id"
        );
        assert_eq!(
            sanitize_path("/api/jobs/550e8400-e29b-41d4-a716-446655440000/files/part01.mp4"),
            "/api/jobs/:job_id/files/:file_name"
        );
        assert_eq!(sanitize_path("/api/jobs"), "/api/jobs");
    }
}
