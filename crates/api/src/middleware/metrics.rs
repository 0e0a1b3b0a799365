//! Prometheus metrics middleware.
//!
//! Counts and times every HTTP request by matched route, and serves the
//! rendered exposition text on `/metrics`.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Prometheus default buckets; request latency here is dominated by the
/// database round-trips.
const DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
];

/// Labels captured before the request is consumed by the inner service.
struct RequestLabels {
    method: &'static str,
    path: String,
}

impl RequestLabels {
    fn capture(req: &Request<Body>) -> Self {
        // The matched route template keeps label cardinality bounded; raw
        // paths carry per-record ids.
        let path = req
            .extensions()
            .get::<MatchedPath>()
            .map(|p| p.as_str().to_string())
            .unwrap_or_else(|| "unmatched".to_string());

        Self {
            method: method_label(req.method()),
            path,
        }
    }

    fn record(self, elapsed: Duration, status: StatusCode) {
        counter!(
            "http_requests_total",
            "method" => self.method,
            "path" => self.path.clone(),
            "status" => status.as_u16().to_string()
        )
        .increment(1);

        histogram!(
            "http_request_duration_seconds",
            "method" => self.method,
            "path" => self.path
        )
        .record(elapsed.as_secs_f64());
    }
}

/// Bounded method label; arbitrary extension methods all collapse to one
/// bucket.
fn method_label(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::DELETE => "DELETE",
        Method::OPTIONS => "OPTIONS",
        Method::HEAD => "HEAD",
        _ => "OTHER",
    }
}

/// Records `http_requests_total` and `http_request_duration_seconds` for
/// every request passing through.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let labels = RequestLabels::capture(&req);
    let start = Instant::now();

    let response = next.run(req).await;

    labels.record(start.elapsed(), response.status());
    response
}

/// Serves the Prometheus exposition text.
///
/// 503 until [`init_metrics`] has installed the recorder.
pub async fn metrics_handler() -> Response {
    match PROMETHEUS_HANDLE.get() {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::SERVICE_UNAVAILABLE.into_response(),
    }
}

/// Install the global Prometheus recorder. Call once at startup, before the
/// first metric is recorded.
pub fn init_metrics() {
    let handle = PrometheusBuilder::new()
        .set_buckets(DURATION_BUCKETS)
        .expect("duration buckets are non-empty")
        .install_recorder()
        .expect("metrics recorder already installed");

    let _ = PROMETHEUS_HANDLE.set(handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_methods_keep_their_names() {
        assert_eq!(method_label(&Method::GET), "GET");
        assert_eq!(method_label(&Method::POST), "POST");
        assert_eq!(method_label(&Method::PUT), "PUT");
        assert_eq!(method_label(&Method::DELETE), "DELETE");
    }

    #[test]
    fn unusual_methods_collapse_to_one_label() {
        assert_eq!(method_label(&Method::TRACE), "OTHER");
        assert_eq!(method_label(&Method::CONNECT), "OTHER");
    }

    #[test]
    fn duration_buckets_ascend() {
        assert!(DURATION_BUCKETS.windows(2).all(|w| w[0] < w[1]));
    }
}
