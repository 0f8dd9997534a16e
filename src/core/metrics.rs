//! Request and dependency metrics
//!
//! Handlers and services emit through the `metrics` facade. When no recorder
//! is installed (METRICS_ADDR unset, tests) every emission is a no-op.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Instant;

use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::debug;

use crate::core::error::AppError;

pub const HTTP_REQUESTS_TOTAL: &str = "webapp_http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "webapp_http_request_duration_seconds";
pub const DEPENDENCY_DURATION_SECONDS: &str = "webapp_dependency_duration_seconds";

/// Dependency label for object-store calls
pub const DEP_OBJECT_STORE: &str = "object_store";
/// Dependency label for database calls
pub const DEP_DATABASE: &str = "database";

/// Install the Prometheus recorder with its own scrape listener
pub fn install_prometheus_exporter(addr: SocketAddr) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))
}

/// Outcome label attached to request metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    StorageFailure,
    DbFailure,
    InternalError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::BadRequest => "bad_request",
            Outcome::NotFound => "not_found",
            Outcome::MethodNotAllowed => "method_not_allowed",
            Outcome::StorageFailure => "storage_failure",
            Outcome::DbFailure => "db_failure",
            Outcome::InternalError => "internal_error",
        }
    }
}

/// Measures one handler invocation from start to response
pub struct RequestTimer {
    route: &'static str,
    started: Instant,
}

impl RequestTimer {
    pub fn start(route: &'static str) -> Self {
        Self {
            route,
            started: Instant::now(),
        }
    }

    /// Emit the call counter and total duration for this invocation
    pub fn finish(self, outcome: Outcome) {
        let elapsed = self.started.elapsed().as_secs_f64();

        metrics::counter!(HTTP_REQUESTS_TOTAL,
            "route" => self.route,
            "outcome" => outcome.as_str()
        )
        .increment(1);
        metrics::histogram!(HTTP_REQUEST_DURATION_SECONDS,
            "route" => self.route,
            "outcome" => outcome.as_str()
        )
        .record(elapsed);

        debug!(
            "route={} outcome={} duration_ms={:.2}",
            self.route,
            outcome.as_str(),
            elapsed * 1000.0
        );
    }

    /// Finish with the outcome of `result` and render it as the response
    pub fn complete<T: IntoResponse>(self, result: Result<T, AppError>) -> Response {
        match result {
            Ok(response) => {
                self.finish(Outcome::Success);
                response.into_response()
            }
            Err(e) => {
                self.finish(e.outcome());
                e.into_response()
            }
        }
    }
}

/// Await a dependency call and record how long it took
pub async fn time_dependency<T, E, F>(
    route: &'static str,
    dependency: &'static str,
    fut: F,
) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
{
    let started = Instant::now();
    let result = fut.await;
    let outcome = if result.is_ok() { "ok" } else { "error" };

    metrics::histogram!(DEPENDENCY_DURATION_SECONDS,
        "route" => route,
        "dependency" => dependency,
        "outcome" => outcome
    )
    .record(started.elapsed().as_secs_f64());

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_time_dependency_passes_result_through() {
        let ok: Result<u32, String> = time_dependency("/file", DEP_DATABASE, async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: Result<u32, String> =
            time_dependency("/file", DEP_OBJECT_STORE, async { Err("boom".to_string()) }).await;
        assert_eq!(err, Err("boom".to_string()));
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(Outcome::Success.as_str(), "success");
        assert_eq!(Outcome::DbFailure.as_str(), "db_failure");
        assert_eq!(Outcome::MethodNotAllowed.as_str(), "method_not_allowed");
    }
}
