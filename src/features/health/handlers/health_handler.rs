use axum::{
    body::Bytes as RawBody,
    extract::{rejection::BytesRejection, State},
    http::{Method, StatusCode, Uri},
};
use std::sync::Arc;
use tracing::{debug, error};

use crate::core::metrics::{Outcome, RequestTimer};
use crate::features::health::services::HealthService;
use crate::shared::constants::ROUTE_HEALTHZ;

/// Liveness check
///
/// Only a bare `GET` (no query parameters, no body) is accepted. A valid request
/// writes one `healthcheck` row; if that insert fails the service reports 503.
/// Responses never have a body.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "health",
    responses(
        (status = 200, description = "Service and database are healthy"),
        (status = 400, description = "Request carried query parameters or a body"),
        (status = 405, description = "Any method other than GET"),
        (status = 503, description = "Database insert failed")
    )
)]
pub async fn health_check(
    State(service): State<Arc<HealthService>>,
    method: Method,
    uri: Uri,
    body: Result<RawBody, BytesRejection>,
) -> StatusCode {
    let timer = RequestTimer::start(ROUTE_HEALTHZ);

    let (status, outcome) = if method != Method::GET {
        debug!("Rejecting {} on {}", method, ROUTE_HEALTHZ);
        (StatusCode::METHOD_NOT_ALLOWED, Outcome::MethodNotAllowed)
    } else if !is_bare_request(uri.query(), body.as_deref().ok()) {
        debug!("Rejecting health check carrying a query or body");
        (StatusCode::BAD_REQUEST, Outcome::BadRequest)
    } else {
        match service.record_check().await {
            Ok(()) => (StatusCode::OK, Outcome::Success),
            Err(e) => {
                error!("Failed to insert health check: {}", e);
                (StatusCode::SERVICE_UNAVAILABLE, Outcome::DbFailure)
            }
        }
    };

    timer.finish(outcome);
    status
}

/// True when the request has no query parameters and no body
///
/// An unreadable body counts as present. Whitespace-only bodies and an empty
/// JSON object count as absent, whatever the declared content type.
pub fn is_bare_request(query: Option<&str>, body: Option<&[u8]>) -> bool {
    let has_query = query.is_some_and(|q| !q.is_empty());
    let body_is_empty = match body {
        None => false,
        Some(bytes) => is_empty_body(bytes),
    };

    !has_query && body_is_empty
}

fn is_empty_body(bytes: &[u8]) -> bool {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return true;
    }

    serde_json::from_slice::<serde_json::Map<String, serde_json::Value>>(bytes)
        .is_ok_and(|object| object.is_empty())
}
