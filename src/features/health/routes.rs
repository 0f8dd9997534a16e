use axum::{
    http::{header, HeaderValue},
    routing::any,
    Router,
};
use std::sync::Arc;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::features::health::handlers::health_check;
use crate::features::health::services::HealthService;
use crate::shared::constants::{
    CACHE_CONTROL_NO_CACHE, CONTENT_TYPE_OPTIONS_NOSNIFF, PRAGMA_NO_CACHE, ROUTE_HEALTHZ,
};

/// Create routes for the health check
///
/// Every response from this router, whatever the status, carries the
/// no-cache and nosniff headers.
pub fn routes(service: Arc<HealthService>) -> Router {
    Router::new()
        .route(ROUTE_HEALTHZ, any(health_check))
        .with_state(service)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_CACHE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static(PRAGMA_NO_CACHE),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static(CONTENT_TYPE_OPTIONS_NOSNIFF),
        ))
}
