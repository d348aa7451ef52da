//! API routing
//!
//! # Structure
//!
//! - [`health`] - liveness and readiness probes
//! - [`areas`] - restaurant areas
//! - [`tables`] - tables and staff actions on them
//! - [`reservations`] - reservation listing, creation and status changes
//! - [`availability`] - availability search (placeholder)
//! - [`floor`] - live floor projection
//! - [`openapi`] - OpenAPI document

pub mod areas;
pub mod availability;
pub mod floor;
pub mod health;
pub mod openapi;
pub mod reservations;
pub mod tables;

use axum::Router;
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use http::header::{
    AUTHORIZATION, CONTENT_TYPE, HeaderName, HeaderValue, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
    X_FRAME_OPTIONS,
};
use http::Method;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use shared::error::{AppError, AppResult};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{REQUEST_ID_HEADER, logging_middleware};
use crate::state::AppState;

/// Maximum accepted request body
pub const BODY_LIMIT_BYTES: usize = 512 * 1024;

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(areas::router())
        .merge(tables::router())
        .merge(reservations::router())
        .merge(availability::router())
        .merge(floor::router())
        .merge(openapi::router())
}

/// Build the fully configured application
///
/// Used by both the HTTP server and oneshot tests.
pub fn build_app(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        // Request logging - outermost, sees the final status
        .layer(axum::middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES));

    build_router().layer(middleware).with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
}

/// `?areaId=` filter shared by several endpoints; empty means absent
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaFilter {
    pub area_id: Option<String>,
}

impl AreaFilter {
    pub fn area_id(&self) -> Option<&str> {
        self.area_id.as_deref().filter(|id| !id.trim().is_empty())
    }
}

/// Decode an optional JSON body; an empty body decodes as `T::default()`
pub fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> AppResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        AppError::invalid_request("request body is not valid JSON").with_detail("cause", e.to_string())
    })
}
