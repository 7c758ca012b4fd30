//! Axum router construction for the call log API.
//!
//! Assembles all routes into a single [`Router`] with CORS and HTTP
//! tracing middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router.
///
/// The router includes:
/// - `POST /emergency-calls/` -- log a call
/// - `GET /call-history/` -- list calls, newest first
/// - `GET /operator/call-history/` -- filtered review for authenticated operators
/// - `GET /healthz` -- store reachability
///
/// The call and history routes are also reachable without the trailing slash.
/// CORS allows any origin so browser and mobile clients can post calls
/// directly.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/emergency-calls/", post(handlers::create_call))
        .route("/emergency-calls", post(handlers::create_call))
        .route("/call-history/", get(handlers::list_calls))
        .route("/call-history", get(handlers::list_calls))
        .route("/operator/call-history/", get(handlers::list_operator_calls))
        .route("/operator/call-history", get(handlers::list_operator_calls))
        .route("/healthz", get(handlers::healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
