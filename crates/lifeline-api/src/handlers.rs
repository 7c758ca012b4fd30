//! REST API endpoint handlers.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/emergency-calls/` | Log a call (open to anonymous callers) |
//! | `GET` | `/call-history/` | All calls, newest first |
//! | `GET` | `/operator/call-history/` | Calls filtered by outcome and time window |
//! | `GET` | `/healthz` | Store reachability probe |

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use lifeline_types::{CallFilter, CallPayload, EmergencyCall};
use serde_json::Value;

use crate::error::ApiError;
use crate::identity::CallerIdentity;
use crate::state::AppState;

/// Confirmation returned after a call has been logged.
pub const CREATED_MESSAGE: &str = "Emergency call logged successfully";

// ---------------------------------------------------------------------------
// POST /emergency-calls/ -- log a call
// ---------------------------------------------------------------------------

/// Validate the payload, attach the caller's identity if there is one,
/// and store the call.
///
/// The body is decoded as plain JSON first and then read field by field,
/// so a bad value is reported under its own key. Responds
/// `201 {"message": ...}` without echoing the record, or `400` with
/// field-level errors.
pub async fn create_call(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = body?;
    let payload = CallPayload::from_json(&body).map_err(ApiError::Validation)?;
    let new_call = payload.into_new_call(identity.user_id())?;
    state.store.create(&new_call).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": CREATED_MESSAGE })),
    ))
}

// ---------------------------------------------------------------------------
// GET /call-history/ -- list calls
// ---------------------------------------------------------------------------

/// Return every logged call, most recent first.
///
/// Public unless the deployment enables
/// [`AppState::history_requires_identity`].
pub async fn list_calls(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
) -> Result<Json<Vec<EmergencyCall>>, ApiError> {
    if state.history_requires_identity && !identity.is_authenticated() {
        return Err(ApiError::Unauthorized(String::from(
            "call history requires an authenticated caller",
        )));
    }

    let calls = state.store.list_all().await?;
    Ok(Json(calls))
}

// ---------------------------------------------------------------------------
// GET /operator/call-history/ -- filtered review
// ---------------------------------------------------------------------------

/// Operator review of the history. Always requires an authenticated
/// caller, whatever the public history policy is.
///
/// # Query Parameters
///
/// - `call_success`: `true` | `false` (default: both)
/// - `since`: RFC 3339 instant, inclusive
/// - `until`: RFC 3339 instant, exclusive
pub async fn list_operator_calls(
    State(state): State<Arc<AppState>>,
    identity: CallerIdentity,
    filter: Result<Query<CallFilter>, QueryRejection>,
) -> Result<Json<Vec<EmergencyCall>>, ApiError> {
    if !identity.is_authenticated() {
        return Err(ApiError::Unauthorized(String::from(
            "operator history requires an authenticated caller",
        )));
    }

    let Query(filter) = filter?;
    let inverted = filter
        .since
        .zip(filter.until)
        .is_some_and(|(since, until)| since > until);
    if inverted {
        return Err(ApiError::InvalidQuery(String::from(
            "`since` must not be later than `until`",
        )));
    }

    let calls = state.store.list_filtered(&filter).await?;
    Ok(Json(calls))
}

// ---------------------------------------------------------------------------
// GET /healthz -- liveness
// ---------------------------------------------------------------------------

/// Report whether the record store is reachable.
pub async fn healthz(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    state.store.ping().await.map_err(|e| {
        tracing::warn!(error = %e, backend = state.store.name(), "Health check failed");
        ApiError::Unavailable(String::from("record store unreachable"))
    })?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "store": state.store.name(),
    })))
}
