//! HTTP API for the Lifeline emergency call log.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`POST /emergency-calls/`** to log a call attempt. Open to
//!   unauthenticated callers: an emergency call must always be recordable.
//! - **`GET /call-history/`** returning every logged call, newest first.
//! - **`GET /operator/call-history/`** the same history filtered by
//!   outcome and time window, for authenticated operators.
//! - **`GET /healthz`** for load balancer probes.
//!
//! # Request flow
//!
//! ```text
//! client -> handler -> CallPayload::from_json (decode + validation) -> CallStore -> database
//! ```
//!
//! Caller identity comes from the authentication gateway in front of the
//! service (see [`identity`]); it is never read from the request body.

pub mod error;
pub mod handlers;
pub mod identity;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use identity::{CallerIdentity, IDENTITY_HEADER};
pub use router::build_router;
pub use server::{ServerConfig, ServerError, serve, shutdown_signal, start_server};
pub use state::AppState;
