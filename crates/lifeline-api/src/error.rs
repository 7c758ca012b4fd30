//! Error types for the call log API.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.
//!
//! Validation failures keep their field-level detail. Everything else is
//! reported as `{"error": ..., "status": ...}`.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lifeline_db::DbError;
use lifeline_types::{FieldErrors, NON_FIELD_ERRORS, ValidationErrors, field_errors};

/// Errors that can occur in the call log API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// One or more fields failed validation.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(FieldErrors),

    /// The request body was not valid JSON.
    #[error("malformed request body: {0}")]
    MalformedBody(String),

    /// The query string could not be parsed or is contradictory.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The endpoint requires an authenticated caller.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A backing service is unreachable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(field_errors(&errors))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::InvalidQuery(rejection.body_text())
    }
}

impl From<DbError> for ApiError {
    fn from(error: DbError) -> Self {
        match error {
            DbError::Validation(errors) => errors.into(),
            other => {
                tracing::error!(error = %other, "Record store failure");
                Self::Internal(String::from("database error"))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Validation(fields) => {
                return (StatusCode::BAD_REQUEST, Json(fields)).into_response();
            }
            Self::MalformedBody(msg) => {
                let fields = FieldErrors::from([(NON_FIELD_ERRORS.to_owned(), vec![msg])]);
                return (StatusCode::BAD_REQUEST, Json(fields)).into_response();
            }
            Self::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        let cases = [
            (ApiError::Validation(FieldErrors::new()), StatusCode::BAD_REQUEST),
            (ApiError::MalformedBody(String::from("x")), StatusCode::BAD_REQUEST),
            (ApiError::InvalidQuery(String::from("x")), StatusCode::BAD_REQUEST),
            (ApiError::Unauthorized(String::from("x")), StatusCode::UNAUTHORIZED),
            (ApiError::Unavailable(String::from("x")), StatusCode::SERVICE_UNAVAILABLE),
            (ApiError::Internal(String::from("x")), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn store_failures_hide_details() {
        let error = ApiError::from(DbError::Config(String::from("secret dsn")));
        assert!(matches!(error, ApiError::Internal(ref msg) if msg == "database error"));
    }

    #[test]
    fn store_validation_stays_a_client_error() {
        use lifeline_types::{NewEmergencyCall, Validate};

        let errors = NewEmergencyCall::new("").validate().err().unwrap_or_default();
        let error = ApiError::from(DbError::Validation(errors));
        assert!(matches!(error, ApiError::Validation(ref f) if f.contains_key("phone_number")));
    }
}
