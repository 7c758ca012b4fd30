//! Caller identity resolved from the request's authentication context.
//!
//! Authentication happens upstream: the gateway in front of this service
//! verifies the caller and forwards the account UUID in
//! [`IDENTITY_HEADER`]. A missing header means an anonymous caller. A
//! malformed one is logged and also treated as anonymous, since logging an
//! emergency call must never fail on identity.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lifeline_types::UserId;

/// Header carrying the authenticated account UUID.
pub const IDENTITY_HEADER: &str = "x-authenticated-user";

/// Who is making the request, as far as this service can tell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallerIdentity(Option<UserId>);

impl CallerIdentity {
    /// An unauthenticated caller.
    pub const fn anonymous() -> Self {
        Self(None)
    }

    /// A caller authenticated as `user`.
    pub const fn user(user: UserId) -> Self {
        Self(Some(user))
    }

    /// The authenticated account, if any.
    pub const fn user_id(self) -> Option<UserId> {
        self.0
    }

    /// Whether the caller is authenticated.
    pub const fn is_authenticated(self) -> bool {
        self.0.is_some()
    }

    /// Resolve the identity from request headers.
    pub fn from_headers(headers: &axum::http::HeaderMap) -> Self {
        let Some(raw) = headers.get(IDENTITY_HEADER) else {
            return Self::anonymous();
        };

        match raw.to_str().map(str::trim).map(str::parse::<UserId>) {
            Ok(Ok(user)) => Self::user(user),
            _ => {
                tracing::warn!(
                    header = IDENTITY_HEADER,
                    "Ignoring malformed identity header; treating caller as anonymous"
                );
                Self::anonymous()
            }
        }
    }
}

impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}
