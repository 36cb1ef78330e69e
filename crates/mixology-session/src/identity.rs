//! Session-cookie identity extractor.

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts, OptionalFromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use http::request::Parts;
use http::{HeaderMap, StatusCode};
use uuid::Uuid;

use crate::cookie::SESSION_COOKIE;
use crate::token::{SessionKey, validate_session_token};

/// Message shown for every operation attempted without a session.
pub const NOT_AUTHENTICATED_MESSAGE: &str = "you must be logged in to do this";

/// The user a request's session cookie resolves to.
///
/// As a plain extractor it rejects anonymous requests with [`NotAuthenticated`];
/// as `Option<SessionIdentity>` it never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity {
    pub user_id: Uuid,
}

/// Rejection for handlers that require a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotAuthenticated;

impl IntoResponse for NotAuthenticated {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "NOT_AUTHENTICATED",
            "message": NOT_AUTHENTICATED_MESSAGE,
        });
        (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
    }
}

/// Resolve the session cookie in `headers`, if any, to an identity.
///
/// Missing, expired, or forged cookies all resolve to `None`.
pub fn resolve_session(headers: &HeaderMap, key: &SessionKey) -> Option<SessionIdentity> {
    let jar = CookieJar::from_headers(headers);
    let token = jar.get(SESSION_COOKIE)?.value();
    if token.is_empty() {
        return None;
    }
    match validate_session_token(token, key) {
        Ok(user_id) => Some(SessionIdentity { user_id }),
        Err(e) => {
            tracing::debug!(error = %e, "ignoring unusable session cookie");
            None
        }
    }
}

impl<S> FromRequestParts<S> for SessionIdentity
where
    SessionKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = NotAuthenticated;

    // Resolve synchronously and hand back a 'static future so the returned
    // future does not borrow `parts`.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let identity = resolve_session(&parts.headers, &SessionKey::from_ref(state));
        async move { identity.ok_or(NotAuthenticated) }
    }
}

impl<S> OptionalFromRequestParts<S> for SessionIdentity
where
    SessionKey: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Option<Self>, Self::Rejection>> + Send {
        let identity = resolve_session(&parts.headers, &SessionKey::from_ref(state));
        async move { Ok(identity) }
    }
}
