//! Session helpers for router-level tests.
//!
//! Mints a real signed session cookie for a given user id so requests go
//! through the same extractor path as production traffic.

use axum::http::{HeaderMap, HeaderValue, header};
use mixology_session::cookie::SESSION_COOKIE;
use mixology_session::token::{SESSION_TTL_SECS, SessionKey, issue_session_token};
use uuid::Uuid;

/// A logged-in user, as seen by the router.
pub struct MockSession {
    pub user_id: Uuid,
    token: String,
}

impl MockSession {
    /// Sign a session for `user_id` with the same secret the app under test uses.
    pub fn new(user_id: Uuid, secret: &str) -> Self {
        let token = issue_session_token(user_id, &SessionKey::new(secret), SESSION_TTL_SECS)
            .expect("test session token should sign");
        Self { user_id, token }
    }

    /// `Cookie` header value carrying the session.
    pub fn cookie(&self) -> HeaderValue {
        HeaderValue::from_str(&format!("{SESSION_COOKIE}={}", self.token))
            .expect("session cookie should be a valid header value")
    }

    /// Headers to merge into a test request.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(header::COOKIE, self.cookie());
        map
    }
}
