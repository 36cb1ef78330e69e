//! Session token issue and validation.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    get_current_timestamp,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Session lifetime in seconds (7 days). Also the cookie Max-Age.
pub const SESSION_TTL_SECS: u64 = 604800;

/// HMAC key pair derived from the configured session secret.
///
/// Cheap to clone; lives in application state and is pulled out by the
/// extractor through `FromRef`.
#[derive(Clone)]
pub struct SessionKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SessionKey {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl std::fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionKey(..)")
    }
}

/// Errors returned by [`validate_session_token`] and [`issue_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed session token")]
    Malformed,
    #[error("failed to sign session token: {0}")]
    Sign(#[source] jsonwebtoken::errors::Error),
}

/// Claims payload. `sub` is the user id; nothing else rides in the session.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: u64,
}

/// Sign a session token for `user_id`, valid for `ttl_secs` from now.
pub fn issue_session_token(
    user_id: Uuid,
    key: &SessionKey,
    ttl_secs: u64,
) -> Result<String, SessionError> {
    let claims = SessionClaims {
        sub: user_id.to_string(),
        exp: get_current_timestamp() + ttl_secs,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &key.encoding).map_err(SessionError::Sign)
}

/// Validate a session cookie value and return the user id it names.
///
/// HS256 only, `exp` and `sub` required, default 60s leeway.
pub fn validate_session_token(token: &str, key: &SessionKey) -> Result<Uuid, SessionError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(token, &key.decoding, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
            _ => SessionError::Malformed,
        }
    })?;

    data.claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)
}
