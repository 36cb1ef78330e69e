use mixology_session::identity::SessionIdentity;
use mixology_session::token::{SessionKey, issue_session_token};

use crate::domain::repository::{CredentialStore, UserRepository};
use crate::domain::types::User;
use crate::error::MixologyError;
use crate::usecase::user::AuthenticateUseCase;

// ── SessionGate ──────────────────────────────────────────────────────────────

/// Resolves a request's session identity to a live user.
///
/// A validly signed session whose user has since been deleted counts as no
/// session at all.
pub struct SessionGate<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> SessionGate<U> {
    /// The session's user, or `None` for anonymous requests.
    pub async fn resolve(
        &self,
        identity: Option<SessionIdentity>,
    ) -> Result<Option<User>, MixologyError> {
        match identity {
            Some(identity) => self.users.find_by_id(identity.user_id).await,
            None => Ok(None),
        }
    }

    /// The session's user; `NotAuthenticated` for anonymous requests.
    pub async fn require(
        &self,
        identity: Option<SessionIdentity>,
    ) -> Result<User, MixologyError> {
        self.resolve(identity)
            .await?
            .ok_or(MixologyError::NotAuthenticated)
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginOutput {
    pub user: User,
    pub token: String,
}

pub struct LoginUseCase<U: UserRepository, C: CredentialStore> {
    pub authenticate: AuthenticateUseCase<U, C>,
    pub session_key: SessionKey,
    pub session_ttl_secs: u64,
}

impl<U: UserRepository, C: CredentialStore> LoginUseCase<U, C> {
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<LoginOutput, MixologyError> {
        let user = self
            .authenticate
            .execute(username, password)
            .await?
            .ok_or(MixologyError::InvalidCredentials)?;
        let token = open_session(&user, &self.session_key, self.session_ttl_secs)?;
        Ok(LoginOutput { user, token })
    }
}

/// Sign a session token for `user`.
pub fn open_session(user: &User, key: &SessionKey, ttl_secs: u64) -> Result<String, MixologyError> {
    issue_session_token(user.id, key, ttl_secs)
        .map_err(|e| MixologyError::Internal(anyhow::Error::new(e).context("sign session token")))
}
