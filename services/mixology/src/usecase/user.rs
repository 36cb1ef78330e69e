use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{
    BookmarkRepository, CredentialStore, LanguageRepository, UserRepository,
};
use crate::domain::types::{
    BookmarkSortBy, BookmarkedDrink, Language, User, UserChanges, validate_password,
    validate_username,
};
use crate::error::MixologyError;

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub username: String,
    pub password: String,
    pub language_id: i32,
}

pub struct RegisterUseCase<U: UserRepository, L: LanguageRepository, C: CredentialStore> {
    pub users: U,
    pub languages: L,
    pub credentials: C,
}

impl<U: UserRepository, L: LanguageRepository, C: CredentialStore> RegisterUseCase<U, L, C> {
    pub async fn execute(&self, input: RegisterInput) -> Result<User, MixologyError> {
        if !validate_username(&input.username) {
            return Err(MixologyError::InvalidUsername);
        }
        if !validate_password(&input.password) {
            return Err(MixologyError::InvalidPassword);
        }
        if self.languages.find_by_id(input.language_id).await?.is_none() {
            return Err(MixologyError::LanguageNotFound);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: input.username,
            password_hash: self.credentials.hash(&input.password)?,
            language_id: input.language_id,
            created_at: now,
            updated_at: now,
        };
        if !self.users.create(&user).await? {
            return Err(MixologyError::DuplicateUsername);
        }
        tracing::info!(user_id = %user.id, "registered user");
        Ok(user)
    }
}

// ── Authenticate ─────────────────────────────────────────────────────────────

pub struct AuthenticateUseCase<U: UserRepository, C: CredentialStore> {
    pub users: U,
    pub credentials: C,
}

impl<U: UserRepository, C: CredentialStore> AuthenticateUseCase<U, C> {
    /// `None` for an unknown username or a wrong password.
    pub async fn execute(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<User>, MixologyError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            return Ok(None);
        };
        if !self.credentials.verify(password, &user.password_hash)? {
            return Ok(None);
        }
        Ok(Some(user))
    }
}

// ── CheckUsernameAvailable ───────────────────────────────────────────────────

pub struct CheckUsernameAvailableUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> CheckUsernameAvailableUseCase<U> {
    /// `false` when the candidate is taken or breaks the username rule.
    pub async fn execute(&self, candidate: &str) -> Result<bool, MixologyError> {
        if !validate_username(candidate) {
            return Ok(false);
        }
        Ok(!self.users.username_exists(candidate).await?)
    }
}

// ── GetProfile ───────────────────────────────────────────────────────────────

pub struct Profile {
    pub user: User,
    pub language: Language,
    pub bookmarks: Vec<BookmarkedDrink>,
}

pub struct GetProfileUseCase<U: UserRepository, L: LanguageRepository, B: BookmarkRepository> {
    pub users: U,
    pub languages: L,
    pub bookmarks: B,
}

impl<U: UserRepository, L: LanguageRepository, B: BookmarkRepository> GetProfileUseCase<U, L, B> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Profile, MixologyError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(MixologyError::UserNotFound)?;
        let language = self
            .languages
            .find_by_id(user.language_id)
            .await?
            .ok_or(MixologyError::LanguageNotFound)?;
        let bookmarks = self
            .bookmarks
            .list_drinks(user_id, BookmarkSortBy::default())
            .await?;
        Ok(Profile {
            user,
            language,
            bookmarks,
        })
    }
}

// ── UpdateProfile ────────────────────────────────────────────────────────────

pub struct UpdateProfileInput {
    pub username: Option<String>,
    pub password: Option<String>,
    pub language_id: Option<i32>,
}

pub struct UpdateProfileUseCase<U: UserRepository, L: LanguageRepository, C: CredentialStore> {
    pub users: U,
    pub languages: L,
    pub credentials: C,
}

impl<U: UserRepository, L: LanguageRepository, C: CredentialStore> UpdateProfileUseCase<U, L, C> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<(), MixologyError> {
        if input.username.is_none() && input.password.is_none() && input.language_id.is_none() {
            return Err(MixologyError::MissingData);
        }
        if let Some(ref username) = input.username {
            if !validate_username(username) {
                return Err(MixologyError::InvalidUsername);
            }
        }
        let password_hash = match input.password {
            Some(ref password) if !validate_password(password) => {
                return Err(MixologyError::InvalidPassword);
            }
            Some(ref password) => Some(self.credentials.hash(password)?),
            None => None,
        };
        if let Some(language_id) = input.language_id {
            if self.languages.find_by_id(language_id).await?.is_none() {
                return Err(MixologyError::LanguageNotFound);
            }
        }
        self.users
            .update(
                user_id,
                &UserChanges {
                    username: input.username,
                    password_hash,
                    language_id: input.language_id,
                },
            )
            .await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    /// Delete the caller's own account. The handler passes the session identity,
    /// so a user can only ever delete themselves.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), MixologyError> {
        if !self.users.delete(user_id).await? {
            return Err(MixologyError::UserNotFound);
        }
        tracing::info!(user_id = %user_id, "deleted user");
        Ok(())
    }
}
