use axum::extract::FromRef;
use sea_orm::DatabaseConnection;

use mixology_session::cookie::CookieSettings;
use mixology_session::token::SessionKey;

use crate::infra::catalog::HttpCatalogClient;
use crate::infra::credential::Argon2CredentialStore;
use crate::infra::db::{
    DbBookmarkRepository, DbDrinkRepository, DbLanguageRepository, DbReferenceRepository,
    DbUserRepository,
};
use crate::usecase::drink::IngestDrinkUseCase;
use crate::usecase::session::SessionGate;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub session_key: SessionKey,
    pub session_ttl_secs: u64,
    pub cookies: CookieSettings,
    pub catalog: HttpCatalogClient,
    pub credentials: Argon2CredentialStore,
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn language_repo(&self) -> DbLanguageRepository {
        DbLanguageRepository {
            db: self.db.clone(),
        }
    }

    pub fn reference_repo(&self) -> DbReferenceRepository {
        DbReferenceRepository {
            db: self.db.clone(),
        }
    }

    pub fn drink_repo(&self) -> DbDrinkRepository {
        DbDrinkRepository {
            db: self.db.clone(),
        }
    }

    pub fn bookmark_repo(&self) -> DbBookmarkRepository {
        DbBookmarkRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_gate(&self) -> SessionGate<DbUserRepository> {
        SessionGate {
            users: self.user_repo(),
        }
    }

    pub fn ingest(&self) -> IngestDrinkUseCase<DbReferenceRepository, DbDrinkRepository> {
        IngestDrinkUseCase {
            references: self.reference_repo(),
            drinks: self.drink_repo(),
        }
    }
}
