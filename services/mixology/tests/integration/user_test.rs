use sea_orm::DatabaseConnection;

use mixology::error::MixologyError;
use mixology::infra::credential::Argon2CredentialStore;
use mixology::infra::db::{DbBookmarkRepository, DbLanguageRepository, DbUserRepository};
use mixology::usecase::session::{LoginUseCase, SessionGate};
use mixology::usecase::user::{
    AuthenticateUseCase, CheckUsernameAvailableUseCase, DeleteUserUseCase, GetProfileUseCase,
    RegisterInput, RegisterUseCase, UpdateProfileInput, UpdateProfileUseCase,
};
use mixology::domain::types::User;
use mixology_domain::language::LanguageCode;
use mixology_session::identity::SessionIdentity;
use mixology_session::token::{SESSION_TTL_SECS, SessionKey, validate_session_token};

use crate::helpers::{TEST_SESSION_SECRET, fast_credentials, sqlite_db};

fn register(
    db: &DatabaseConnection,
) -> RegisterUseCase<DbUserRepository, DbLanguageRepository, Argon2CredentialStore> {
    RegisterUseCase {
        users: DbUserRepository { db: db.clone() },
        languages: DbLanguageRepository { db: db.clone() },
        credentials: fast_credentials(),
    }
}

fn update(
    db: &DatabaseConnection,
) -> UpdateProfileUseCase<DbUserRepository, DbLanguageRepository, Argon2CredentialStore> {
    UpdateProfileUseCase {
        users: DbUserRepository { db: db.clone() },
        languages: DbLanguageRepository { db: db.clone() },
        credentials: fast_credentials(),
    }
}

fn authenticate(db: &DatabaseConnection) -> AuthenticateUseCase<DbUserRepository, Argon2CredentialStore> {
    AuthenticateUseCase {
        users: DbUserRepository { db: db.clone() },
        credentials: fast_credentials(),
    }
}

async fn register_user(db: &DatabaseConnection, username: &str, password: &str) -> User {
    register(db)
        .execute(RegisterInput {
            username: username.to_owned(),
            password: password.to_owned(),
            language_id: 1,
        })
        .await
        .unwrap()
}

fn no_changes() -> UpdateProfileInput {
    UpdateProfileInput {
        username: None,
        password: None,
        language_id: None,
    }
}

// ── Register / Authenticate ──────────────────────────────────────────────────

#[tokio::test]
async fn should_register_and_authenticate_with_argon2_hash() {
    let db = sqlite_db().await;

    let user = register_user(&db, "alice", "pw1pw1").await;

    assert!(user.password_hash.starts_with("$argon2id$"));
    let authenticated = authenticate(&db)
        .execute("alice", "pw1pw1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(authenticated.id, user.id);
    assert!(authenticate(&db).execute("alice", "pw2pw2").await.unwrap().is_none());
    assert!(authenticate(&db).execute("nobody", "pw1pw1").await.unwrap().is_none());
}

#[tokio::test]
async fn should_reject_duplicate_registration() {
    let db = sqlite_db().await;
    register_user(&db, "alice", "pw1pw1").await;

    let err = register(&db)
        .execute(RegisterInput {
            username: "alice".to_owned(),
            password: "another".to_owned(),
            language_id: 2,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, MixologyError::DuplicateUsername), "got {err:?}");
    // The first password still works.
    assert!(authenticate(&db).execute("alice", "pw1pw1").await.unwrap().is_some());
}

#[tokio::test]
async fn should_reject_unknown_language_on_registration() {
    let db = sqlite_db().await;

    let err = register(&db)
        .execute(RegisterInput {
            username: "alice".to_owned(),
            password: "pw1pw1".to_owned(),
            language_id: 8,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, MixologyError::LanguageNotFound), "got {err:?}");
}

#[tokio::test]
async fn should_report_username_availability_from_database() {
    let db = sqlite_db().await;
    register_user(&db, "alice", "pw1pw1").await;
    let check = CheckUsernameAvailableUseCase {
        users: DbUserRepository { db: db.clone() },
    };

    assert!(!check.execute("alice").await.unwrap());
    assert!(check.execute("bob").await.unwrap());
    assert!(!check.execute("no spaces").await.unwrap());
}

// ── Profile ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_refuse_renaming_onto_taken_username() {
    let db = sqlite_db().await;
    register_user(&db, "alice", "pw1pw1").await;
    let bob = register_user(&db, "bob", "pw1pw1").await;

    let err = update(&db)
        .execute(
            bob.id,
            UpdateProfileInput {
                username: Some("alice".to_owned()),
                ..no_changes()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MixologyError::DuplicateUsername), "got {err:?}");
}

#[tokio::test]
async fn should_show_updated_language_and_password_on_profile() {
    let db = sqlite_db().await;
    let alice = register_user(&db, "alice", "pw1pw1").await;

    update(&db)
        .execute(
            alice.id,
            UpdateProfileInput {
                password: Some("new-secret".to_owned()),
                language_id: Some(2),
                ..no_changes()
            },
        )
        .await
        .unwrap();

    let profile = GetProfileUseCase {
        users: DbUserRepository { db: db.clone() },
        languages: DbLanguageRepository { db: db.clone() },
        bookmarks: DbBookmarkRepository { db: db.clone() },
    }
    .execute(alice.id)
    .await
    .unwrap();
    assert_eq!(profile.language.code, LanguageCode::De);
    assert!(profile.bookmarks.is_empty());
    assert!(authenticate(&db).execute("alice", "pw1pw1").await.unwrap().is_none());
    assert!(authenticate(&db).execute("alice", "new-secret").await.unwrap().is_some());
}

#[tokio::test]
async fn should_reject_unknown_language_on_update() {
    let db = sqlite_db().await;
    let alice = register_user(&db, "alice", "pw1pw1").await;

    let err = update(&db)
        .execute(
            alice.id,
            UpdateProfileInput {
                language_id: Some(99),
                ..no_changes()
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, MixologyError::LanguageNotFound), "got {err:?}");
}

// ── Sessions ─────────────────────────────────────────────────────────────────

fn login(db: &DatabaseConnection) -> LoginUseCase<DbUserRepository, Argon2CredentialStore> {
    LoginUseCase {
        authenticate: authenticate(db),
        session_key: SessionKey::new(TEST_SESSION_SECRET),
        session_ttl_secs: SESSION_TTL_SECS,
    }
}

#[tokio::test]
async fn should_open_session_for_registered_user() {
    let db = sqlite_db().await;
    let alice = register_user(&db, "alice", "pw1pw1").await;

    let out = login(&db).execute("alice", "pw1pw1").await.unwrap();

    let user_id =
        validate_session_token(&out.token, &SessionKey::new(TEST_SESSION_SECRET)).unwrap();
    assert_eq!(user_id, alice.id);
}

#[tokio::test]
async fn should_reject_login_with_wrong_password() {
    let db = sqlite_db().await;
    register_user(&db, "alice", "pw1pw1").await;

    let result = login(&db).execute("alice", "wrong-pw").await;

    assert!(matches!(result, Err(MixologyError::InvalidCredentials)));
}

#[tokio::test]
async fn should_close_gate_for_deleted_user_session() {
    let db = sqlite_db().await;
    let alice = register_user(&db, "alice", "pw1pw1").await;
    let gate = SessionGate {
        users: DbUserRepository { db: db.clone() },
    };
    let identity = SessionIdentity { user_id: alice.id };
    assert_eq!(gate.require(Some(identity)).await.unwrap().id, alice.id);

    DeleteUserUseCase {
        users: DbUserRepository { db: db.clone() },
    }
    .execute(alice.id)
    .await
    .unwrap();

    assert!(gate.resolve(Some(identity)).await.unwrap().is_none());
    let err = gate.require(Some(identity)).await.unwrap_err();
    assert!(matches!(err, MixologyError::NotAuthenticated), "got {err:?}");
}
