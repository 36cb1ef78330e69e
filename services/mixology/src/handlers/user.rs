use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use mixology_session::cookie::{clear_session_cookie, set_session_cookie};
use mixology_session::identity::SessionIdentity;

use crate::domain::types::User;
use crate::error::MixologyError;
use crate::handlers::bookmark::BookmarkedDrinkResponse;
use crate::handlers::current_user;
use crate::handlers::reference::LanguageResponse;
use crate::state::AppState;
use crate::usecase::session::open_session;
use crate::usecase::user::{
    CheckUsernameAvailableUseCase, DeleteUserUseCase, GetProfileUseCase, RegisterInput,
    RegisterUseCase, UpdateProfileInput, UpdateProfileUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub language_id: i32,
    #[serde(serialize_with = "mixology_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "mixology_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username,
            language_id: user.language_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub language_id: i32,
}

pub async fn create_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, MixologyError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        languages: state.language_repo(),
        credentials: state.credentials.clone(),
    };
    let user = usecase
        .execute(RegisterInput {
            username: body.username,
            password: body.password,
            language_id: body.language_id,
        })
        .await?;

    let token = open_session(&user, &state.session_key, state.session_ttl_secs)?;
    let jar = set_session_cookie(jar, token, &state.cookies);
    Ok((StatusCode::CREATED, jar, Json(UserResponse::from(user))))
}

// ── GET /users/available ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UsernameQuery {
    #[serde(default)]
    pub username: String,
}

#[derive(Serialize)]
pub struct UsernameAvailabilityResponse {
    pub username: String,
    pub available: bool,
}

pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameQuery>,
) -> Result<Json<UsernameAvailabilityResponse>, MixologyError> {
    let usecase = CheckUsernameAvailableUseCase {
        users: state.user_repo(),
    };
    let available = usecase.execute(&query.username).await?;
    Ok(Json(UsernameAvailabilityResponse {
        username: query.username,
        available,
    }))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ProfileResponse {
    pub id: String,
    pub username: String,
    pub language: LanguageResponse,
    pub bookmarks: Vec<BookmarkedDrinkResponse>,
    #[serde(serialize_with = "mixology_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub async fn get_me(
    identity: SessionIdentity,
    State(state): State<AppState>,
) -> Result<Json<ProfileResponse>, MixologyError> {
    let user = current_user(&state, identity).await?;
    let usecase = GetProfileUseCase {
        users: state.user_repo(),
        languages: state.language_repo(),
        bookmarks: state.bookmark_repo(),
    };
    let profile = usecase.execute(user.id).await?;
    Ok(Json(ProfileResponse {
        id: profile.user.id.to_string(),
        username: profile.user.username,
        language: profile.language.into(),
        bookmarks: profile.bookmarks.into_iter().map(Into::into).collect(),
        created_at: profile.user.created_at,
    }))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub language_id: Option<i32>,
}

pub async fn update_me(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, MixologyError> {
    let user = current_user(&state, identity).await?;
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
        languages: state.language_repo(),
        credentials: state.credentials.clone(),
    };
    usecase
        .execute(
            user.id,
            UpdateProfileInput {
                username: body.username,
                password: body.password,
                language_id: body.language_id,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/@me ────────────────────────────────────────────────────────

pub async fn delete_me(
    identity: SessionIdentity,
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, MixologyError> {
    let user = current_user(&state, identity).await?;
    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(user.id).await?;
    let jar = clear_session_cookie(jar, &state.cookies);
    Ok((StatusCode::NO_CONTENT, jar))
}
