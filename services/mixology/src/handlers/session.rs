use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use mixology_session::cookie::{clear_session_cookie, set_session_cookie};
use mixology_session::identity::SessionIdentity;

use crate::error::MixologyError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::session::LoginUseCase;
use crate::usecase::user::AuthenticateUseCase;

// ── GET /session ─────────────────────────────────────────────────────────────

/// The current user, or `null` for anonymous requests.
pub async fn get_session(
    identity: Option<SessionIdentity>,
    State(state): State<AppState>,
) -> Result<Json<Option<UserResponse>>, MixologyError> {
    let user = state.session_gate().resolve(identity).await?;
    Ok(Json(user.map(UserResponse::from)))
}

// ── POST /session ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, MixologyError> {
    let usecase = LoginUseCase {
        authenticate: AuthenticateUseCase {
            users: state.user_repo(),
            credentials: state.credentials.clone(),
        },
        session_key: state.session_key.clone(),
        session_ttl_secs: state.session_ttl_secs,
    };
    let out = usecase.execute(&body.username, &body.password).await?;
    let jar = set_session_cookie(jar, out.token, &state.cookies);
    Ok((StatusCode::OK, jar, Json(UserResponse::from(out.user))))
}

// ── DELETE /session ──────────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_session_cookie(jar, &state.cookies);
    (StatusCode::NO_CONTENT, jar)
}
