use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use mixology_session::identity::SessionIdentity;

use crate::domain::types::{BookmarkSortBy, BookmarkedDrink};
use crate::error::MixologyError;
use crate::handlers::current_user;
use crate::handlers::drink::DrinkSummaryResponse;
use crate::state::AppState;
use crate::usecase::bookmark::{
    HasBookmarkUseCase, ListBookmarkedDrinksUseCase, ToggleBookmarkUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BookmarkedDrinkResponse {
    #[serde(flatten)]
    pub drink: DrinkSummaryResponse,
    #[serde(serialize_with = "mixology_core::serde::to_rfc3339_ms")]
    pub bookmarked_at: chrono::DateTime<chrono::Utc>,
}

impl From<BookmarkedDrink> for BookmarkedDrinkResponse {
    fn from(bookmarked: BookmarkedDrink) -> Self {
        Self {
            drink: bookmarked.drink.into(),
            bookmarked_at: bookmarked.bookmarked_at,
        }
    }
}

#[derive(Serialize)]
pub struct BookmarkStateResponse {
    pub drink_id: i32,
    pub bookmarked: bool,
}

// ── GET /bookmarks ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BookmarkListQuery {
    pub sort_by: Option<String>,
}

pub async fn get_bookmarks(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Query(query): Query<BookmarkListQuery>,
) -> Result<Json<Vec<BookmarkedDrinkResponse>>, MixologyError> {
    let user = current_user(&state, identity).await?;
    let sort_by = query
        .sort_by
        .as_deref()
        .and_then(BookmarkSortBy::from_kebab)
        .unwrap_or_default();
    let usecase = ListBookmarkedDrinksUseCase {
        bookmarks: state.bookmark_repo(),
    };
    let drinks = usecase.execute(user.id, sort_by).await?;
    Ok(Json(drinks.into_iter().map(Into::into).collect()))
}

// ── GET /bookmarks/{drink_id} ────────────────────────────────────────────────

pub async fn get_bookmark(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(drink_id): Path<i32>,
) -> Result<Json<BookmarkStateResponse>, MixologyError> {
    let user = current_user(&state, identity).await?;
    let usecase = HasBookmarkUseCase {
        bookmarks: state.bookmark_repo(),
    };
    let bookmarked = usecase.execute(user.id, drink_id).await?;
    Ok(Json(BookmarkStateResponse {
        drink_id,
        bookmarked,
    }))
}

// ── POST /bookmarks/{drink_id} ───────────────────────────────────────────────

pub async fn toggle_bookmark(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(drink_id): Path<i32>,
) -> Result<Json<BookmarkStateResponse>, MixologyError> {
    let user = current_user(&state, identity).await?;
    let usecase = ToggleBookmarkUseCase {
        bookmarks: state.bookmark_repo(),
        drinks: state.drink_repo(),
    };
    let outcome = usecase.execute(user.id, drink_id).await?;
    Ok(Json(BookmarkStateResponse {
        drink_id,
        bookmarked: outcome.bookmarked,
    }))
}
