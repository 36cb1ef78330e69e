use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{BookmarkRepository, DrinkRepository};
use crate::domain::types::{Bookmark, BookmarkSortBy, BookmarkState, BookmarkedDrink};
use crate::error::MixologyError;

// ── ToggleBookmark ───────────────────────────────────────────────────────────

pub struct ToggleBookmarkUseCase<B: BookmarkRepository, D: DrinkRepository> {
    pub bookmarks: B,
    pub drinks: D,
}

impl<B: BookmarkRepository, D: DrinkRepository> ToggleBookmarkUseCase<B, D> {
    /// Remove the bookmark if present, otherwise add it.
    ///
    /// The composite key arbitrates races: if the insert finds the pair
    /// already present, another request bookmarked it between our delete and
    /// insert, and the caller gets `BookmarkConflict` to re-read state.
    pub async fn execute(
        &self,
        user_id: Uuid,
        drink_id: i32,
    ) -> Result<BookmarkState, MixologyError> {
        if !self.drinks.exists(drink_id).await? {
            return Err(MixologyError::DrinkNotFound);
        }
        if self.bookmarks.delete(user_id, drink_id).await? {
            return Ok(BookmarkState { bookmarked: false });
        }
        let bookmark = Bookmark {
            user_id,
            drink_id,
            created_at: Utc::now(),
        };
        if !self.bookmarks.create(&bookmark).await? {
            return Err(MixologyError::BookmarkConflict);
        }
        Ok(BookmarkState { bookmarked: true })
    }
}

// ── HasBookmark ──────────────────────────────────────────────────────────────

pub struct HasBookmarkUseCase<B: BookmarkRepository> {
    pub bookmarks: B,
}

impl<B: BookmarkRepository> HasBookmarkUseCase<B> {
    pub async fn execute(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError> {
        self.bookmarks.exists(user_id, drink_id).await
    }
}

// ── ListBookmarkedDrinks ─────────────────────────────────────────────────────

pub struct ListBookmarkedDrinksUseCase<B: BookmarkRepository> {
    pub bookmarks: B,
}

impl<B: BookmarkRepository> ListBookmarkedDrinksUseCase<B> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        sort_by: BookmarkSortBy,
    ) -> Result<Vec<BookmarkedDrink>, MixologyError> {
        self.bookmarks.list_drinks(user_id, sort_by).await
    }
}
