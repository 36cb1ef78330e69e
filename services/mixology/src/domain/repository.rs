#![allow(async_fn_in_trait)]

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::domain::normalize::{NormalizedDrink, RawDrinkRecord, ReferenceIndex};
use crate::domain::types::{
    Bookmark, BookmarkSortBy, BookmarkedDrink, DrinkDetail, DrinkFilter, DrinkSummary, Language,
    Reference, ReferenceKind, User, UserChanges,
};
use crate::error::MixologyError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MixologyError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, MixologyError>;
    async fn username_exists(&self, username: &str) -> Result<bool, MixologyError>;

    /// Insert a user. Returns `false` if the username is already taken.
    async fn create(&self, user: &User) -> Result<bool, MixologyError>;

    /// Apply profile changes. Fails with `DuplicateUsername` on a username
    /// collision and `UserNotFound` if the row is gone.
    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<(), MixologyError>;

    /// Delete a user and, by cascade, their bookmarks and authored drinks. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, MixologyError>;
}

/// Read-only access to the seeded languages.
pub trait LanguageRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Language>, MixologyError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Language>, MixologyError>;
}

/// Category, glass and ingredient lookup tables.
pub trait ReferenceRepository: Send + Sync {
    /// All rows of one kind, ordered by name.
    async fn list(&self, kind: ReferenceKind) -> Result<Vec<Reference>, MixologyError>;

    /// Existing rows for the given normalized names. Unknown names are absent from the index.
    async fn lookup(
        &self,
        names: &BTreeSet<(ReferenceKind, String)>,
    ) -> Result<ReferenceIndex, MixologyError>;
}

/// Counts reported by a drink save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub drink_id: i32,
    /// Reference rows this save inserted (rows another writer created first are not counted).
    pub references_created: u64,
}

/// Repository for drinks and their owned rows.
pub trait DrinkRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<DrinkDetail>, MixologyError>;
    async fn exists(&self, id: i32) -> Result<bool, MixologyError>;

    /// Drinks matching `filter`, ordered by name.
    async fn list(
        &self,
        filter: &DrinkFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<DrinkSummary>, MixologyError>;

    /// Persist a normalized drink in one transaction: create its pending
    /// references (reusing rows a concurrent writer created), upsert the drink
    /// row by id, and replace its instructions and ingredient lines.
    async fn save(&self, drink: &NormalizedDrink) -> Result<SaveReport, MixologyError>;

    /// Store a user-authored drink under a fresh id from the authored range,
    /// ignoring `drink.id`. Same transaction rules as [`Self::save`]; never
    /// overwrites an existing row.
    async fn create_authored(&self, drink: &NormalizedDrink) -> Result<SaveReport, MixologyError>;

    /// Delete a drink; instructions, ingredient lines and bookmarks cascade.
    /// Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, MixologyError>;
}

/// Repository for the user/drink bookmark ledger.
pub trait BookmarkRepository: Send + Sync {
    /// Insert a bookmark. Returns `false` if the pair already exists.
    async fn create(&self, bookmark: &Bookmark) -> Result<bool, MixologyError>;

    /// Delete a bookmark. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError>;

    async fn exists(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError>;

    async fn list_drinks(
        &self,
        user_id: Uuid,
        sort_by: BookmarkSortBy,
    ) -> Result<Vec<BookmarkedDrink>, MixologyError>;
}

/// Port for the upstream cocktail catalog.
///
/// Transport failures surface as `CatalogUnavailable`.
pub trait CatalogPort: Send + Sync {
    async fn search_by_name(&self, name: &str) -> Result<Vec<RawDrinkRecord>, MixologyError>;
    async fn lookup_by_id(&self, id: i32) -> Result<Option<RawDrinkRecord>, MixologyError>;
}

/// One-way password hashing.
pub trait CredentialStore: Send + Sync {
    fn hash(&self, raw_password: &str) -> Result<String, MixologyError>;

    /// Returns `false` on mismatch. Only an unreadable stored hash is an error.
    fn verify(&self, raw_password: &str, password_hash: &str) -> Result<bool, MixologyError>;
}
