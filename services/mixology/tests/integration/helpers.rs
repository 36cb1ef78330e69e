use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use argon2::Params;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use url::Url;
use uuid::Uuid;

use mixology::domain::normalize::{NormalizedDrink, RawDrinkRecord, RawId};
use mixology::domain::repository::{
    BookmarkRepository, CatalogPort, DrinkRepository, SaveReport,
};
use mixology::domain::types::{
    AUTHORED_ID_FLOOR, Bookmark, BookmarkSortBy, BookmarkedDrink, DrinkDetail, DrinkFilter,
    DrinkSummary,
};
use mixology::error::MixologyError;
use mixology::infra::catalog::HttpCatalogClient;
use mixology::infra::credential::Argon2CredentialStore;
use mixology::infra::db::{DbDrinkRepository, DbReferenceRepository};
use mixology::state::AppState;
use mixology::usecase::drink::IngestDrinkUseCase;
use mixology_migration::{Migrator, MigratorTrait};
use mixology_session::cookie::CookieSettings;
use mixology_session::token::{SESSION_TTL_SECS, SessionKey};
use mixology_testing::fixture::Fixture;

pub const TEST_SESSION_SECRET: &str = "integration-test-session-secret";
pub const MARGARITA_ID: i32 = 11007;

// ── Fixtures ─────────────────────────────────────────────────────────────────

/// The recorded upstream lookup for drink 11007.
pub fn margarita_record() -> RawDrinkRecord {
    let payload = Fixture::load("tests/fixtures/margarita.json");
    serde_json::from_value(payload["drinks"][0].clone()).unwrap()
}

/// A minimal upstream record built from JSON fields.
pub fn record(fields: Value) -> RawDrinkRecord {
    serde_json::from_value(fields).unwrap()
}

// ── Database ─────────────────────────────────────────────────────────────────

/// Fresh in-memory database with every migration applied.
///
/// One connection only, so every query sees the same in-memory database.
pub async fn sqlite_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn ingest(db: &DatabaseConnection) -> IngestDrinkUseCase<DbReferenceRepository, DbDrinkRepository> {
    IngestDrinkUseCase {
        references: DbReferenceRepository { db: db.clone() },
        drinks: DbDrinkRepository { db: db.clone() },
    }
}

pub fn fast_credentials() -> Argon2CredentialStore {
    let params = Params::new(
        Params::MIN_M_COST,
        Params::MIN_T_COST,
        Params::MIN_P_COST,
        None,
    )
    .unwrap();
    Argon2CredentialStore::new(params)
}

/// App state over `db`. The catalog points at a closed local port, so any
/// upstream call fails as unavailable.
pub fn test_state(db: DatabaseConnection) -> AppState {
    let catalog = HttpCatalogClient::new(
        Url::parse("http://127.0.0.1:9/api/").unwrap(),
        Duration::from_millis(500),
    )
    .unwrap();
    AppState {
        db,
        session_key: SessionKey::new(TEST_SESSION_SECRET),
        session_ttl_secs: SESSION_TTL_SECS,
        cookies: CookieSettings {
            domain: None,
            secure: false,
        },
        catalog,
        credentials: fast_credentials(),
    }
}

// ── Logging ──────────────────────────────────────────────────────────────────

/// Counts `WARN` events emitted by this service's own modules.
#[derive(Clone, Default)]
pub struct WarningCounter {
    count: Arc<AtomicUsize>,
}

impl WarningCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::WARN && meta.target().starts_with("mixology") {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

// ── StaticCatalog ────────────────────────────────────────────────────────────

/// Upstream catalog serving a fixed set of records, counting lookups.
#[derive(Clone)]
pub struct StaticCatalog {
    pub records: Vec<RawDrinkRecord>,
    pub lookups: Arc<AtomicUsize>,
}

impl StaticCatalog {
    pub fn new(records: Vec<RawDrinkRecord>) -> Self {
        Self {
            records,
            lookups: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl CatalogPort for StaticCatalog {
    async fn search_by_name(&self, name: &str) -> Result<Vec<RawDrinkRecord>, MixologyError> {
        let needle = name.to_lowercase();
        Ok(self
            .records
            .iter()
            .filter(|r| {
                r.name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect())
    }

    async fn lookup_by_id(&self, id: i32) -> Result<Option<RawDrinkRecord>, MixologyError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let id = id.to_string();
        Ok(self
            .records
            .iter()
            .find(|r| {
                matches!(&r.id, Some(RawId::Text(s)) if *s == id)
            })
            .cloned())
    }
}

/// Upstream catalog that is always down.
#[derive(Clone)]
pub struct DownCatalog;

impl CatalogPort for DownCatalog {
    async fn search_by_name(&self, _name: &str) -> Result<Vec<RawDrinkRecord>, MixologyError> {
        Err(MixologyError::CatalogUnavailable)
    }

    async fn lookup_by_id(&self, _id: i32) -> Result<Option<RawDrinkRecord>, MixologyError> {
        Err(MixologyError::CatalogUnavailable)
    }
}

// ── MockBookmarkRepo ─────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockBookmarkRepo {
    pub rows: Arc<Mutex<Vec<Bookmark>>>,
    /// Simulates a concurrent writer: every insert finds the pair already present.
    pub lose_insert_race: bool,
}

impl MockBookmarkRepo {
    pub fn racing() -> Self {
        Self {
            lose_insert_race: true,
            ..Self::default()
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

impl BookmarkRepository for MockBookmarkRepo {
    async fn create(&self, bookmark: &Bookmark) -> Result<bool, MixologyError> {
        if self.lose_insert_race {
            return Ok(false);
        }
        let mut rows = self.rows.lock().unwrap();
        if rows
            .iter()
            .any(|b| b.user_id == bookmark.user_id && b.drink_id == bookmark.drink_id)
        {
            return Ok(false);
        }
        rows.push(bookmark.clone());
        Ok(true)
    }

    async fn delete(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| !(b.user_id == user_id && b.drink_id == drink_id));
        Ok(rows.len() < before)
    }

    async fn exists(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .any(|b| b.user_id == user_id && b.drink_id == drink_id))
    }

    async fn list_drinks(
        &self,
        _user_id: Uuid,
        _sort_by: BookmarkSortBy,
    ) -> Result<Vec<BookmarkedDrink>, MixologyError> {
        Ok(vec![])
    }
}

// ── MockDrinkRepo ────────────────────────────────────────────────────────────

/// Drink store that only knows which ids exist.
#[derive(Clone, Default)]
pub struct MockDrinkRepo {
    pub ids: Vec<i32>,
}

impl MockDrinkRepo {
    pub fn with_ids(ids: &[i32]) -> Self {
        Self { ids: ids.to_vec() }
    }
}

impl DrinkRepository for MockDrinkRepo {
    async fn find_by_id(&self, _id: i32) -> Result<Option<DrinkDetail>, MixologyError> {
        Ok(None)
    }

    async fn exists(&self, id: i32) -> Result<bool, MixologyError> {
        Ok(self.ids.contains(&id))
    }

    async fn list(
        &self,
        _filter: &DrinkFilter,
        _offset: u64,
        _limit: u64,
    ) -> Result<Vec<DrinkSummary>, MixologyError> {
        Ok(vec![])
    }

    async fn save(&self, drink: &NormalizedDrink) -> Result<SaveReport, MixologyError> {
        Ok(SaveReport {
            drink_id: drink.id,
            references_created: 0,
        })
    }

    async fn create_authored(&self, _drink: &NormalizedDrink) -> Result<SaveReport, MixologyError> {
        Ok(SaveReport {
            drink_id: AUTHORED_ID_FLOOR,
            references_created: 0,
        })
    }

    async fn delete(&self, id: i32) -> Result<bool, MixologyError> {
        Ok(self.ids.contains(&id))
    }
}
