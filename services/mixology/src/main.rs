use std::time::Duration;

use argon2::Params;
use sea_orm::Database;
use tracing::info;
use url::Url;

use mixology::config::MixologyConfig;
use mixology::infra::catalog::HttpCatalogClient;
use mixology::infra::credential::Argon2CredentialStore;
use mixology::router::build_router;
use mixology::state::AppState;
use mixology_core::tracing::init_tracing;
use mixology_session::cookie::CookieSettings;
use mixology_session::token::{SESSION_TTL_SECS, SessionKey};

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = MixologyConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let catalog_base_url = Url::parse(&config.catalog_base_url).expect("invalid CATALOG_BASE_URL");
    let catalog = HttpCatalogClient::new(
        catalog_base_url,
        Duration::from_secs(config.catalog_timeout_secs),
    )
    .expect("failed to build catalog client");

    let state = AppState {
        db,
        session_key: SessionKey::new(&config.session_secret),
        session_ttl_secs: SESSION_TTL_SECS,
        cookies: CookieSettings {
            domain: config.cookie_domain,
            secure: config.cookie_secure,
        },
        catalog,
        credentials: Argon2CredentialStore::new(Params::default()),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("mixology service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
