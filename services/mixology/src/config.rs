/// Mixology service configuration loaded from environment variables.
#[derive(Debug)]
pub struct MixologyConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// HMAC secret for signing session tokens. Env var: `SESSION_SECRET`.
    pub session_secret: String,
    /// TCP port to listen on (default 3000). Env var: `MIXOLOGY_PORT`.
    pub port: u16,
    /// Upstream catalog API root. Env var: `CATALOG_BASE_URL`.
    pub catalog_base_url: String,
    /// Per-request upstream timeout in seconds (default 5). Env var: `CATALOG_TIMEOUT_SECS`.
    pub catalog_timeout_secs: u64,
    /// Cookie domain attribute; host-only cookie when unset.
    pub cookie_domain: Option<String>,
    /// Cookie `Secure` attribute (default true). Env var: `COOKIE_SECURE`.
    pub cookie_secure: bool,
}

const DEFAULT_CATALOG_BASE_URL: &str = "https://www.thecocktaildb.com/api/json/v1/1";

impl MixologyConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            session_secret: std::env::var("SESSION_SECRET").expect("SESSION_SECRET"),
            port: std::env::var("MIXOLOGY_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            catalog_base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_CATALOG_BASE_URL.to_owned()),
            catalog_timeout_secs: std::env::var("CATALOG_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            cookie_domain: std::env::var("COOKIE_DOMAIN")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}
