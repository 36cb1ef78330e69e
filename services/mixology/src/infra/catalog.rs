//! Reqwest-backed client for the upstream cocktail catalog.
//!
//! Only transport concerns live here. Records come back raw and are
//! normalized by the ingest use case.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::domain::normalize::RawDrinkRecord;
use crate::domain::repository::CatalogPort;
use crate::error::MixologyError;

#[derive(Clone)]
pub struct HttpCatalogClient {
    client: Client,
    base_url: Url,
}

impl HttpCatalogClient {
    /// `base_url` is the API root, e.g. `https://www.thecocktaildb.com/api/json/v1/1`.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, file: &str, key: &str, value: &str) -> Result<Url, MixologyError> {
        let mut url = self
            .base_url
            .join(file)
            .map_err(|e| anyhow::anyhow!("build catalog url: {e}"))?;
        url.query_pairs_mut().append_pair(key, value);
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<Vec<RawDrinkRecord>, MixologyError> {
        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| unavailable(&url, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = %status, "catalog returned an error status");
            return Err(MixologyError::CatalogUnavailable);
        }

        let body: Value = response.json().await.map_err(|e| unavailable(&url, &e))?;
        Ok(parse_records(body))
    }
}

fn unavailable(url: &Url, error: &reqwest::Error) -> MixologyError {
    tracing::warn!(url = %url, error = %error, "catalog request failed");
    MixologyError::CatalogUnavailable
}

/// Extract records from a catalog payload.
///
/// The catalog answers "no match" with `"drinks": null` or a string, so
/// anything other than an array yields no records. Entries that are not
/// objects are skipped.
fn parse_records(body: Value) -> Vec<RawDrinkRecord> {
    let Value::Object(mut payload) = body else {
        return Vec::new();
    };
    let Some(Value::Array(items)) = payload.remove("drinks") else {
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping undecodable catalog entry");
                None
            }
        })
        .collect()
}

impl CatalogPort for HttpCatalogClient {
    async fn search_by_name(&self, name: &str) -> Result<Vec<RawDrinkRecord>, MixologyError> {
        let url = self.endpoint("search.php", "s", name)?;
        self.fetch(url).await
    }

    async fn lookup_by_id(&self, id: i32) -> Result<Option<RawDrinkRecord>, MixologyError> {
        let url = self.endpoint("lookup.php", "i", &id.to_string())?;
        Ok(self.fetch(url).await?.into_iter().next())
    }
}
