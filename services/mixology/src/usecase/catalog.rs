use crate::domain::repository::CatalogPort;
use crate::domain::types::CatalogPreview;
use crate::error::MixologyError;

// ── SearchCatalog ────────────────────────────────────────────────────────────

pub struct SearchCatalogUseCase<C: CatalogPort> {
    pub catalog: C,
}

impl<C: CatalogPort> SearchCatalogUseCase<C> {
    /// Search upstream by name. Nothing is persisted; records without an id
    /// or name are skipped.
    pub async fn execute(&self, name: &str) -> Result<Vec<CatalogPreview>, MixologyError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MixologyError::MissingData);
        }
        let records = self.catalog.search_by_name(name).await?;
        let previews = records
            .iter()
            .filter_map(|record| match record.preview() {
                Ok(preview) => Some(preview),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping malformed catalog record");
                    None
                }
            })
            .collect();
        Ok(previews)
    }
}
