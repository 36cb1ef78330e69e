use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};

use crate::domain::types::CatalogPreview;
use crate::error::MixologyError;
use crate::state::AppState;
use crate::usecase::catalog::SearchCatalogUseCase;

#[derive(Serialize)]
pub struct CatalogPreviewResponse {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl From<CatalogPreview> for CatalogPreviewResponse {
    fn from(preview: CatalogPreview) -> Self {
        Self {
            id: preview.id,
            name: preview.name,
            image_url: preview.image_url,
            category: preview.category,
        }
    }
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub name: String,
}

// ── GET /search ──────────────────────────────────────────────────────────────

pub async fn search_catalog(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<CatalogPreviewResponse>>, MixologyError> {
    let usecase = SearchCatalogUseCase {
        catalog: state.catalog.clone(),
    };
    let previews = usecase.execute(&query.name).await?;
    Ok(Json(previews.into_iter().map(Into::into).collect()))
}
