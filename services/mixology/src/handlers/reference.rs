use axum::{Json, extract::State};
use serde::Serialize;

use mixology_domain::text::title_case;

use crate::domain::types::{Language, Reference, ReferenceKind};
use crate::error::MixologyError;
use crate::state::AppState;
use crate::usecase::reference::{ListLanguagesUseCase, ListReferencesUseCase};

#[derive(Serialize)]
pub struct ReferenceResponse {
    pub id: i32,
    pub name: String,
}

impl From<Reference> for ReferenceResponse {
    fn from(reference: Reference) -> Self {
        Self {
            id: reference.id,
            name: title_case(&reference.name),
        }
    }
}

#[derive(Serialize)]
pub struct LanguageResponse {
    pub id: i32,
    pub code: String,
    pub name: String,
}

impl From<Language> for LanguageResponse {
    fn from(language: Language) -> Self {
        Self {
            id: language.id,
            code: language.code.as_str().to_owned(),
            name: language.name,
        }
    }
}

async fn list_references(
    state: &AppState,
    kind: ReferenceKind,
) -> Result<Json<Vec<ReferenceResponse>>, MixologyError> {
    let usecase = ListReferencesUseCase {
        references: state.reference_repo(),
    };
    let references = usecase.execute(kind).await?;
    Ok(Json(references.into_iter().map(Into::into).collect()))
}

// ── GET /languages ───────────────────────────────────────────────────────────

pub async fn get_languages(
    State(state): State<AppState>,
) -> Result<Json<Vec<LanguageResponse>>, MixologyError> {
    let usecase = ListLanguagesUseCase {
        languages: state.language_repo(),
    };
    let languages = usecase.execute().await?;
    Ok(Json(languages.into_iter().map(Into::into).collect()))
}

// ── GET /categories, /glasses, /ingredients ─────────────────────────────────

pub async fn get_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceResponse>>, MixologyError> {
    list_references(&state, ReferenceKind::Category).await
}

pub async fn get_glasses(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceResponse>>, MixologyError> {
    list_references(&state, ReferenceKind::Glass).await
}

pub async fn get_ingredients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ReferenceResponse>>, MixologyError> {
    list_references(&state, ReferenceKind::Ingredient).await
}
