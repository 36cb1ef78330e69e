use axum::{
    Json,
    extract::{Path, RawQuery, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mixology_domain::pagination::PageRequest;
use mixology_domain::text::title_case;
use mixology_session::identity::SessionIdentity;

use crate::domain::types::{
    DraftIngredient, DrinkDetail, DrinkDraft, DrinkDraftChanges, DrinkFilter, DrinkSummary,
};
use crate::error::MixologyError;
use crate::handlers::current_user;
use crate::state::AppState;
use crate::usecase::bookmark::HasBookmarkUseCase;
use crate::usecase::drink::{
    CreateDrinkUseCase, DeleteDrinkUseCase, GetDrinkUseCase, ListDrinksUseCase,
    RefreshDrinkUseCase, UpdateDrinkUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DrinkSummaryResponse {
    pub id: i32,
    pub name: String,
    /// Present only for user-authored drinks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    pub image_url: Option<String>,
    pub image_attribution: Option<String>,
    pub alcoholic: bool,
    pub optional_alc: bool,
    pub category: Option<String>,
    pub category_id: Option<i32>,
    pub glass: Option<String>,
    pub glass_id: Option<i32>,
}

impl From<DrinkSummary> for DrinkSummaryResponse {
    fn from(drink: DrinkSummary) -> Self {
        Self {
            id: drink.id,
            name: drink.name,
            author_id: drink.author_id.map(|id| id.to_string()),
            image_url: drink.image_url,
            image_attribution: drink.image_attribution,
            alcoholic: drink.alcoholic,
            optional_alc: drink.optional_alc,
            category: drink.category.as_ref().map(|c| title_case(&c.name)),
            category_id: drink.category.map(|c| c.id),
            glass: drink.glass.as_ref().map(|g| title_case(&g.name)),
            glass_id: drink.glass.map(|g| g.id),
        }
    }
}

#[derive(Serialize)]
pub struct InstructionResponse {
    pub language: String,
    pub text: String,
}

#[derive(Serialize)]
pub struct IngredientLineResponse {
    pub id: i32,
    pub name: String,
    pub measure: Option<String>,
}

#[derive(Serialize)]
pub struct DrinkDetailResponse {
    #[serde(flatten)]
    pub drink: DrinkSummaryResponse,
    pub video_url: Option<String>,
    pub video_id: Option<String>,
    pub instructions: Vec<InstructionResponse>,
    pub ingredients: Vec<IngredientLineResponse>,
    /// Present only for logged-in requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bookmarked: Option<bool>,
}

impl DrinkDetailResponse {
    fn new(detail: DrinkDetail, bookmarked: Option<bool>) -> Self {
        let video_id = detail.drink.video_id();
        let video_url = detail.drink.video_url.clone();
        Self {
            drink: detail.drink.into(),
            video_url,
            video_id,
            instructions: detail
                .instructions
                .into_iter()
                .map(|i| InstructionResponse {
                    language: i.language.as_str().to_owned(),
                    text: i.text,
                })
                .collect(),
            ingredients: detail
                .ingredients
                .into_iter()
                .map(|line| IngredientLineResponse {
                    id: line.ingredient.id,
                    name: title_case(&line.ingredient.name),
                    measure: line.measure,
                })
                .collect(),
            bookmarked,
        }
    }
}

#[derive(Serialize)]
pub struct DrinkPageResponse {
    pub drinks: Vec<DrinkSummaryResponse>,
    pub page: u32,
    pub next: bool,
    pub prev: bool,
}

// ── GET /drinks ──────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct DrinkListQuery {
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub ingredient_id: Option<i32>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

fn parse_list_query(raw_query: Option<&str>) -> Result<DrinkListQuery, MixologyError> {
    Ok(raw_query
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| MixologyError::MissingData)?
        .unwrap_or_default())
}

async fn list_page(
    state: &AppState,
    query: DrinkListQuery,
    author_id: Option<Uuid>,
) -> Result<DrinkPageResponse, MixologyError> {
    let filter = DrinkFilter {
        name: query
            .name
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty()),
        category_id: query.category_id,
        ingredient_id: query.ingredient_id,
        author_id,
    };
    let page = PageRequest::from_query(query.per_page, query.page);

    let usecase = ListDrinksUseCase {
        drinks: state.drink_repo(),
    };
    let result = usecase.execute(filter, page).await?;
    Ok(DrinkPageResponse {
        drinks: result.drinks.into_iter().map(Into::into).collect(),
        page: page.page,
        next: result.next,
        prev: result.prev,
    })
}

pub async fn get_drinks(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<DrinkPageResponse>, MixologyError> {
    let query = parse_list_query(raw_query.as_deref())?;
    Ok(Json(list_page(&state, query, None).await?))
}

// ── GET /users/@me/drinks ────────────────────────────────────────────────────

/// The caller's own drinks, with the same filters and paging as `/drinks`.
pub async fn get_my_drinks(
    identity: SessionIdentity,
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Json<DrinkPageResponse>, MixologyError> {
    let user = current_user(&state, identity).await?;
    let query = parse_list_query(raw_query.as_deref())?;
    Ok(Json(list_page(&state, query, Some(user.id)).await?))
}

// ── POST /drinks ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct DraftIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub measure: Option<String>,
}

impl From<DraftIngredientRequest> for DraftIngredient {
    fn from(line: DraftIngredientRequest) -> Self {
        Self {
            name: line.name,
            measure: line.measure,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateDrinkRequest {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub glass: Option<String>,
    #[serde(default)]
    pub alcoholic: Option<bool>,
    #[serde(default)]
    pub optional_alc: Option<bool>,
    #[serde(default)]
    pub instructions: Option<String>,
    #[serde(default)]
    pub ingredients: Vec<DraftIngredientRequest>,
}

pub async fn create_drink(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateDrinkRequest>,
) -> Result<(StatusCode, Json<DrinkDetailResponse>), MixologyError> {
    let user = current_user(&state, identity).await?;
    let draft = DrinkDraft {
        name: body.name,
        category: body.category,
        glass: body.glass,
        alcoholic: body.alcoholic.unwrap_or(true),
        optional_alc: body.optional_alc.unwrap_or(false),
        instructions: body.instructions,
        ingredients: body.ingredients.into_iter().map(Into::into).collect(),
    };
    let usecase = CreateDrinkUseCase {
        references: state.reference_repo(),
        drinks: state.drink_repo(),
        languages: state.language_repo(),
    };
    let detail = usecase.execute(&user, &draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(DrinkDetailResponse::new(detail, Some(false))),
    ))
}

// ── PATCH /drinks/{id} ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateDrinkRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub glass: Option<String>,
    pub alcoholic: Option<bool>,
    pub optional_alc: Option<bool>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<DraftIngredientRequest>>,
}

pub async fn update_drink(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinkDetailResponse>, MixologyError> {
    let user = current_user(&state, identity).await?;
    let changes = DrinkDraftChanges {
        name: body.name,
        category: body.category,
        glass: body.glass,
        alcoholic: body.alcoholic,
        optional_alc: body.optional_alc,
        instructions: body.instructions,
        ingredients: body
            .ingredients
            .map(|lines| lines.into_iter().map(Into::into).collect()),
    };
    let usecase = UpdateDrinkUseCase {
        references: state.reference_repo(),
        drinks: state.drink_repo(),
        languages: state.language_repo(),
    };
    let detail = usecase.execute(&user, id, changes).await?;
    let has_bookmark = HasBookmarkUseCase {
        bookmarks: state.bookmark_repo(),
    };
    let bookmarked = has_bookmark.execute(user.id, id).await?;
    Ok(Json(DrinkDetailResponse::new(detail, Some(bookmarked))))
}

// ── GET /drinks/{id} ─────────────────────────────────────────────────────────

pub async fn get_drink(
    identity: Option<SessionIdentity>,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DrinkDetailResponse>, MixologyError> {
    let usecase = GetDrinkUseCase {
        drinks: state.drink_repo(),
        ingest: state.ingest(),
        catalog: state.catalog.clone(),
    };
    let detail = usecase.execute(id).await?;

    let bookmarked = match state.session_gate().resolve(identity).await? {
        Some(user) => {
            let has_bookmark = HasBookmarkUseCase {
                bookmarks: state.bookmark_repo(),
            };
            Some(has_bookmark.execute(user.id, id).await?)
        }
        None => None,
    };
    Ok(Json(DrinkDetailResponse::new(detail, bookmarked)))
}

// ── PUT /drinks/{id} ─────────────────────────────────────────────────────────

pub async fn refresh_drink(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DrinkDetailResponse>, MixologyError> {
    current_user(&state, identity).await?;
    let usecase = RefreshDrinkUseCase {
        ingest: state.ingest(),
        catalog: state.catalog.clone(),
    };
    let detail = usecase.execute(id).await?;
    Ok(Json(DrinkDetailResponse::new(detail, None)))
}

// ── DELETE /drinks/{id} ──────────────────────────────────────────────────────

pub async fn delete_drink(
    identity: SessionIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, MixologyError> {
    let user = current_user(&state, identity).await?;
    let usecase = DeleteDrinkUseCase {
        drinks: state.drink_repo(),
    };
    usecase.execute(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
