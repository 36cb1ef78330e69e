use chrono::{DateTime, Utc};
use url::Url;
use uuid::Uuid;

use mixology_domain::language::LanguageCode;
use mixology_domain::pagination::Sort;

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub language_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a user may change on their own profile. `None` leaves the column alone.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub username: Option<String>,
    pub password_hash: Option<String>,
    pub language_id: Option<i32>,
}

/// Seeded instruction locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub id: i32,
    pub code: LanguageCode,
    pub name: String,
}

/// Which name-keyed lookup table a reference lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReferenceKind {
    Category,
    Glass,
    Ingredient,
}

impl ReferenceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Glass => "glass",
            Self::Ingredient => "ingredient",
        }
    }
}

/// Row of a reference table. `name` is the lower-cased storage form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub id: i32,
    pub name: String,
}

/// Lowest drink id handed to user-authored drinks. Upstream ids stay below it.
pub const AUTHORED_ID_FLOOR: i32 = 1_000_000_000;

/// Whether `id` lies in the range reserved for user-authored drinks.
pub fn is_authored_id(id: i32) -> bool {
    id >= AUTHORED_ID_FLOOR
}

/// Scalar drink fields plus its resolved category and glass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkSummary {
    pub id: i32,
    pub name: String,
    /// Set only for drinks a user wrote; upstream drinks have no author.
    pub author_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub image_attribution: Option<String>,
    pub video_url: Option<String>,
    pub alcoholic: bool,
    pub optional_alc: bool,
    pub category: Option<Reference>,
    pub glass: Option<Reference>,
}

impl DrinkSummary {
    /// YouTube video id from `video_url`, for embedding.
    ///
    /// Understands `youtube.com/watch?v=<id>` and `youtu.be/<id>`.
    pub fn video_id(&self) -> Option<String> {
        let url = Url::parse(self.video_url.as_deref()?).ok()?;
        let host = url.host_str()?.trim_start_matches("www.").trim_start_matches("m.");
        let id = match host {
            "youtube.com" => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            "youtu.be" => url
                .path_segments()
                .and_then(|mut segments| segments.next())
                .map(str::to_owned),
            _ => None,
        }?;
        (!id.is_empty()).then_some(id)
    }
}

/// Preparation text in one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub language: LanguageCode,
    pub text: String,
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkIngredient {
    pub ingredient: Reference,
    pub measure: Option<String>,
}

/// A persisted drink with everything a detail page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkDetail {
    pub drink: DrinkSummary,
    pub instructions: Vec<Instruction>,
    pub ingredients: Vec<DrinkIngredient>,
}

/// Listing filters. All present filters must match.
#[derive(Debug, Clone, Default)]
pub struct DrinkFilter {
    /// Case-insensitive substring of the drink name.
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub ingredient_id: Option<i32>,
    pub author_id: Option<Uuid>,
}

/// One ingredient line of a user-authored drink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftIngredient {
    pub name: String,
    pub measure: Option<String>,
}

/// A user-authored recipe as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrinkDraft {
    pub name: String,
    pub category: Option<String>,
    pub glass: Option<String>,
    pub alcoholic: bool,
    pub optional_alc: bool,
    pub instructions: Option<String>,
    pub ingredients: Vec<DraftIngredient>,
}

/// Partial edit of an authored drink. `None` keeps the stored value; a blank
/// category, glass or instruction text clears it. `ingredients` replaces the
/// whole list.
#[derive(Debug, Clone, Default)]
pub struct DrinkDraftChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub glass: Option<String>,
    pub alcoholic: Option<bool>,
    pub optional_alc: Option<bool>,
    pub instructions: Option<String>,
    pub ingredients: Option<Vec<DraftIngredient>>,
}

impl DrinkDraftChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.glass.is_none()
            && self.alcoholic.is_none()
            && self.optional_alc.is_none()
            && self.instructions.is_none()
            && self.ingredients.is_none()
    }
}

impl DrinkDraft {
    /// The editable form of a stored drink, plus the language its instruction is in.
    pub fn from_detail(detail: &DrinkDetail) -> (Self, Option<LanguageCode>) {
        let instruction = detail.instructions.first();
        let draft = Self {
            name: detail.drink.name.clone(),
            category: detail.drink.category.as_ref().map(|c| c.name.clone()),
            glass: detail.drink.glass.as_ref().map(|g| g.name.clone()),
            alcoholic: detail.drink.alcoholic,
            optional_alc: detail.drink.optional_alc,
            instructions: instruction.map(|i| i.text.clone()),
            ingredients: detail
                .ingredients
                .iter()
                .map(|line| DraftIngredient {
                    name: line.ingredient.name.clone(),
                    measure: line.measure.clone(),
                })
                .collect(),
        };
        (draft, instruction.map(|i| i.language))
    }

    pub fn apply(&mut self, changes: DrinkDraftChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(category) = changes.category {
            self.category = Some(category);
        }
        if let Some(glass) = changes.glass {
            self.glass = Some(glass);
        }
        if let Some(alcoholic) = changes.alcoholic {
            self.alcoholic = alcoholic;
        }
        if let Some(optional_alc) = changes.optional_alc {
            self.optional_alc = optional_alc;
        }
        if let Some(instructions) = changes.instructions {
            self.instructions = Some(instructions);
        }
        if let Some(ingredients) = changes.ingredients {
            self.ingredients = ingredients;
        }
    }
}

/// One page of a drink listing.
#[derive(Debug, Clone)]
pub struct DrinkPage {
    pub drinks: Vec<DrinkSummary>,
    pub next: bool,
    pub prev: bool,
}

/// Saved-drink row.
#[derive(Debug, Clone)]
pub struct Bookmark {
    pub user_id: Uuid,
    pub drink_id: i32,
    pub created_at: DateTime<Utc>,
}

/// A bookmarked drink as listed on a profile.
#[derive(Debug, Clone)]
pub struct BookmarkedDrink {
    pub drink: DrinkSummary,
    pub bookmarked_at: DateTime<Utc>,
}

/// Outcome of a bookmark toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkState {
    pub bookmarked: bool,
}

/// Sort options for bookmark listings.
#[derive(Debug, Clone, Copy)]
pub enum BookmarkSortBy {
    CreatedAt(Sort),
}

impl Default for BookmarkSortBy {
    fn default() -> Self {
        Self::CreatedAt(Sort::Desc)
    }
}

impl BookmarkSortBy {
    pub fn from_kebab(s: &str) -> Option<Self> {
        match s {
            "created-at-desc" => Some(Self::CreatedAt(Sort::Desc)),
            "created-at-asc" => Some(Self::CreatedAt(Sort::Asc)),
            _ => None,
        }
    }
}

/// Search hit from the upstream catalog, not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogPreview {
    pub id: i32,
    pub name: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// Username rule: 2-20 characters of ASCII letters, digits, `-` or `_`.
pub fn validate_username(username: &str) -> bool {
    (2..=20).contains(&username.len())
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// Password rule: at least 6 characters.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= 6
}
