//! Catalog normalizer.
//!
//! Turns one loosely-typed upstream drink record into the relational shape
//! (drink scalars, per-language instructions, ingredient lines). Pure: no
//! I/O. Reference rows (category, glass, ingredient) are never written here;
//! names not found through the [`ReferenceLookup`] come back as
//! [`ReferenceRef::NeedsCreation`] so the caller can upsert them, batch-wide,
//! before persisting.
//!
//! User-authored drafts go through [`normalize_draft`] and come out in the
//! same shape, so both kinds of drink share one save path.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

use mixology_core::serde::empty_as_none;
use mixology_domain::language::LanguageCode;
use mixology_domain::text::{normalize_name, title_case};

use crate::domain::types::{
    CatalogPreview, DrinkDraft, Reference, ReferenceKind, is_authored_id,
};

/// Upstream records carry at most this many ingredient/measure slots.
pub const INGREDIENT_SLOTS: usize = 15;

/// Ingredient lines a user may give an authored drink.
pub const AUTHORED_INGREDIENT_LIMIT: usize = 10;

/// A record that cannot become a drink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedRecordError {
    #[error("record has no drink id")]
    MissingId,
    #[error("drink id {0:?} is not a number")]
    InvalidId(String),
    #[error("record has no drink name")]
    MissingName,
    #[error("drink id {0} is reserved for user-authored drinks")]
    ReservedId(i32),
}

/// A user-authored drink that cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDraftError {
    #[error("drink name must not be blank")]
    MissingName,
    #[error("a drink takes at most {max} ingredients, got {0}", max = AUTHORED_INGREDIENT_LIMIT)]
    TooManyIngredients(usize),
}

/// A reference name that was still unknown when the drink was resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{} {name:?} was not created before resolving", .kind.as_str())]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub name: String,
}

// ── Upstream boundary ────────────────────────────────────────────────────────

/// Upstream drink id as sent: the catalog uses JSON strings, but numbers are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawId {
    Number(i64),
    Text(String),
}

fn lenient_id<'de, D>(d: D) -> Result<Option<RawId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Number(i64),
        Text(String),
    }
    Ok(Option::<Wire>::deserialize(d)?.map(|w| match w {
        Wire::Number(n) => RawId::Number(n),
        Wire::Text(s) => RawId::Text(s),
    }))
}

/// One drink as the upstream catalog returns it.
///
/// Named fields cover the scalars; numbered ingredient/measure slots and the
/// per-locale instruction keys are kept in `slots` and read by key.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDrinkRecord {
    #[serde(rename = "idDrink", default, deserialize_with = "lenient_id")]
    pub id: Option<RawId>,
    #[serde(rename = "strDrink", default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(rename = "strDrinkThumb", default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    #[serde(
        rename = "strImageAttribution",
        default,
        deserialize_with = "empty_as_none"
    )]
    pub image_attribution: Option<String>,
    #[serde(rename = "strVideo", default, deserialize_with = "empty_as_none")]
    pub video_url: Option<String>,
    #[serde(rename = "strAlcoholic", default, deserialize_with = "empty_as_none")]
    pub alcoholic: Option<String>,
    #[serde(rename = "strCategory", default, deserialize_with = "empty_as_none")]
    pub category: Option<String>,
    #[serde(rename = "strGlass", default, deserialize_with = "empty_as_none")]
    pub glass: Option<String>,
    #[serde(flatten)]
    pub slots: BTreeMap<String, Value>,
}

impl RawDrinkRecord {
    /// Trimmed, non-empty string value of a slot key.
    fn slot(&self, key: &str) -> Option<&str> {
        match self.slots.get(key)? {
            Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()),
            _ => None,
        }
    }

    fn drink_id(&self) -> Result<i32, MalformedRecordError> {
        let id = self.parsed_id()?;
        if is_authored_id(id) {
            return Err(MalformedRecordError::ReservedId(id));
        }
        Ok(id)
    }

    fn parsed_id(&self) -> Result<i32, MalformedRecordError> {
        match self.id.as_ref().ok_or(MalformedRecordError::MissingId)? {
            RawId::Number(n) => {
                i32::try_from(*n).map_err(|_| MalformedRecordError::InvalidId(n.to_string()))
            }
            RawId::Text(s) if s.trim().is_empty() => Err(MalformedRecordError::MissingId),
            RawId::Text(s) => s
                .trim()
                .parse::<i32>()
                .map_err(|_| MalformedRecordError::InvalidId(s.clone())),
        }
    }

    fn drink_name(&self) -> Result<String, MalformedRecordError> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or(MalformedRecordError::MissingName)
    }

    fn instruction(&self, language: LanguageCode) -> Option<&str> {
        let key = language.upstream_instruction_key();
        // Some feeds spell English with the explicit suffix.
        self.slot(&key).or_else(|| match language {
            LanguageCode::En => self.slot("strInstructionsEN"),
            _ => None,
        })
    }

    /// Search-result preview. Requires the same id and name a full record does.
    pub fn preview(&self) -> Result<CatalogPreview, MalformedRecordError> {
        Ok(CatalogPreview {
            id: self.drink_id()?,
            name: self.drink_name()?,
            image_url: self.image_url.clone(),
            category: self.category.as_deref().map(title_case),
        })
    }
}

// ── Alcohol classification ───────────────────────────────────────────────────

/// Upstream `strAlcoholic` value, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlcoholClass {
    Alcoholic,
    NonAlcoholic,
    Optional,
    /// Absent or not one of the known spellings.
    Unrecognized(Option<String>),
}

impl AlcoholClass {
    /// Class for explicit flags. `optional_alc` implies alcoholic.
    pub fn from_flags(alcoholic: bool, optional_alc: bool) -> Self {
        match (alcoholic, optional_alc) {
            (_, true) => Self::Optional,
            (true, false) => Self::Alcoholic,
            (false, false) => Self::NonAlcoholic,
        }
    }

    pub fn classify(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Unrecognized(None);
        };
        let key = raw.trim().to_lowercase().replace('-', " ");
        match key.as_str() {
            "alcoholic" => Self::Alcoholic,
            "non alcoholic" => Self::NonAlcoholic,
            "optional alcohol" => Self::Optional,
            _ => Self::Unrecognized(Some(raw.to_owned())),
        }
    }

    /// `(alcoholic, optional_alc)` flags. Unrecognized input counts as alcoholic.
    pub fn flags(&self) -> (bool, bool) {
        match self {
            Self::Alcoholic | Self::Unrecognized(_) => (true, false),
            Self::NonAlcoholic => (false, false),
            Self::Optional => (true, true),
        }
    }
}

// ── Reference resolution ─────────────────────────────────────────────────────

/// Read access to existing reference rows by normalized name.
pub trait ReferenceLookup {
    fn find(&self, kind: ReferenceKind, name: &str) -> Option<&Reference>;
}

/// In-memory reference lookup keyed by `(kind, lower-cased name)`.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    entries: HashMap<(ReferenceKind, String), Reference>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: ReferenceKind, reference: Reference) {
        self.entries
            .insert((kind, reference.name.clone()), reference);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ReferenceLookup for ReferenceIndex {
    fn find(&self, kind: ReferenceKind, name: &str) -> Option<&Reference> {
        self.entries.get(&(kind, name.to_owned()))
    }
}

/// A category, glass or ingredient named by a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceRef {
    Existing(Reference),
    /// Normalized name of a row the caller must create.
    NeedsCreation(String),
}

impl ReferenceRef {
    fn lookup(kind: ReferenceKind, name: String, lookup: &impl ReferenceLookup) -> Self {
        match lookup.find(kind, &name) {
            Some(existing) => Self::Existing(existing.clone()),
            None => Self::NeedsCreation(name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Existing(r) => &r.name,
            Self::NeedsCreation(name) => name,
        }
    }

    fn resolve(
        &self,
        kind: ReferenceKind,
        index: &impl ReferenceLookup,
    ) -> Result<i32, UnresolvedReference> {
        match self {
            Self::Existing(r) => Ok(r.id),
            Self::NeedsCreation(name) => index.find(kind, name).map(|r| r.id).ok_or_else(|| {
                UnresolvedReference {
                    kind,
                    name: name.clone(),
                }
            }),
        }
    }
}

// ── Normalized output ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInstruction {
    pub language: LanguageCode,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedIngredient {
    pub ingredient: ReferenceRef,
    pub measure: Option<String>,
    /// 1-based upstream slot number.
    pub position: i16,
}

/// A drink ready to persist once its pending references exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedDrink {
    pub id: i32,
    pub name: String,
    pub author_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub image_attribution: Option<String>,
    pub video_url: Option<String>,
    pub alcohol: AlcoholClass,
    pub category: Option<ReferenceRef>,
    pub glass: Option<ReferenceRef>,
    pub instructions: Vec<NormalizedInstruction>,
    pub ingredients: Vec<NormalizedIngredient>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIngredient {
    pub ingredient_id: i32,
    pub measure: Option<String>,
    pub position: i16,
}

/// A normalized drink with every reference replaced by its row id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDrink {
    pub id: i32,
    pub name: String,
    pub author_id: Option<Uuid>,
    pub image_url: Option<String>,
    pub image_attribution: Option<String>,
    pub video_url: Option<String>,
    pub alcoholic: bool,
    pub optional_alc: bool,
    pub category_id: Option<i32>,
    pub glass_id: Option<i32>,
    pub instructions: Vec<NormalizedInstruction>,
    pub ingredients: Vec<ResolvedIngredient>,
}

impl NormalizedDrink {
    /// Every reference this drink names, existing or not.
    pub fn reference_names(&self) -> BTreeSet<(ReferenceKind, String)> {
        self.references()
            .map(|(kind, r)| (kind, r.name().to_owned()))
            .collect()
    }

    /// References that must be created before [`Self::resolve`] can succeed.
    pub fn pending_references(&self) -> BTreeSet<(ReferenceKind, String)> {
        self.references()
            .filter_map(|(kind, r)| match r {
                ReferenceRef::NeedsCreation(name) => Some((kind, name.clone())),
                ReferenceRef::Existing(_) => None,
            })
            .collect()
    }

    fn references(&self) -> impl Iterator<Item = (ReferenceKind, &ReferenceRef)> {
        let category = self
            .category
            .iter()
            .map(|r| (ReferenceKind::Category, r));
        let glass = self.glass.iter().map(|r| (ReferenceKind::Glass, r));
        let ingredients = self
            .ingredients
            .iter()
            .map(|i| (ReferenceKind::Ingredient, &i.ingredient));
        category.chain(glass).chain(ingredients)
    }

    /// Swap reference names for row ids using `index`, which must now hold
    /// every pending reference.
    pub fn resolve(&self, index: &impl ReferenceLookup) -> Result<ResolvedDrink, UnresolvedReference> {
        let (alcoholic, optional_alc) = self.alcohol.flags();
        let category_id = self
            .category
            .as_ref()
            .map(|r| r.resolve(ReferenceKind::Category, index))
            .transpose()?;
        let glass_id = self
            .glass
            .as_ref()
            .map(|r| r.resolve(ReferenceKind::Glass, index))
            .transpose()?;
        let ingredients = self
            .ingredients
            .iter()
            .map(|i| {
                Ok(ResolvedIngredient {
                    ingredient_id: i.ingredient.resolve(ReferenceKind::Ingredient, index)?,
                    measure: i.measure.clone(),
                    position: i.position,
                })
            })
            .collect::<Result<Vec<_>, UnresolvedReference>>()?;

        Ok(ResolvedDrink {
            id: self.id,
            name: self.name.clone(),
            author_id: self.author_id,
            image_url: self.image_url.clone(),
            image_attribution: self.image_attribution.clone(),
            video_url: self.video_url.clone(),
            alcoholic,
            optional_alc,
            category_id,
            glass_id,
            instructions: self.instructions.clone(),
            ingredients,
        })
    }
}

// ── normalize ────────────────────────────────────────────────────────────────

/// Normalize one upstream record against the currently known references.
///
/// Empty ingredient slots and empty locales are skipped. An ingredient named
/// twice keeps its first slot. Only a missing id or name is an error.
pub fn normalize(
    record: &RawDrinkRecord,
    lookup: &impl ReferenceLookup,
) -> Result<NormalizedDrink, MalformedRecordError> {
    let id = record.drink_id()?;
    let name = record.drink_name()?;

    let alcohol = AlcoholClass::classify(record.alcoholic.as_deref());

    let category = record
        .category
        .as_deref()
        .and_then(normalize_name)
        .map(|n| ReferenceRef::lookup(ReferenceKind::Category, n, lookup));
    let glass = record
        .glass
        .as_deref()
        .and_then(normalize_name)
        .map(|n| ReferenceRef::lookup(ReferenceKind::Glass, n, lookup));

    let instructions = LanguageCode::ALL
        .into_iter()
        .filter_map(|language| {
            record.instruction(language).map(|text| NormalizedInstruction {
                language,
                text: text.to_owned(),
            })
        })
        .collect();

    let mut seen = BTreeSet::new();
    let mut ingredients = Vec::new();
    for slot in 1..=INGREDIENT_SLOTS {
        let Some(ingredient) = record
            .slot(&format!("strIngredient{slot}"))
            .and_then(normalize_name)
        else {
            continue;
        };
        if !seen.insert(ingredient.clone()) {
            continue;
        }
        ingredients.push(NormalizedIngredient {
            ingredient: ReferenceRef::lookup(ReferenceKind::Ingredient, ingredient, lookup),
            measure: record
                .slot(&format!("strMeasure{slot}"))
                .map(str::to_owned),
            position: slot as i16,
        });
    }

    Ok(NormalizedDrink {
        id,
        name,
        author_id: None,
        image_url: record.image_url.clone(),
        image_attribution: record.image_attribution.clone(),
        video_url: record.video_url.clone(),
        alcohol,
        category,
        glass,
        instructions,
        ingredients,
    })
}

/// Normalize a user-authored drink owned by `author_id`.
///
/// Follows the upstream rules for ingredient lines: blank names are skipped,
/// a repeated ingredient keeps its first line, measures are trimmed. The
/// instruction text, if any, is stored under `language`.
pub fn normalize_draft(
    draft: &DrinkDraft,
    id: i32,
    author_id: Uuid,
    language: LanguageCode,
    lookup: &impl ReferenceLookup,
) -> Result<NormalizedDrink, InvalidDraftError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(InvalidDraftError::MissingName);
    }
    if draft.ingredients.len() > AUTHORED_INGREDIENT_LIMIT {
        return Err(InvalidDraftError::TooManyIngredients(
            draft.ingredients.len(),
        ));
    }

    let category = draft
        .category
        .as_deref()
        .and_then(normalize_name)
        .map(|n| ReferenceRef::lookup(ReferenceKind::Category, n, lookup));
    let glass = draft
        .glass
        .as_deref()
        .and_then(normalize_name)
        .map(|n| ReferenceRef::lookup(ReferenceKind::Glass, n, lookup));

    let instructions = draft
        .instructions
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| NormalizedInstruction {
            language,
            text: text.to_owned(),
        })
        .into_iter()
        .collect();

    let mut seen = BTreeSet::new();
    let mut ingredients = Vec::new();
    for (slot, line) in draft.ingredients.iter().enumerate() {
        let Some(ingredient) = normalize_name(&line.name) else {
            continue;
        };
        if !seen.insert(ingredient.clone()) {
            continue;
        }
        ingredients.push(NormalizedIngredient {
            ingredient: ReferenceRef::lookup(ReferenceKind::Ingredient, ingredient, lookup),
            measure: line
                .measure
                .as_deref()
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_owned),
            position: slot as i16 + 1,
        });
    }

    Ok(NormalizedDrink {
        id,
        name: name.to_owned(),
        author_id: Some(author_id),
        image_url: None,
        image_attribution: None,
        video_url: None,
        alcohol: AlcoholClass::from_flags(draft.alcoholic, draft.optional_alc),
        category,
        glass,
        instructions,
        ingredients,
    })
}
