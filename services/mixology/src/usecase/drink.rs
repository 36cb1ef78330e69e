use uuid::Uuid;

use mixology_domain::language::LanguageCode;
use mixology_domain::pagination::PageRequest;

use crate::domain::normalize::{
    AlcoholClass, RawDrinkRecord, ReferenceIndex, normalize, normalize_draft,
};
use crate::domain::repository::{
    CatalogPort, DrinkRepository, LanguageRepository, ReferenceRepository,
};
use crate::domain::types::{
    AUTHORED_ID_FLOOR, DrinkDetail, DrinkDraft, DrinkDraftChanges, DrinkFilter, DrinkPage, User,
    is_authored_id,
};
use crate::error::MixologyError;

async fn load_saved<D: DrinkRepository>(drinks: &D, id: i32) -> Result<DrinkDetail, MixologyError> {
    drinks.find_by_id(id).await?.ok_or_else(|| {
        MixologyError::Internal(anyhow::anyhow!("drink {id} missing right after save"))
    })
}

// ── IngestDrink ──────────────────────────────────────────────────────────────

pub struct IngestDrinkUseCase<R: ReferenceRepository, D: DrinkRepository> {
    pub references: R,
    pub drinks: D,
}

impl<R: ReferenceRepository, D: DrinkRepository> IngestDrinkUseCase<R, D> {
    /// Normalize an upstream record and persist it, keyed by its upstream id.
    ///
    /// Re-ingesting the same record rewrites the same rows.
    pub async fn execute(&self, record: &RawDrinkRecord) -> Result<DrinkDetail, MixologyError> {
        // First pass only collects the names to look up.
        let draft = normalize(record, &ReferenceIndex::new())?;
        let known = self.references.lookup(&draft.reference_names()).await?;
        let drink = normalize(record, &known)?;
        if let AlcoholClass::Unrecognized(raw) = &drink.alcohol {
            tracing::warn!(
                drink_id = drink.id,
                value = ?raw,
                "unrecognized alcoholic classification, treating as alcoholic"
            );
        }

        let report = self.drinks.save(&drink).await?;
        tracing::info!(
            drink_id = drink.id,
            references_created = report.references_created,
            "ingested drink"
        );

        load_saved(&self.drinks, drink.id).await
    }
}

// ── GetDrink ─────────────────────────────────────────────────────────────────

pub struct GetDrinkUseCase<R: ReferenceRepository, D: DrinkRepository, C: CatalogPort> {
    pub drinks: D,
    pub ingest: IngestDrinkUseCase<R, D>,
    pub catalog: C,
}

impl<R: ReferenceRepository, D: DrinkRepository, C: CatalogPort> GetDrinkUseCase<R, D, C> {
    /// The stored drink, materialized from the upstream catalog on first view.
    /// Authored ids are never looked up upstream.
    pub async fn execute(&self, id: i32) -> Result<DrinkDetail, MixologyError> {
        if let Some(detail) = self.drinks.find_by_id(id).await? {
            return Ok(detail);
        }
        if is_authored_id(id) {
            return Err(MixologyError::DrinkNotFound);
        }
        let record = self
            .catalog
            .lookup_by_id(id)
            .await?
            .ok_or(MixologyError::DrinkNotFound)?;
        self.ingest.execute(&record).await
    }
}

// ── RefreshDrink ─────────────────────────────────────────────────────────────

pub struct RefreshDrinkUseCase<R: ReferenceRepository, D: DrinkRepository, C: CatalogPort> {
    pub ingest: IngestDrinkUseCase<R, D>,
    pub catalog: C,
}

impl<R: ReferenceRepository, D: DrinkRepository, C: CatalogPort> RefreshDrinkUseCase<R, D, C> {
    /// Re-fetch a drink upstream and upsert it over the stored copy.
    /// Authored drinks have no upstream copy and report `DrinkNotFound`.
    pub async fn execute(&self, id: i32) -> Result<DrinkDetail, MixologyError> {
        if is_authored_id(id) {
            return Err(MixologyError::DrinkNotFound);
        }
        let record = self
            .catalog
            .lookup_by_id(id)
            .await?
            .ok_or(MixologyError::DrinkNotFound)?;
        self.ingest.execute(&record).await
    }
}

// ── DeleteDrink ──────────────────────────────────────────────────────────────

pub struct DeleteDrinkUseCase<D: DrinkRepository> {
    pub drinks: D,
}

impl<D: DrinkRepository> DeleteDrinkUseCase<D> {
    /// Delete a drink on behalf of `user_id`. Authored drinks may only be
    /// deleted by their author.
    pub async fn execute(&self, user_id: Uuid, id: i32) -> Result<(), MixologyError> {
        let detail = self
            .drinks
            .find_by_id(id)
            .await?
            .ok_or(MixologyError::DrinkNotFound)?;
        if detail.drink.author_id.is_some_and(|author| author != user_id) {
            return Err(MixologyError::NotDrinkAuthor);
        }
        if !self.drinks.delete(id).await? {
            return Err(MixologyError::DrinkNotFound);
        }
        tracing::info!(drink_id = id, user_id = %user_id, "deleted drink");
        Ok(())
    }
}

// ── CreateDrink ──────────────────────────────────────────────────────────────

pub struct CreateDrinkUseCase<R: ReferenceRepository, D: DrinkRepository, L: LanguageRepository> {
    pub references: R,
    pub drinks: D,
    pub languages: L,
}

impl<R: ReferenceRepository, D: DrinkRepository, L: LanguageRepository>
    CreateDrinkUseCase<R, D, L>
{
    /// Store a drink written by `author`. Its instruction text is filed
    /// under the author's profile language.
    pub async fn execute(
        &self,
        author: &User,
        draft: &DrinkDraft,
    ) -> Result<DrinkDetail, MixologyError> {
        let language = self
            .languages
            .find_by_id(author.language_id)
            .await?
            .ok_or(MixologyError::LanguageNotFound)?;

        let pending = normalize_draft(
            draft,
            AUTHORED_ID_FLOOR,
            author.id,
            language.code,
            &ReferenceIndex::new(),
        )?;
        let known = self.references.lookup(&pending.reference_names()).await?;
        let drink = normalize_draft(draft, AUTHORED_ID_FLOOR, author.id, language.code, &known)?;

        let report = self.drinks.create_authored(&drink).await?;
        tracing::info!(
            drink_id = report.drink_id,
            user_id = %author.id,
            references_created = report.references_created,
            "created drink"
        );
        load_saved(&self.drinks, report.drink_id).await
    }
}

// ── UpdateDrink ──────────────────────────────────────────────────────────────

pub struct UpdateDrinkUseCase<R: ReferenceRepository, D: DrinkRepository, L: LanguageRepository> {
    pub references: R,
    pub drinks: D,
    pub languages: L,
}

impl<R: ReferenceRepository, D: DrinkRepository, L: LanguageRepository>
    UpdateDrinkUseCase<R, D, L>
{
    /// Apply `changes` to a drink `author` wrote. Upstream drinks and other
    /// users' drinks are refused with `NotDrinkAuthor`.
    pub async fn execute(
        &self,
        author: &User,
        id: i32,
        changes: DrinkDraftChanges,
    ) -> Result<DrinkDetail, MixologyError> {
        if changes.is_empty() {
            return Err(MixologyError::MissingData);
        }
        let detail = self
            .drinks
            .find_by_id(id)
            .await?
            .ok_or(MixologyError::DrinkNotFound)?;
        if detail.drink.author_id != Some(author.id) {
            return Err(MixologyError::NotDrinkAuthor);
        }

        let (mut draft, language) = DrinkDraft::from_detail(&detail);
        draft.apply(changes);
        let language = match language {
            Some(code) => code,
            None => self.author_language(author).await?,
        };

        let pending = normalize_draft(&draft, id, author.id, language, &ReferenceIndex::new())?;
        let known = self.references.lookup(&pending.reference_names()).await?;
        let drink = normalize_draft(&draft, id, author.id, language, &known)?;

        let report = self.drinks.save(&drink).await?;
        tracing::info!(
            drink_id = id,
            references_created = report.references_created,
            "updated drink"
        );
        load_saved(&self.drinks, id).await
    }

    async fn author_language(&self, author: &User) -> Result<LanguageCode, MixologyError> {
        let language = self
            .languages
            .find_by_id(author.language_id)
            .await?
            .ok_or(MixologyError::LanguageNotFound)?;
        Ok(language.code)
    }
}

// ── ListDrinks ───────────────────────────────────────────────────────────────

pub struct ListDrinksUseCase<D: DrinkRepository> {
    pub drinks: D,
}

impl<D: DrinkRepository> ListDrinksUseCase<D> {
    pub async fn execute(
        &self,
        filter: DrinkFilter,
        page: PageRequest,
    ) -> Result<DrinkPage, MixologyError> {
        let page = page.clamped();
        // One extra row tells whether a next page exists.
        let mut drinks = self
            .drinks
            .list(&filter, page.offset(), page.limit() + 1)
            .await?;
        let next = drinks.len() as u64 > page.limit();
        drinks.truncate(page.limit() as usize);
        Ok(DrinkPage {
            drinks,
            next,
            prev: page.has_prev(),
        })
    }
}
