use std::collections::{BTreeSet, HashMap};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::{Alias, Expr, Func, LikeExpr, OnConflict, Order, Query},
};
use uuid::Uuid;

use mixology_domain::language::LanguageCode;
use mixology_domain::pagination::Sort;
use mixology_schema::{
    bookmarks, categories, drink_ingredients, drinks, glasses, ingredients, instructions,
    languages, users,
};

use crate::domain::normalize::{NormalizedDrink, ReferenceIndex, ResolvedDrink};
use crate::domain::repository::{
    BookmarkRepository, DrinkRepository, LanguageRepository, ReferenceRepository, SaveReport,
    UserRepository,
};
use crate::domain::types::{
    AUTHORED_ID_FLOOR, Bookmark, BookmarkSortBy, BookmarkedDrink, DrinkDetail, DrinkFilter,
    DrinkIngredient, DrinkSummary, Instruction, Language, Reference, ReferenceKind, User,
    UserChanges,
};
use crate::error::MixologyError;

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, MixologyError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, MixologyError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await
            .context("find user by username")?;
        Ok(model.map(user_from_model))
    }

    async fn username_exists(&self, username: &str) -> Result<bool, MixologyError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("count users by username")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &User) -> Result<bool, MixologyError> {
        let model = users::ActiveModel {
            id: Set(user.id),
            username: Set(user.username.clone()),
            password_hash: Set(user.password_hash.clone()),
            language_id: Set(user.language_id),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };
        let inserted = users::Entity::insert(model)
            .on_conflict(
                OnConflict::column(users::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create user")?;
        Ok(inserted == 1)
    }

    async fn update(&self, id: Uuid, changes: &UserChanges) -> Result<(), MixologyError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(username) = &changes.username {
            am.username = Set(username.clone());
        }
        if let Some(password_hash) = &changes.password_hash {
            am.password_hash = Set(password_hash.clone());
        }
        if let Some(language_id) = changes.language_id {
            am.language_id = Set(language_id);
        }
        am.updated_at = Set(Utc::now());
        match am.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(MixologyError::UserNotFound),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(MixologyError::DuplicateUsername)
            }
            Err(e) => Err(anyhow::Error::new(e).context("update user").into()),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, MixologyError> {
        let result = users::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: model.id,
        username: model.username,
        password_hash: model.password_hash,
        language_id: model.language_id,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Language repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbLanguageRepository {
    pub db: DatabaseConnection,
}

impl LanguageRepository for DbLanguageRepository {
    async fn list(&self) -> Result<Vec<Language>, MixologyError> {
        let models = languages::Entity::find()
            .order_by_asc(languages::Column::Id)
            .all(&self.db)
            .await
            .context("list languages")?;
        let list = models
            .into_iter()
            .map(language_from_model)
            .collect::<anyhow::Result<_>>()?;
        Ok(list)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Language>, MixologyError> {
        let model = languages::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find language by id")?;
        Ok(model.map(language_from_model).transpose()?)
    }
}

fn language_code(code: &str) -> anyhow::Result<LanguageCode> {
    LanguageCode::from_code(code).with_context(|| format!("unknown language code {code:?}"))
}

fn language_from_model(model: languages::Model) -> anyhow::Result<Language> {
    Ok(Language {
        id: model.id,
        code: language_code(&model.code)?,
        name: model.name,
    })
}

// ── Reference repository ─────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReferenceRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct ReferenceRow {
    id: i32,
    name: String,
}

impl From<ReferenceRow> for Reference {
    fn from(row: ReferenceRow) -> Self {
        Reference {
            id: row.id,
            name: row.name,
        }
    }
}

fn reference_table(kind: ReferenceKind) -> Alias {
    Alias::new(match kind {
        ReferenceKind::Category => "categories",
        ReferenceKind::Glass => "glasses",
        ReferenceKind::Ingredient => "ingredients",
    })
}

fn group_by_kind(
    names: &BTreeSet<(ReferenceKind, String)>,
) -> Vec<(ReferenceKind, Vec<String>)> {
    let mut grouped: Vec<(ReferenceKind, Vec<String>)> = Vec::new();
    for (kind, name) in names {
        match grouped.last_mut() {
            Some((last, group)) if *last == *kind => group.push(name.clone()),
            _ => grouped.push((*kind, vec![name.clone()])),
        }
    }
    grouped
}

async fn select_references<C: ConnectionTrait>(
    conn: &C,
    kind: ReferenceKind,
    names: Option<&[String]>,
) -> Result<Vec<Reference>, DbErr> {
    let mut select = Query::select();
    select
        .columns([Alias::new("id"), Alias::new("name")])
        .from(reference_table(kind))
        .order_by(Alias::new("name"), Order::Asc);
    if let Some(names) = names {
        select.and_where(Expr::col(Alias::new("name")).is_in(names.iter().cloned()));
    }
    let rows = ReferenceRow::find_by_statement(conn.get_database_backend().build(&select))
        .all(conn)
        .await?;
    Ok(rows.into_iter().map(Reference::from).collect())
}

async fn lookup_references<C: ConnectionTrait>(
    conn: &C,
    names: &BTreeSet<(ReferenceKind, String)>,
) -> Result<ReferenceIndex, DbErr> {
    let mut index = ReferenceIndex::new();
    for (kind, group) in group_by_kind(names) {
        for reference in select_references(conn, kind, Some(&group)).await? {
            index.insert(kind, reference);
        }
    }
    Ok(index)
}

/// Insert missing reference rows, leaving rows another writer created alone.
/// Returns how many rows this call inserted.
async fn create_references<C: ConnectionTrait>(
    conn: &C,
    names: &BTreeSet<(ReferenceKind, String)>,
) -> Result<u64, DbErr> {
    let mut created = 0;
    for (kind, group) in group_by_kind(names) {
        let mut insert = Query::insert();
        insert
            .into_table(reference_table(kind))
            .columns([Alias::new("name")])
            .on_conflict(OnConflict::column(Alias::new("name")).do_nothing().to_owned());
        for name in group {
            insert.values_panic([name.into()]);
        }
        let result = conn
            .execute(conn.get_database_backend().build(&insert))
            .await?;
        created += result.rows_affected();
    }
    Ok(created)
}

impl ReferenceRepository for DbReferenceRepository {
    async fn list(&self, kind: ReferenceKind) -> Result<Vec<Reference>, MixologyError> {
        let references = select_references(&self.db, kind, None)
            .await
            .with_context(|| format!("list {} references", kind.as_str()))?;
        Ok(references)
    }

    async fn lookup(
        &self,
        names: &BTreeSet<(ReferenceKind, String)>,
    ) -> Result<ReferenceIndex, MixologyError> {
        let index = lookup_references(&self.db, names)
            .await
            .context("lookup references")?;
        Ok(index)
    }
}

// ── Drink repository ─────────────────────────────────────────────────────────

/// Tries at allocating an authored drink id before giving up.
const AUTHORED_ID_ATTEMPTS: u32 = 3;

#[derive(Clone)]
pub struct DbDrinkRepository {
    pub db: DatabaseConnection,
}

impl DrinkRepository for DbDrinkRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<DrinkDetail>, MixologyError> {
        let Some(model) = drinks::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find drink by id")?
        else {
            return Ok(None);
        };

        let instruction_rows = instructions::Entity::find()
            .filter(instructions::Column::DrinkId.eq(id))
            .order_by_asc(instructions::Column::LanguageId)
            .find_also_related(languages::Entity)
            .all(&self.db)
            .await
            .context("load drink instructions")?;
        let mut drink_instructions = Vec::with_capacity(instruction_rows.len());
        for (instruction, language) in instruction_rows {
            let language = language.context("instruction without language")?;
            drink_instructions.push(Instruction {
                language: language_code(&language.code)?,
                text: instruction.text,
            });
        }

        let ingredient_rows = drink_ingredients::Entity::find()
            .filter(drink_ingredients::Column::DrinkId.eq(id))
            .order_by_asc(drink_ingredients::Column::Position)
            .find_also_related(ingredients::Entity)
            .all(&self.db)
            .await
            .context("load drink ingredients")?;
        let mut drink_ingredient_lines = Vec::with_capacity(ingredient_rows.len());
        for (line, ingredient) in ingredient_rows {
            let ingredient = ingredient.context("ingredient line without ingredient")?;
            drink_ingredient_lines.push(DrinkIngredient {
                ingredient: Reference {
                    id: ingredient.id,
                    name: ingredient.name,
                },
                measure: line.measure,
            });
        }

        let mut summaries = summarize(&self.db, vec![model]).await?;
        let drink = summaries.pop().context("summarize drink")?;
        Ok(Some(DrinkDetail {
            drink,
            instructions: drink_instructions,
            ingredients: drink_ingredient_lines,
        }))
    }

    async fn exists(&self, id: i32) -> Result<bool, MixologyError> {
        let count = drinks::Entity::find_by_id(id)
            .count(&self.db)
            .await
            .context("count drink by id")?;
        Ok(count > 0)
    }

    async fn list(
        &self,
        filter: &DrinkFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<DrinkSummary>, MixologyError> {
        let mut query = drinks::Entity::find();
        if let Some(name) = &filter.name {
            let pattern = format!("%{}%", escape_like(&name.to_lowercase()));
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(drinks::Column::Name)))
                    .like(LikeExpr::new(pattern).escape('\\')),
            );
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(drinks::Column::CategoryId.eq(category_id));
        }
        if let Some(author_id) = filter.author_id {
            query = query.filter(drinks::Column::AuthorId.eq(author_id));
        }
        if let Some(ingredient_id) = filter.ingredient_id {
            query = query.filter(
                drinks::Column::Id.in_subquery(
                    Query::select()
                        .column(drink_ingredients::Column::DrinkId)
                        .from(drink_ingredients::Entity)
                        .and_where(
                            Expr::col(drink_ingredients::Column::IngredientId).eq(ingredient_id),
                        )
                        .to_owned(),
                ),
            );
        }
        let models = query
            .order_by_asc(drinks::Column::Name)
            .order_by_asc(drinks::Column::Id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list drinks")?;
        Ok(summarize(&self.db, models).await?)
    }

    async fn save(&self, drink: &NormalizedDrink) -> Result<SaveReport, MixologyError> {
        let report = self
            .db
            .transaction::<_, SaveReport, DbErr>(|txn| {
                let drink = drink.clone();
                Box::pin(async move {
                    let references_created =
                        create_references(txn, &drink.pending_references()).await?;
                    let index = lookup_references(txn, &drink.reference_names()).await?;
                    let resolved = drink
                        .resolve(&index)
                        .map_err(|e| DbErr::Custom(e.to_string()))?;
                    upsert_drink(txn, &resolved).await?;
                    replace_drink_children(txn, &resolved).await?;
                    Ok(SaveReport {
                        drink_id: resolved.id,
                        references_created,
                    })
                })
            })
            .await
            .context("save drink")?;
        Ok(report)
    }

    async fn create_authored(&self, drink: &NormalizedDrink) -> Result<SaveReport, MixologyError> {
        for attempt in 1..=AUTHORED_ID_ATTEMPTS {
            let created = self
                .db
                .transaction::<_, Option<SaveReport>, DbErr>(|txn| {
                    let mut drink = drink.clone();
                    Box::pin(async move {
                        drink.id = next_authored_id(txn).await?;
                        let references_created =
                            create_references(txn, &drink.pending_references()).await?;
                        let index = lookup_references(txn, &drink.reference_names()).await?;
                        let resolved = drink
                            .resolve(&index)
                            .map_err(|e| DbErr::Custom(e.to_string()))?;
                        if !insert_drink(txn, &resolved).await? {
                            return Ok(None);
                        }
                        replace_drink_children(txn, &resolved).await?;
                        Ok(Some(SaveReport {
                            drink_id: resolved.id,
                            references_created,
                        }))
                    })
                })
                .await
                .context("create authored drink")?;
            match created {
                Some(report) => return Ok(report),
                None => tracing::debug!(attempt, "authored drink id taken, retrying"),
            }
        }
        Err(anyhow::anyhow!(
            "no free authored drink id after {AUTHORED_ID_ATTEMPTS} attempts"
        )
        .into())
    }

    async fn delete(&self, id: i32) -> Result<bool, MixologyError> {
        let result = drinks::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete drink")?;
        Ok(result.rows_affected > 0)
    }
}

fn escape_like(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[derive(Debug, FromQueryResult)]
struct MaxIdRow {
    max_id: Option<i32>,
}

/// One past the highest authored id in use, or the floor of the range.
async fn next_authored_id<C: ConnectionTrait>(conn: &C) -> Result<i32, DbErr> {
    let row = drinks::Entity::find()
        .select_only()
        .column_as(Expr::col(drinks::Column::Id).max(), "max_id")
        .filter(drinks::Column::Id.gte(AUTHORED_ID_FLOOR))
        .into_model::<MaxIdRow>()
        .one(conn)
        .await?;
    match row.and_then(|r| r.max_id) {
        None => Ok(AUTHORED_ID_FLOOR),
        Some(max) => max
            .checked_add(1)
            .ok_or_else(|| DbErr::Custom("authored drink ids exhausted".to_owned())),
    }
}

fn drink_model(drink: &ResolvedDrink) -> drinks::ActiveModel {
    drinks::ActiveModel {
        id: Set(drink.id),
        name: Set(drink.name.clone()),
        author_id: Set(drink.author_id),
        image_url: Set(drink.image_url.clone()),
        image_attribution: Set(drink.image_attribution.clone()),
        video_url: Set(drink.video_url.clone()),
        alcoholic: Set(drink.alcoholic),
        optional_alc: Set(drink.optional_alc),
        category_id: Set(drink.category_id),
        glass_id: Set(drink.glass_id),
    }
}

/// Insert a new drink row. Returns `false` if the id is already taken.
async fn insert_drink<C: ConnectionTrait>(conn: &C, drink: &ResolvedDrink) -> Result<bool, DbErr> {
    let inserted = drinks::Entity::insert(drink_model(drink))
        .on_conflict(OnConflict::column(drinks::Column::Id).do_nothing().to_owned())
        .exec_without_returning(conn)
        .await?;
    Ok(inserted == 1)
}

/// Insert or overwrite a drink row by id. The author never changes.
async fn upsert_drink<C: ConnectionTrait>(conn: &C, drink: &ResolvedDrink) -> Result<(), DbErr> {
    drinks::Entity::insert(drink_model(drink))
        .on_conflict(
            OnConflict::column(drinks::Column::Id)
                .update_columns([
                    drinks::Column::Name,
                    drinks::Column::ImageUrl,
                    drinks::Column::ImageAttribution,
                    drinks::Column::VideoUrl,
                    drinks::Column::Alcoholic,
                    drinks::Column::OptionalAlc,
                    drinks::Column::CategoryId,
                    drinks::Column::GlassId,
                ])
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

/// Instructions and ingredient lines are owned by the drink and rewritten on every save.
async fn replace_drink_children<C: ConnectionTrait>(
    conn: &C,
    drink: &ResolvedDrink,
) -> Result<(), DbErr> {
    instructions::Entity::delete_many()
        .filter(instructions::Column::DrinkId.eq(drink.id))
        .exec(conn)
        .await?;
    drink_ingredients::Entity::delete_many()
        .filter(drink_ingredients::Column::DrinkId.eq(drink.id))
        .exec(conn)
        .await?;

    if !drink.instructions.is_empty() {
        let language_ids: HashMap<String, i32> = languages::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .map(|language| (language.code, language.id))
            .collect();
        let mut rows = Vec::with_capacity(drink.instructions.len());
        for instruction in &drink.instructions {
            let code = instruction.language.as_str();
            let language_id = *language_ids
                .get(code)
                .ok_or_else(|| DbErr::Custom(format!("language {code} is not seeded")))?;
            rows.push(instructions::ActiveModel {
                id: NotSet,
                drink_id: Set(drink.id),
                language_id: Set(language_id),
                text: Set(instruction.text.clone()),
            });
        }
        instructions::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
    }

    if !drink.ingredients.is_empty() {
        let rows = drink
            .ingredients
            .iter()
            .map(|line| drink_ingredients::ActiveModel {
                drink_id: Set(drink.id),
                ingredient_id: Set(line.ingredient_id),
                measure: Set(line.measure.clone()),
                position: Set(line.position),
            });
        drink_ingredients::Entity::insert_many(rows)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

/// Attach category and glass rows to drink models, keeping their order.
async fn summarize<C: ConnectionTrait>(
    conn: &C,
    models: Vec<drinks::Model>,
) -> anyhow::Result<Vec<DrinkSummary>> {
    let category_ids: BTreeSet<i32> = models.iter().filter_map(|m| m.category_id).collect();
    let glass_ids: BTreeSet<i32> = models.iter().filter_map(|m| m.glass_id).collect();

    let categories: HashMap<i32, Reference> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        categories::Entity::find()
            .filter(categories::Column::Id.is_in(category_ids))
            .all(conn)
            .await
            .context("load drink categories")?
            .into_iter()
            .map(|m| (m.id, Reference { id: m.id, name: m.name }))
            .collect()
    };
    let glasses: HashMap<i32, Reference> = if glass_ids.is_empty() {
        HashMap::new()
    } else {
        glasses::Entity::find()
            .filter(glasses::Column::Id.is_in(glass_ids))
            .all(conn)
            .await
            .context("load drink glasses")?
            .into_iter()
            .map(|m| (m.id, Reference { id: m.id, name: m.name }))
            .collect()
    };

    Ok(models
        .into_iter()
        .map(|m| DrinkSummary {
            id: m.id,
            author_id: m.author_id,
            category: m.category_id.and_then(|id| categories.get(&id).cloned()),
            glass: m.glass_id.and_then(|id| glasses.get(&id).cloned()),
            name: m.name,
            image_url: m.image_url,
            image_attribution: m.image_attribution,
            video_url: m.video_url,
            alcoholic: m.alcoholic,
            optional_alc: m.optional_alc,
        })
        .collect())
}

// ── Bookmark repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbBookmarkRepository {
    pub db: DatabaseConnection,
}

impl BookmarkRepository for DbBookmarkRepository {
    async fn create(&self, bookmark: &Bookmark) -> Result<bool, MixologyError> {
        let model = bookmarks::ActiveModel {
            user_id: Set(bookmark.user_id),
            drink_id: Set(bookmark.drink_id),
            created_at: Set(bookmark.created_at),
        };
        let inserted = bookmarks::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([bookmarks::Column::UserId, bookmarks::Column::DrinkId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .context("create bookmark")?;
        Ok(inserted == 1)
    }

    async fn delete(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError> {
        let result = bookmarks::Entity::delete_many()
            .filter(bookmarks::Column::UserId.eq(user_id))
            .filter(bookmarks::Column::DrinkId.eq(drink_id))
            .exec(&self.db)
            .await
            .context("delete bookmark")?;
        Ok(result.rows_affected > 0)
    }

    async fn exists(&self, user_id: Uuid, drink_id: i32) -> Result<bool, MixologyError> {
        let count = bookmarks::Entity::find_by_id((user_id, drink_id))
            .count(&self.db)
            .await
            .context("count bookmark")?;
        Ok(count > 0)
    }

    async fn list_drinks(
        &self,
        user_id: Uuid,
        sort_by: BookmarkSortBy,
    ) -> Result<Vec<BookmarkedDrink>, MixologyError> {
        let mut query = bookmarks::Entity::find().filter(bookmarks::Column::UserId.eq(user_id));
        query = match sort_by {
            BookmarkSortBy::CreatedAt(Sort::Desc) => query
                .order_by_desc(bookmarks::Column::CreatedAt)
                .order_by_desc(bookmarks::Column::DrinkId),
            BookmarkSortBy::CreatedAt(Sort::Asc) => query
                .order_by_asc(bookmarks::Column::CreatedAt)
                .order_by_asc(bookmarks::Column::DrinkId),
        };
        let rows = query
            .find_also_related(drinks::Entity)
            .all(&self.db)
            .await
            .context("list bookmarked drinks")?;

        let (bookmarked_at, models): (Vec<_>, Vec<_>) = rows
            .into_iter()
            .filter_map(|(bookmark, drink)| drink.map(|drink| (bookmark.created_at, drink)))
            .unzip();
        let summaries = summarize(&self.db, models).await?;
        Ok(summaries
            .into_iter()
            .zip(bookmarked_at)
            .map(|(drink, bookmarked_at)| BookmarkedDrink {
                drink,
                bookmarked_at,
            })
            .collect())
    }
}
