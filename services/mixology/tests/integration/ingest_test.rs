use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;
use tracing_subscriber::layer::SubscriberExt;

use mixology::domain::repository::DrinkRepository;
use mixology::error::MixologyError;
use mixology::handlers::drink::DrinkSummaryResponse;
use mixology::infra::db::{DbDrinkRepository, DbReferenceRepository};
use mixology::usecase::catalog::SearchCatalogUseCase;
use mixology::usecase::drink::{GetDrinkUseCase, RefreshDrinkUseCase};
use mixology_domain::language::LanguageCode;
use mixology_schema::{categories, drink_ingredients, drinks, glasses, ingredients, instructions};

use crate::helpers::{
    DownCatalog, MARGARITA_ID, StaticCatalog, WarningCounter, ingest, margarita_record, record,
    sqlite_db,
};

async fn row_counts(db: &sea_orm::DatabaseConnection) -> [u64; 6] {
    [
        drinks::Entity::find().count(db).await.unwrap(),
        categories::Entity::find().count(db).await.unwrap(),
        glasses::Entity::find().count(db).await.unwrap(),
        ingredients::Entity::find().count(db).await.unwrap(),
        instructions::Entity::find().count(db).await.unwrap(),
        drink_ingredients::Entity::find().count(db).await.unwrap(),
    ]
}

// ── IngestDrinkUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_ingest_margarita_into_relational_rows() {
    let db = sqlite_db().await;

    let detail = ingest(&db).execute(&margarita_record()).await.unwrap();

    assert_eq!(detail.drink.id, MARGARITA_ID);
    assert_eq!(detail.drink.name, "Margarita");
    assert!(detail.drink.alcoholic);
    assert!(!detail.drink.optional_alc);
    assert_eq!(detail.drink.image_attribution.as_deref(), Some("Cocktailmarler"));
    assert_eq!(
        detail.drink.category.as_ref().map(|c| c.name.as_str()),
        Some("ordinary drink")
    );
    assert_eq!(
        detail.drink.glass.as_ref().map(|g| g.name.as_str()),
        Some("cocktail glass")
    );

    let languages: Vec<_> = detail.instructions.iter().map(|i| i.language).collect();
    assert_eq!(
        languages,
        vec![LanguageCode::En, LanguageCode::De, LanguageCode::It]
    );

    let lines: Vec<_> = detail
        .ingredients
        .iter()
        .map(|l| (l.ingredient.name.as_str(), l.measure.as_deref()))
        .collect();
    assert_eq!(
        lines,
        vec![
            ("tequila", Some("1 1/2 oz")),
            ("triple sec", Some("1/2 oz")),
            ("lime juice", Some("1 oz")),
            ("salt", None),
        ]
    );
}

#[tokio::test]
async fn should_reingest_without_duplicating_rows() {
    let db = sqlite_db().await;
    let margarita = margarita_record();

    ingest(&db).execute(&margarita).await.unwrap();
    let first = row_counts(&db).await;
    ingest(&db).execute(&margarita).await.unwrap();
    let second = row_counts(&db).await;

    assert_eq!(first, [1, 1, 1, 4, 3, 4]);
    assert_eq!(first, second);
}

#[tokio::test]
async fn should_share_reference_rows_across_drinks() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();

    let tequila_sunrise = record(json!({
        "idDrink": "11009",
        "strDrink": "Tequila Sunrise",
        "strCategory": "  ORDINARY   drink ",
        "strGlass": "Highball glass",
        "strAlcoholic": "Alcoholic",
        "strInstructions": "Pour and stir.",
        "strIngredient1": "TEQUILA",
        "strIngredient2": "Orange juice",
        "strIngredient3": "Grenadine",
        "strMeasure1": "2 measures ",
    }));
    let detail = ingest(&db).execute(&tequila_sunrise).await.unwrap();

    let [_, categories, glasses, ingredients, _, _] = row_counts(&db).await;
    assert_eq!(categories, 1);
    assert_eq!(glasses, 2);
    assert_eq!(ingredients, 6);

    let margarita = ingest(&db).execute(&margarita_record()).await.unwrap();
    assert_eq!(detail.ingredients[0].ingredient, margarita.ingredients[0].ingredient);
    assert_eq!(detail.drink.category, margarita.drink.category);
}

#[tokio::test]
async fn should_reject_record_without_id_and_store_nothing() {
    let db = sqlite_db().await;
    let no_id = record(json!({
        "strDrink": "Mystery",
        "strCategory": "Shot",
        "strIngredient1": "Vodka",
    }));

    let err = ingest(&db).execute(&no_id).await.unwrap_err();

    assert!(
        matches!(err, MixologyError::MalformedRecord(_)),
        "expected MalformedRecord, got {err:?}"
    );
    assert_eq!(row_counts(&db).await, [0, 0, 0, 0, 0, 0]);
}

#[tokio::test]
async fn should_store_optional_alcohol_flags() {
    let db = sqlite_db().await;
    let optional = record(json!({
        "idDrink": 12000,
        "strDrink": "Punch",
        "strAlcoholic": "Optional alcohol",
    }));

    let detail = ingest(&db).execute(&optional).await.unwrap();

    assert!(detail.drink.alcoholic);
    assert!(detail.drink.optional_alc);
    assert!(detail.drink.category.is_none());
    assert!(detail.ingredients.is_empty());
}

#[tokio::test]
async fn should_warn_once_for_unrecognized_alcohol_value() {
    let db = sqlite_db().await;
    let counter = WarningCounter::default();
    let _guard =
        tracing::subscriber::set_default(tracing_subscriber::registry().with(counter.clone()));
    let odd = record(json!({
        "idDrink": 12001,
        "strDrink": "Mystery Punch",
        "strAlcoholic": "Sometimes",
    }));

    let detail = ingest(&db).execute(&odd).await.unwrap();

    assert!(detail.drink.alcoholic);
    assert!(!detail.drink.optional_alc);
    assert_eq!(counter.count(), 1);
}

#[tokio::test]
async fn should_keep_upstream_drink_name_casing() {
    let db = sqlite_db().await;
    let acronym = record(json!({ "idDrink": "17225", "strDrink": "AMF" }));
    let dotted = record(json!({ "idDrink": "17226", "strDrink": "A.D.M. (After Dinner Mint)" }));

    ingest(&db).execute(&acronym).await.unwrap();
    let detail = ingest(&db).execute(&dotted).await.unwrap();

    assert_eq!(detail.drink.name, "A.D.M. (After Dinner Mint)");
    let response = DrinkSummaryResponse::from(detail.drink);
    assert_eq!(response.name, "A.D.M. (After Dinner Mint)");
    let stored = DbDrinkRepository { db: db.clone() }
        .find_by_id(17225)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(DrinkSummaryResponse::from(stored.drink).name, "AMF");
}

// ── GetDrinkUseCase ──────────────────────────────────────────────────────────

fn get_drink<C: mixology::domain::repository::CatalogPort>(
    db: &sea_orm::DatabaseConnection,
    catalog: C,
) -> GetDrinkUseCase<DbReferenceRepository, DbDrinkRepository, C> {
    GetDrinkUseCase {
        drinks: DbDrinkRepository { db: db.clone() },
        ingest: ingest(db),
        catalog,
    }
}

#[tokio::test]
async fn should_materialize_drink_on_first_view_only() {
    let db = sqlite_db().await;
    let catalog = StaticCatalog::new(vec![margarita_record()]);
    let usecase = get_drink(&db, catalog.clone());

    let first = usecase.execute(MARGARITA_ID).await.unwrap();
    let second = usecase.execute(MARGARITA_ID).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(catalog.lookup_count(), 1);
}

#[tokio::test]
async fn should_return_drink_not_found_when_upstream_has_no_match() {
    let db = sqlite_db().await;
    let usecase = get_drink(&db, StaticCatalog::new(vec![]));

    let err = usecase.execute(424242).await.unwrap_err();

    assert!(matches!(err, MixologyError::DrinkNotFound), "got {err:?}");
}

#[tokio::test]
async fn should_surface_catalog_outage_for_unknown_drink() {
    let db = sqlite_db().await;
    let usecase = get_drink(&db, DownCatalog);

    let err = usecase.execute(MARGARITA_ID).await.unwrap_err();

    assert!(matches!(err, MixologyError::CatalogUnavailable), "got {err:?}");
}

#[tokio::test]
async fn should_serve_stored_drink_while_catalog_is_down() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();

    let detail = get_drink(&db, DownCatalog).execute(MARGARITA_ID).await.unwrap();

    assert_eq!(detail.drink.name, "Margarita");
}

// ── RefreshDrinkUseCase ──────────────────────────────────────────────────────

#[tokio::test]
async fn should_refresh_stored_drink_from_changed_upstream_record() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();

    let mut changed = margarita_record();
    changed.name = Some("Margarita (Classic)".to_owned());
    changed.slots.remove("strIngredient4");
    let usecase = RefreshDrinkUseCase {
        ingest: ingest(&db),
        catalog: StaticCatalog::new(vec![changed]),
    };

    let detail = usecase.execute(MARGARITA_ID).await.unwrap();

    assert_eq!(detail.drink.name, "Margarita (Classic)");
    assert_eq!(detail.ingredients.len(), 3);
    let [drinks, _, _, ingredients, _, lines] = row_counts(&db).await;
    assert_eq!(drinks, 1);
    assert_eq!(lines, 3);
    // The orphaned ingredient row stays for other drinks to reuse.
    assert_eq!(ingredients, 4);
}

// ── SearchCatalogUseCase ─────────────────────────────────────────────────────

#[tokio::test]
async fn should_preview_search_hits_without_storing_them() {
    let db = sqlite_db().await;
    let catalog = StaticCatalog::new(vec![
        margarita_record(),
        record(json!({ "strDrink": "Margarita Mix" })),
    ]);
    let usecase = SearchCatalogUseCase { catalog };

    let previews = usecase.execute("  margarita ").await.unwrap();

    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].id, MARGARITA_ID);
    assert_eq!(previews[0].category.as_deref(), Some("Ordinary Drink"));
    assert_eq!(row_counts(&db).await, [0, 0, 0, 0, 0, 0]);
}

#[tokio::test]
async fn should_require_search_term() {
    let usecase = SearchCatalogUseCase {
        catalog: StaticCatalog::new(vec![margarita_record()]),
    };

    let err = usecase.execute("   ").await.unwrap_err();

    assert!(matches!(err, MixologyError::MissingData), "got {err:?}");
}
