use chrono::Utc;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use serde_json::json;
use uuid::Uuid;

use mixology::domain::normalize::MalformedRecordError;
use mixology::domain::repository::{DrinkRepository, UserRepository};
use mixology::domain::types::{
    AUTHORED_ID_FLOOR, DraftIngredient, DrinkDraft, DrinkDraftChanges, DrinkFilter, User,
};
use mixology::error::MixologyError;
use mixology::infra::db::{
    DbBookmarkRepository, DbDrinkRepository, DbLanguageRepository, DbReferenceRepository,
    DbUserRepository,
};
use mixology::usecase::bookmark::ToggleBookmarkUseCase;
use mixology::usecase::drink::{
    CreateDrinkUseCase, DeleteDrinkUseCase, GetDrinkUseCase, ListDrinksUseCase,
    RefreshDrinkUseCase, UpdateDrinkUseCase,
};
use mixology_domain::language::LanguageCode;
use mixology_domain::pagination::PageRequest;
use mixology_schema::{bookmarks, drink_ingredients, instructions};

use crate::helpers::{MARGARITA_ID, StaticCatalog, ingest, margarita_record, record, sqlite_db};

async fn author(db: &DatabaseConnection, username: &str, language_id: i32) -> User {
    let now = Utc::now();
    let user = User {
        id: Uuid::now_v7(),
        username: username.to_owned(),
        password_hash: "$argon2id$placeholder".to_owned(),
        language_id,
        created_at: now,
        updated_at: now,
    };
    assert!(DbUserRepository { db: db.clone() }.create(&user).await.unwrap());
    user
}

fn create(
    db: &DatabaseConnection,
) -> CreateDrinkUseCase<DbReferenceRepository, DbDrinkRepository, DbLanguageRepository> {
    CreateDrinkUseCase {
        references: DbReferenceRepository { db: db.clone() },
        drinks: DbDrinkRepository { db: db.clone() },
        languages: DbLanguageRepository { db: db.clone() },
    }
}

fn update(
    db: &DatabaseConnection,
) -> UpdateDrinkUseCase<DbReferenceRepository, DbDrinkRepository, DbLanguageRepository> {
    UpdateDrinkUseCase {
        references: DbReferenceRepository { db: db.clone() },
        drinks: DbDrinkRepository { db: db.clone() },
        languages: DbLanguageRepository { db: db.clone() },
    }
}

fn house_sour() -> DrinkDraft {
    DrinkDraft {
        name: "House Sour".to_owned(),
        category: Some("Ordinary Drink".to_owned()),
        glass: Some("Coupe".to_owned()),
        alcoholic: true,
        optional_alc: false,
        instructions: Some("Shake with ice and strain.".to_owned()),
        ingredients: vec![
            DraftIngredient {
                name: "Tequila".to_owned(),
                measure: Some("2 oz".to_owned()),
            },
            DraftIngredient {
                name: "Lemon Juice".to_owned(),
                measure: Some("1 oz".to_owned()),
            },
        ],
    }
}

// ── CreateDrinkUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_create_authored_drinks_in_reserved_id_range() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();
    let alice = author(&db, "alice", 2).await;

    let first = create(&db).execute(&alice, &house_sour()).await.unwrap();
    let second = create(&db).execute(&alice, &house_sour()).await.unwrap();

    assert_eq!(first.drink.id, AUTHORED_ID_FLOOR);
    assert_eq!(second.drink.id, AUTHORED_ID_FLOOR + 1);
    assert_eq!(first.drink.author_id, Some(alice.id));
    assert_eq!(first.drink.name, "House Sour");
    assert_eq!(first.instructions.len(), 1);
    assert_eq!(first.instructions[0].language, LanguageCode::De);
    // Shared references are reused, not duplicated.
    let margarita = DbDrinkRepository { db: db.clone() }
        .find_by_id(MARGARITA_ID)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.drink.category, margarita.drink.category);
    assert_eq!(first.ingredients[0].ingredient, margarita.ingredients[0].ingredient);
    assert_eq!(first.ingredients[1].measure.as_deref(), Some("1 oz"));
}

#[tokio::test]
async fn should_reject_blank_drink_name() {
    let db = sqlite_db().await;
    let alice = author(&db, "alice", 1).await;
    let mut draft = house_sour();
    draft.name = "  ".to_owned();

    let err = create(&db).execute(&alice, &draft).await.unwrap_err();

    assert!(matches!(err, MixologyError::InvalidDrink(_)), "got {err:?}");
}

#[tokio::test]
async fn should_refuse_upstream_record_with_authored_id() {
    let db = sqlite_db().await;
    let impostor = record(json!({
        "idDrink": AUTHORED_ID_FLOOR.to_string(),
        "strDrink": "Impostor",
    }));

    let err = ingest(&db).execute(&impostor).await.unwrap_err();

    assert!(
        matches!(
            err,
            MixologyError::MalformedRecord(MalformedRecordError::ReservedId(AUTHORED_ID_FLOOR))
        ),
        "got {err:?}"
    );
}

// ── UpdateDrinkUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_update_own_drink_and_keep_instruction_language() {
    let db = sqlite_db().await;
    let alice = author(&db, "alice", 2).await;
    let created = create(&db).execute(&alice, &house_sour()).await.unwrap();

    let updated = update(&db)
        .execute(
            &alice,
            created.drink.id,
            DrinkDraftChanges {
                name: Some("House Sour No. 2".to_owned()),
                glass: Some(String::new()),
                instructions: Some("Dry shake first.".to_owned()),
                ingredients: Some(vec![DraftIngredient {
                    name: "Mezcal".to_owned(),
                    measure: None,
                }]),
                ..DrinkDraftChanges::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.drink.id, created.drink.id);
    assert_eq!(updated.drink.name, "House Sour No. 2");
    assert_eq!(updated.drink.category, created.drink.category);
    assert!(updated.drink.glass.is_none());
    assert_eq!(updated.instructions.len(), 1);
    assert_eq!(updated.instructions[0].language, LanguageCode::De);
    assert_eq!(updated.instructions[0].text, "Dry shake first.");
    assert_eq!(updated.ingredients.len(), 1);
    assert_eq!(updated.ingredients[0].ingredient.name, "mezcal");
}

#[tokio::test]
async fn should_refuse_updates_from_anyone_but_the_author() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();
    let alice = author(&db, "alice", 1).await;
    let bob = author(&db, "bob", 1).await;
    let created = create(&db).execute(&alice, &house_sour()).await.unwrap();
    let rename = || DrinkDraftChanges {
        name: Some("Stolen".to_owned()),
        ..DrinkDraftChanges::default()
    };

    let err = update(&db)
        .execute(&bob, created.drink.id, rename())
        .await
        .unwrap_err();
    assert!(matches!(err, MixologyError::NotDrinkAuthor), "got {err:?}");

    let err = update(&db)
        .execute(&alice, MARGARITA_ID, rename())
        .await
        .unwrap_err();
    assert!(matches!(err, MixologyError::NotDrinkAuthor), "got {err:?}");

    let err = update(&db)
        .execute(&alice, AUTHORED_ID_FLOOR + 50, rename())
        .await
        .unwrap_err();
    assert!(matches!(err, MixologyError::DrinkNotFound), "got {err:?}");

    let err = update(&db)
        .execute(&alice, created.drink.id, DrinkDraftChanges::default())
        .await
        .unwrap_err();
    assert!(matches!(err, MixologyError::MissingData), "got {err:?}");

    let stored = DbDrinkRepository { db: db.clone() }
        .find_by_id(created.drink.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.drink.name, "House Sour");
}

// ── DeleteDrinkUseCase ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_let_only_the_author_delete_an_authored_drink() {
    let db = sqlite_db().await;
    let alice = author(&db, "alice", 1).await;
    let bob = author(&db, "bob", 1).await;
    let created = create(&db).execute(&alice, &house_sour()).await.unwrap();
    let usecase = DeleteDrinkUseCase {
        drinks: DbDrinkRepository { db: db.clone() },
    };

    let err = usecase.execute(bob.id, created.drink.id).await.unwrap_err();
    assert!(matches!(err, MixologyError::NotDrinkAuthor), "got {err:?}");

    usecase.execute(alice.id, created.drink.id).await.unwrap();
    let err = usecase.execute(alice.id, created.drink.id).await.unwrap_err();
    assert!(matches!(err, MixologyError::DrinkNotFound), "got {err:?}");
}

// ── Listing and lookup ───────────────────────────────────────────────────────

#[tokio::test]
async fn should_list_only_the_authors_drinks() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();
    let alice = author(&db, "alice", 1).await;
    let bob = author(&db, "bob", 1).await;
    create(&db).execute(&alice, &house_sour()).await.unwrap();
    let mut bobs = house_sour();
    bobs.name = "Bob's Punch".to_owned();
    create(&db).execute(&bob, &bobs).await.unwrap();
    let usecase = ListDrinksUseCase {
        drinks: DbDrinkRepository { db: db.clone() },
    };

    let page = usecase
        .execute(
            DrinkFilter {
                author_id: Some(alice.id),
                ..DrinkFilter::default()
            },
            PageRequest::default(),
        )
        .await
        .unwrap();

    let names: Vec<_> = page.drinks.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, ["House Sour"]);
    assert!(!page.next);

    let everything = usecase
        .execute(DrinkFilter::default(), PageRequest::default())
        .await
        .unwrap();
    assert_eq!(everything.drinks.len(), 3);
}

#[tokio::test]
async fn should_never_ask_upstream_for_authored_ids() {
    let db = sqlite_db().await;
    let catalog = StaticCatalog::new(vec![margarita_record()]);
    let get = GetDrinkUseCase {
        drinks: DbDrinkRepository { db: db.clone() },
        ingest: ingest(&db),
        catalog: catalog.clone(),
    };
    let refresh = RefreshDrinkUseCase {
        ingest: ingest(&db),
        catalog: catalog.clone(),
    };

    let err = get.execute(AUTHORED_ID_FLOOR + 7).await.unwrap_err();
    assert!(matches!(err, MixologyError::DrinkNotFound), "got {err:?}");
    let err = refresh.execute(AUTHORED_ID_FLOOR).await.unwrap_err();
    assert!(matches!(err, MixologyError::DrinkNotFound), "got {err:?}");

    assert_eq!(catalog.lookup_count(), 0);
}

// ── Cascades ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_cascade_user_deletion_to_authored_drinks() {
    let db = sqlite_db().await;
    ingest(&db).execute(&margarita_record()).await.unwrap();
    let alice = author(&db, "alice", 1).await;
    let bob = author(&db, "bob", 1).await;
    let created = create(&db).execute(&alice, &house_sour()).await.unwrap();
    let toggle = ToggleBookmarkUseCase {
        bookmarks: DbBookmarkRepository { db: db.clone() },
        drinks: DbDrinkRepository { db: db.clone() },
    };
    toggle.execute(bob.id, created.drink.id).await.unwrap();
    toggle.execute(bob.id, MARGARITA_ID).await.unwrap();
    let drinks = DbDrinkRepository { db: db.clone() };

    assert!(DbUserRepository { db: db.clone() }.delete(alice.id).await.unwrap());

    assert!(drinks.find_by_id(created.drink.id).await.unwrap().is_none());
    let margarita = drinks.find_by_id(MARGARITA_ID).await.unwrap().unwrap();
    assert_eq!(margarita.instructions.len(), 3);
    assert_eq!(margarita.ingredients.len(), 4);
    // Only the Margarita's own rows and bob's bookmark on it remain.
    assert_eq!(instructions::Entity::find().count(&db).await.unwrap(), 3);
    assert_eq!(drink_ingredients::Entity::find().count(&db).await.unwrap(), 4);
    assert_eq!(bookmarks::Entity::find().count(&db).await.unwrap(), 1);
}
