pub use sea_orm_migration::prelude::*;

mod m20260401_000001_create_languages;
mod m20260401_000002_create_users;
mod m20260401_000003_create_reference_tables;
mod m20260401_000004_create_drinks;
mod m20260401_000005_create_instructions;
mod m20260401_000006_create_drink_ingredients;
mod m20260401_000007_create_bookmarks;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_languages::Migration),
            Box::new(m20260401_000002_create_users::Migration),
            Box::new(m20260401_000003_create_reference_tables::Migration),
            Box::new(m20260401_000004_create_drinks::Migration),
            Box::new(m20260401_000005_create_instructions::Migration),
            Box::new(m20260401_000006_create_drink_ingredients::Migration),
            Box::new(m20260401_000007_create_bookmarks::Migration),
        ]
    }
}
