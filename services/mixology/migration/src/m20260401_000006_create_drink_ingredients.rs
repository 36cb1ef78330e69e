use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DrinkIngredients::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(DrinkIngredients::DrinkId).integer().not_null())
                    .col(
                        ColumnDef::new(DrinkIngredients::IngredientId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DrinkIngredients::Measure).string().null())
                    .col(
                        ColumnDef::new(DrinkIngredients::Position)
                            .small_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(DrinkIngredients::DrinkId)
                            .col(DrinkIngredients::IngredientId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DrinkIngredients::Table, DrinkIngredients::DrinkId)
                            .to(Drinks::Table, Drinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(DrinkIngredients::Table, DrinkIngredients::IngredientId)
                            .to(Ingredients::Table, Ingredients::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(DrinkIngredients::Table)
                    .col(DrinkIngredients::IngredientId)
                    .name("idx_drink_ingredients_ingredient_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DrinkIngredients::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DrinkIngredients {
    Table,
    DrinkId,
    IngredientId,
    Measure,
    Position,
}

#[derive(Iden)]
enum Drinks {
    Table,
    Id,
}

#[derive(Iden)]
enum Ingredients {
    Table,
    Id,
}
