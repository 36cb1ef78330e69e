use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Instructions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Instructions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Instructions::DrinkId).integer().not_null())
                    .col(ColumnDef::new(Instructions::LanguageId).integer().not_null())
                    .col(ColumnDef::new(Instructions::Text).text().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Instructions::Table, Instructions::DrinkId)
                            .to(Drinks::Table, Drinks::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Instructions::Table, Instructions::LanguageId)
                            .to(Languages::Table, Languages::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Instructions::Table)
                    .col(Instructions::DrinkId)
                    .col(Instructions::LanguageId)
                    .unique()
                    .name("uq_instructions_drink_language")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Instructions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Instructions {
    Table,
    Id,
    DrinkId,
    LanguageId,
    Text,
}

#[derive(Iden)]
enum Drinks {
    Table,
    Id,
}

#[derive(Iden)]
enum Languages {
    Table,
    Id,
}
