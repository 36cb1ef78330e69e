use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Name-keyed lookup table: integer id plus a unique lower-cased name.
fn reference_table<T: Iden + 'static>(table: T) -> TableCreateStatement {
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(Reference::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Reference::Name).string().not_null().unique_key())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(reference_table(Categories::Table)).await?;
        manager.create_table(reference_table(Glasses::Table)).await?;
        manager.create_table(reference_table(Ingredients::Table)).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Ingredients::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Glasses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Reference {
    Id,
    Name,
}

#[derive(Iden)]
enum Categories {
    Table,
}

#[derive(Iden)]
enum Glasses {
    Table,
}

#[derive(Iden)]
enum Ingredients {
    Table,
}
