use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Drinks::Table)
                    .if_not_exists()
                    // Upstream catalog id, or allocated from the authored range.
                    .col(ColumnDef::new(Drinks::Id).integer().not_null().primary_key())
                    .col(ColumnDef::new(Drinks::Name).string().not_null())
                    .col(ColumnDef::new(Drinks::AuthorId).uuid().null())
                    .col(ColumnDef::new(Drinks::ImageUrl).text().null())
                    .col(ColumnDef::new(Drinks::ImageAttribution).text().null())
                    .col(ColumnDef::new(Drinks::VideoUrl).text().null())
                    .col(
                        ColumnDef::new(Drinks::Alcoholic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Drinks::OptionalAlc)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Drinks::CategoryId).integer().null())
                    .col(ColumnDef::new(Drinks::GlassId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Drinks::Table, Drinks::AuthorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Drinks::Table, Drinks::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Drinks::Table, Drinks::GlassId)
                            .to(Glasses::Table, Glasses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Drinks::Table)
                    .col(Drinks::Name)
                    .name("idx_drinks_name")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Drinks::Table)
                    .col(Drinks::AuthorId)
                    .name("idx_drinks_author_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Drinks::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Drinks {
    Table,
    Id,
    Name,
    AuthorId,
    ImageUrl,
    ImageAttribution,
    VideoUrl,
    Alcoholic,
    OptionalAlc,
    CategoryId,
    GlassId,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
}

#[derive(Iden)]
enum Glasses {
    Table,
    Id,
}
