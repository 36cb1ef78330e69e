use mixology_domain::language::LanguageCode;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Languages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Languages::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Languages::Code)
                            .string_len(16)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Languages::Name).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Seed order fixes the ids: EN = 1 through ZH-HANT = 7.
        let mut seed = Query::insert();
        seed.into_table(Languages::Table)
            .columns([Languages::Code, Languages::Name]);
        for lang in LanguageCode::ALL {
            seed.values_panic([lang.as_str().into(), lang.display_name().into()]);
        }
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Languages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Languages {
    Table,
    Id,
    Code,
    Name,
}
