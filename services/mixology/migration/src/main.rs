use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(mixology_migration::Migrator).await;
}
