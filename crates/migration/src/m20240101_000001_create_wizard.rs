//! Create `wizard` table.
//!
//! Owners of artifacts; ids are generated by the store.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Wizard::Table)
                    .if_not_exists()
                    .col(pk_auto(Wizard::Id))
                    .col(string_len(Wizard::Name, 128).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Wizard::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Wizard { Table, Id, Name }
