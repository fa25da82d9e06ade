//! Create `artifact` table with a nullable FK to `wizard`.
//!
//! Deleting a wizard leaves its artifacts in place with `owner_id` cleared.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artifact::Table)
                    .if_not_exists()
                    .col(string_len(Artifact::Id, 32).primary_key())
                    .col(string_len(Artifact::Name, 128).not_null())
                    .col(text(Artifact::Description).not_null())
                    .col(text(Artifact::ImageUrl).not_null())
                    .col(ColumnDef::new(Artifact::OwnerId).integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artifact_owner")
                            .from(Artifact::Table, Artifact::OwnerId)
                            .to(Wizard::Table, Wizard::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Artifact::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Artifact { Table, Id, Name, Description, ImageUrl, OwnerId }

#[derive(DeriveIden)]
enum Wizard { Table, Id }
