use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Artifact: owner lookups back every wizard's artifact list
        manager
            .create_index(
                Index::create()
                    .name("idx_artifact_owner")
                    .table(Artifact::Table)
                    .col(Artifact::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_artifact_owner").table(Artifact::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Artifact { Table, OwnerId }
