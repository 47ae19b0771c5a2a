use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Decisions: one row per ordered pair; target of the upsert conflict clause
        manager
            .create_index(
                Index::create()
                    .name("uniq_decision_actor_recipient")
                    .table(Decisions::Table)
                    .col(Decisions::ActorId)
                    .col(Decisions::RecipientId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Decisions: "who liked me" listing and like counting
        manager
            .create_index(
                Index::create()
                    .name("idx_decision_recipient_liked")
                    .table(Decisions::Table)
                    .col(Decisions::RecipientId)
                    .col(Decisions::Liked)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("uniq_decision_actor_recipient").table(Decisions::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_decision_recipient_liked").table(Decisions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Decisions { Table, ActorId, RecipientId, Liked }
