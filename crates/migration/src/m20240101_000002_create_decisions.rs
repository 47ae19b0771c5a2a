//! Create `decisions` table: one directed like/pass per (actor, recipient).
//!
//! No FK to `users`; decisions may reference accounts the user table has not
//! seen yet.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Decisions::Table)
                    .if_not_exists()
                    .col(uuid(Decisions::Id).primary_key())
                    .col(string_len(Decisions::ActorId, 64).not_null())
                    .col(string_len(Decisions::RecipientId, 64).not_null())
                    .col(boolean(Decisions::Liked).not_null())
                    .col(boolean(Decisions::IsNew).not_null().default(true))
                    .col(timestamp_with_time_zone(Decisions::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Decisions::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Decisions::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Decisions { Table, Id, ActorId, RecipientId, Liked, IsNew, CreatedAt, UpdatedAt }
