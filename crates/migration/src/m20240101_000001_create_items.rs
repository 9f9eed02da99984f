//! Create `items` table.
//!
//! The single persisted table; exercised by the relational CRUD endpoints
//! and the self-test sequence.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Items::Table)
                    .if_not_exists()
                    .col(uuid(Items::Id).primary_key())
                    .col(string_len(Items::Name, 255).not_null())
                    .col(json_binary(Items::Value).not_null())
                    .col(timestamp_with_time_zone(Items::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Items::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Items { Table, Id, Name, Value, CreatedAt }
