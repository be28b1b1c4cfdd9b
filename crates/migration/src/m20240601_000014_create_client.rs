//! Create `client` table.
//!
//! Senders and receivers of packages; the favourite office is optional.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(uuid(Client::Id).primary_key())
                    .col(string_len(Client::Name, 128))
                    .col(string_len(Client::Email, 255).unique_key())
                    .col(string_len(Client::Phone, 32))
                    .col(string_len(Client::PasswordHash, 128))
                    .col(ColumnDef::new(Client::FavoriteOfficeId).uuid().null())
                    .col(timestamp_with_time_zone(Client::CreatedAt))
                    .col(timestamp_with_time_zone(Client::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_client_favorite_office")
                            .from(Client::Table, Client::FavoriteOfficeId)
                            .to(Office::Table, Office::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Client::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Client { Table, Id, Name, Email, Phone, PasswordHash, FavoriteOfficeId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Office { Table, Id }
