//! Create `office` table with FK to `company`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Office::Table)
                    .if_not_exists()
                    .col(uuid(Office::Id).primary_key())
                    .col(uuid(Office::CompanyId))
                    .col(string_len(Office::Location, 255))
                    .col(timestamp_with_time_zone(Office::CreatedAt))
                    .col(timestamp_with_time_zone(Office::UpdatedAt))
                    // A company with offices must be emptied before it can go.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_office_company")
                            .from(Office::Table, Office::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Office::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Office { Table, Id, CompanyId, Location, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Company { Table, Id }
