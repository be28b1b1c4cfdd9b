//! Create `employee` table with FKs to `company` and `office`.
//!
//! Staff accounts; `role` holds the lower-case role name.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(uuid(Employee::Id).primary_key())
                    .col(string_len(Employee::Name, 128))
                    .col(string_len(Employee::Email, 255).unique_key())
                    .col(string_len(Employee::Phone, 32))
                    .col(string_len(Employee::PasswordHash, 128))
                    .col(string_len(Employee::Role, 16))
                    .col(ColumnDef::new(Employee::CompanyId).uuid().null())
                    .col(ColumnDef::new(Employee::OfficeId).uuid().null())
                    .col(timestamp_with_time_zone(Employee::CreatedAt))
                    .col(timestamp_with_time_zone(Employee::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_company")
                            .from(Employee::Table, Employee::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_office")
                            .from(Employee::Table, Employee::OfficeId)
                            .to(Office::Table, Office::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Employee::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Employee { Table, Id, Name, Email, Phone, PasswordHash, Role, CompanyId, OfficeId, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Company { Table, Id }

#[derive(DeriveIden)]
enum Office { Table, Id }
