//! Create `package` table.
//!
//! Employee and office references are RESTRICT so the store refuses any
//! delete that would leave a package pointing at a missing row.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Package::Table)
                    .if_not_exists()
                    .col(uuid(Package::Id).primary_key())
                    .col(uuid(Package::SenderId))
                    .col(uuid(Package::ReceiverId))
                    .col(ColumnDef::new(Package::CourierId).uuid().null())
                    .col(ColumnDef::new(Package::RegisteredById).uuid().null())
                    .col(uuid(Package::OfficeAcceptedAtId))
                    .col(ColumnDef::new(Package::OfficeDeliveredAtId).uuid().null())
                    .col(boolean(Package::IsDeliveredToOffice))
                    .col(ColumnDef::new(Package::DeliveryLocation).string_len(255).null())
                    .col(double(Package::Weight))
                    .col(double(Package::Price))
                    .col(string_len(Package::DeliveryStatus, 16))
                    .col(ColumnDef::new(Package::DeliveryDate).timestamp_with_time_zone().null())
                    .col(timestamp_with_time_zone(Package::CreatedAt))
                    .col(timestamp_with_time_zone(Package::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_sender")
                            .from(Package::Table, Package::SenderId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_receiver")
                            .from(Package::Table, Package::ReceiverId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_courier")
                            .from(Package::Table, Package::CourierId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_registered_by")
                            .from(Package::Table, Package::RegisteredById)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_office_accepted")
                            .from(Package::Table, Package::OfficeAcceptedAtId)
                            .to(Office::Table, Office::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_package_office_delivered")
                            .from(Package::Table, Package::OfficeDeliveredAtId)
                            .to(Office::Table, Office::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Package::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Package {
    Table,
    Id,
    SenderId,
    ReceiverId,
    CourierId,
    RegisteredById,
    OfficeAcceptedAtId,
    OfficeDeliveredAtId,
    IsDeliveredToOffice,
    DeliveryLocation,
    Weight,
    Price,
    DeliveryStatus,
    DeliveryDate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Client { Table, Id }

#[derive(DeriveIden)]
enum Employee { Table, Id }

#[derive(DeriveIden)]
enum Office { Table, Id }
