//! Migrator registering entity-specific migrations in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000011_create_company;
mod m20240601_000012_create_office;
mod m20240601_000013_create_employee;
mod m20240601_000014_create_client;
mod m20240601_000015_create_package;
mod m20240601_000016_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000011_create_company::Migration),
            Box::new(m20240601_000012_create_office::Migration),
            Box::new(m20240601_000013_create_employee::Migration),
            Box::new(m20240601_000014_create_client::Migration),
            Box::new(m20240601_000015_create_package::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000016_add_indexes::Migration),
        ]
    }
}
