use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: &[(&str, &str, &[&str])] = &[
    ("idx_employee_company_role", "employee", &["company_id", "role"]),
    ("idx_employee_office", "employee", &["office_id"]),
    ("idx_office_company", "office", &["company_id"]),
    ("idx_package_courier", "package", &["courier_id"]),
    ("idx_package_registered_by", "package", &["registered_by_id"]),
    ("idx_package_office_accepted", "package", &["office_accepted_at_id"]),
    ("idx_package_office_delivered", "package", &["office_delivered_at_id"]),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Reassignment lookups filter on every one of these columns.
        for (name, table, cols) in INDEXES {
            let mut index = Index::create();
            index.name(*name).table(Alias::new(*table));
            for col in cols.iter() {
                index.col(Alias::new(*col));
            }
            manager.create_index(index.to_owned()).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (name, table, _) in INDEXES.iter().rev() {
            manager
                .drop_index(Index::drop().name(*name).table(Alias::new(*table)).to_owned())
                .await?;
        }
        Ok(())
    }
}
