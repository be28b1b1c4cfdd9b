use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;

use crate::db::{connect_with_config, DatabaseConfig};



/// Fresh in-memory database with the full schema applied.
pub(crate) async fn setup_test_db() -> Result<DatabaseConnection> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

pub(crate) fn hash_placeholder() -> String {
    // Stored as-is; hashing belongs to the service layer.
    "$2b$04$abcdefghijklmnopqrstuuJ5u5yP8bM8b6Gq7oZk1x1Qm2mO4y3e2".to_string()
}
