//! Apply pending migrations and, when `ADMIN_EMAIL` and `ADMIN_PASSWORD`
//! are set, make sure that admin account exists.

use anyhow::Context;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = server::startup::load_config()?;
    common::utils::logging::init_logging(&cfg.logging.format);

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .context("connecting to database")?;
    migration::Migrator::up(&db, None).await.context("applying migrations")?;
    info!(service = "migrate", event = "migrated", "migrations applied");

    if let (Ok(email), Ok(password)) = (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
        let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".into());
        let admin = service::employee_service::ensure_admin(&db, &name, &email, &password, cfg.auth.bcrypt_cost)
            .await
            .context("seeding admin")?;
        info!(service = "migrate", event = "admin_ready", admin_id = %admin.id, "admin account ready");
    }
    Ok(())
}
