use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use common::utils::logging::init_logging;
use configs::AppConfig;
use dotenvy::dotenv;
use migration::MigratorTrait;
use rand::RngCore;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// `config.toml` (or `CONFIG_PATH`) when present, environment otherwise.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        AppConfig::load_and_validate()
    } else {
        AppConfig::from_env()
    }
}

/// An empty secret is replaced by a random one; tokens then die with the process.
pub fn resolve_jwt_secret(configured: &str) -> String {
    if !configured.trim().is_empty() {
        return configured.to_string();
    }
    warn!("JWT secret not configured; generating a random secret for this process");
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn build_state(db: sea_orm::DatabaseConnection, cfg: &AppConfig) -> auth::ServerState {
    auth::ServerState::new(
        db,
        auth::ServerAuthConfig {
            jwt_secret: resolve_jwt_secret(&cfg.auth.jwt_secret),
            issuer: cfg.auth.issuer.clone(),
            token_ttl_hours: cfg.auth.token_ttl_hours,
            bcrypt_cost: cfg.auth.bcrypt_cost,
        },
    )
}

pub fn build_app(state: auth::ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Public entry: load config, connect, optionally migrate and serve.
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    let cfg = load_config().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    init_logging(&cfg.logging.format);

    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None).await?;
        info!("migrations applied");
    }

    let app = build_app(build_state(db, &cfg));
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
