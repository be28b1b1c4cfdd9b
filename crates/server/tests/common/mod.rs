#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use configs::DatabaseConfig;
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use server::routes::{self, auth};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-pass-1";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
}

/// Router over a fresh in-memory database with one admin account.
pub async fn spawn_app() -> anyhow::Result<TestApp> {
    let cfg = DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() };
    let db = models::db::connect_with_config(&cfg).await?;
    migration::Migrator::up(&db, None).await?;
    service::employee_service::ensure_admin(&db, "Root", ADMIN_EMAIL, ADMIN_PASSWORD, 4).await?;

    let state = auth::ServerState::new(
        db.clone(),
        auth::ServerAuthConfig {
            jwt_secret: "test-secret".into(),
            issuer: "logistic_company".into(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        },
    );
    let router = routes::build_router(state, CorsLayer::very_permissive());
    Ok(TestApp { router, db })
}

impl TestApp {
    /// Send a request; `token` is the full `Bearer ...` value returned by `/login`.
    pub async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json)?))?,
            None => builder.body(Body::empty())?,
        };
        let res = self.router.clone().oneshot(req).await?;
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
        Ok((status, value))
    }

    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<String> {
        let (status, body) = self
            .send(Method::POST, "/login", None, Some(serde_json::json!({ "email": email, "password": password })))
            .await?;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        Ok(body["token"].as_str().unwrap_or_default().to_string())
    }

    pub async fn admin_token(&self) -> anyhow::Result<String> {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// POST that must answer 201; returns the created row's id.
    pub async fn create(&self, uri: &str, token: Option<&str>, body: Value) -> anyhow::Result<String> {
        let (status, created) = self.send(Method::POST, uri, token, Some(body)).await?;
        assert_eq!(status, StatusCode::CREATED, "POST {uri} failed: {created}");
        Ok(created["id"].as_str().unwrap_or_default().to_string())
    }

    pub async fn register_client(&self, name: &str, email: &str) -> anyhow::Result<String> {
        self.create(
            "/client/register",
            None,
            serde_json::json!({ "name": name, "email": email, "phone": "+359888000000", "password": "client-pass" }),
        )
        .await
    }
}
