mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::spawn_app;

#[tokio::test]
async fn health_is_public() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, body) = app.send(Method::GET, "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let id = app.register_client("Maria", "Maria@Example.com").await?;

    let token = app.login("maria@example.com", "client-pass").await?;
    assert!(token.starts_with("Bearer "));

    let (status, me) = app.send(Method::GET, "/api/v1/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id);
    assert_eq!(me["role"], "client");
    assert_eq!(me["email"], "maria@example.com");
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_rejected_generically() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.register_client("Ivan", "ivan@example.com").await?;

    for (email, password) in [("ivan@example.com", "nope-nope"), ("ghost@example.com", "client-pass")] {
        let (status, body) = app
            .send(Method::POST, "/login", None, Some(json!({ "email": email, "password": password })))
            .await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid email or password");
    }
    Ok(())
}

#[tokio::test]
async fn api_requires_a_valid_bearer_token() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, body) = app.send(Method::GET, "/api/v1/company", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = app.send(Method::GET, "/api/v1/company", Some("Bearer not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = app.admin_token().await?;
    let raw = token.trim_start_matches("Bearer ");
    let (status, _) = app.send(Method::GET, "/api/v1/company", Some(raw), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn duplicate_email_conflicts_across_account_kinds() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, body) = app
        .send(
            Method::POST,
            "/client/register",
            None,
            Some(json!({ "name": "Fake", "email": common::ADMIN_EMAIL, "phone": "1", "password": "whatever-1" })),
        )
        .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");
    Ok(())
}

#[tokio::test]
async fn short_password_is_a_validation_error() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (status, _) = app
        .send(
            Method::POST,
            "/client/register",
            None,
            Some(json!({ "name": "Shorty", "email": "short@example.com", "phone": "1", "password": "abc" })),
        )
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn role_gates_return_forbidden() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    app.register_client("Petar", "petar@example.com").await?;
    let client = app.login("petar@example.com", "client-pass").await?;

    let (status, body) = app
        .send(Method::POST, "/api/v1/company", Some(&client), Some(json!({ "name": "Nope" })))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _) = app.send(Method::GET, "/api/v1/employee", Some(&client), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.send(Method::GET, "/api/v1/client", Some(&client), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Company reads are open to any authenticated caller.
    let (status, _) = app.send(Method::GET, "/api/v1/company", Some(&client), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn token_of_deleted_account_stops_working() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let id = app.register_client("Gone", "gone@example.com").await?;
    let token = app.login("gone@example.com", "client-pass").await?;

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/client/{id}"), Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reassigned"], 0);

    let (status, _) = app.send(Method::GET, "/api/v1/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
