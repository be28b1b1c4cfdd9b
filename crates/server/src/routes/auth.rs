use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Extension, Json,
};
use models::{client, Role};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use service::auth::domain::{LoginInput, Principal};
use service::auth::errors::AuthError;
use service::auth::repo::seaorm::SeaOrmAuthRepository;
use service::auth::{AuthConfig, AuthService};
use service::client_service::{self, RegisterClient};

use crate::errors::JsonApiError;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub auth: ServerAuthConfig,
    pub authenticator: Arc<AuthService<SeaOrmAuthRepository>>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, auth: ServerAuthConfig) -> Self {
        let repo = Arc::new(SeaOrmAuthRepository::new(db.clone()));
        let authenticator = Arc::new(AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: auth.jwt_secret.clone(),
                issuer: auth.issuer.clone(),
                token_ttl_hours: auth.token_ttl_hours,
            },
        ));
        Self { db, auth, authenticator }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginOutput {
    /// `Bearer <jwt>`, ready for the Authorization header.
    pub token: String,
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

#[utoipa::path(post, path = "/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in"), (status = 401, description = "Invalid email or password")))]
pub async fn login(State(state): State<ServerState>, Json(input): Json<LoginInput>) -> Result<Json<LoginOutput>, JsonApiError> {
    let session = state.authenticator.login(input).await.map_err(|e| match e {
        AuthError::Unauthorized => JsonApiError::unauthorized("Invalid email or password"),
        other => JsonApiError::from(other),
    })?;
    let p = session.principal;
    Ok(Json(LoginOutput { token: format!("Bearer {}", session.token), id: p.id, email: p.email, role: p.role }))
}

#[utoipa::path(post, path = "/client/register", tag = "auth", request_body = crate::openapi::RegisterClientRequest, responses((status = 201, description = "Registered"), (status = 400, description = "Bad Request"), (status = 409, description = "Email already in use")))]
pub async fn register(
    State(state): State<ServerState>,
    Json(input): Json<RegisterClient>,
) -> Result<(StatusCode, Json<client::Model>), JsonApiError> {
    let created = client_service::register_client(&state.db, input, state.auth.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(get, path = "/api/v1/me", tag = "auth", responses((status = 200, description = "Current principal"), (status = 401, description = "Unauthorized")))]
pub async fn me(Extension(principal): Extension<Principal>) -> Json<Principal> {
    Json(principal)
}

/// Guard for `/api/v1`: resolves `Authorization: Bearer <token>` to a
/// [`Principal`] and stores it in the request extensions.
pub async fn require_bearer_token_state(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let token = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string());

    let Some(token) = token.filter(|t| !t.is_empty()) else {
        warn!(%path, "missing_bearer_token");
        return Err(JsonApiError::unauthorized("missing bearer token"));
    };

    let principal = state.authenticator.authenticate(&token).await.map_err(|e| {
        warn!(%path, error = %e, "token_rejected");
        match e {
            AuthError::Repository(_) => JsonApiError::from(e),
            _ => JsonApiError::unauthorized("invalid or expired token"),
        }
    })?;
    info!(%path, account_id = %principal.id, role = %principal.role, "request_authenticated");
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Roles allowed to read and write the staff side of the system.
pub const OFFICE_STAFF: &[Role] = &[Role::Employee, Role::Admin];
pub const ALL_STAFF: &[Role] = &[Role::Employee, Role::Courier, Role::Admin];
pub const ADMIN_ONLY: &[Role] = &[Role::Admin];

pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), JsonApiError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        warn!(account_id = %principal.id, role = %principal.role, "forbidden");
        Err(JsonApiError::forbidden())
    }
}

/// Passes when the caller owns `owner` or holds one of `allowed`.
pub fn require_self_or(principal: &Principal, owner: Uuid, allowed: &[Role]) -> Result<(), JsonApiError> {
    if principal.id == owner {
        return Ok(());
    }
    require_role(principal, allowed)
}
