use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use common::types::DeletedResponse;
use models::client;
use service::auth::domain::Principal;
use service::client_service::{self, UpdateClient};
use service::Pagination;
use uuid::Uuid;

use super::auth::{require_role, require_self_or, ServerState, OFFICE_STAFF};
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/api/v1/client", tag = "client", params(crate::openapi::PageQuery), responses((status = 200, description = "Clients"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<client::Model>>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(client_service::list_clients(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/v1/client/{id}", tag = "client", params(("id" = Uuid, Path, description = "Client id")), responses((status = 200, description = "Client"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<client::Model>, JsonApiError> {
    require_self_or(&principal, id, OFFICE_STAFF)?;
    client_service::get_client(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("client"))
}

#[utoipa::path(get, path = "/api/v1/client/company/{id}", tag = "client", params(("id" = Uuid, Path, description = "Company id")), responses((status = 200, description = "Clients whose favourite office belongs to the company"), (status = 403, description = "Forbidden")))]
pub async fn by_company(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<client::Model>>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(client_service::list_clients_by_company(&state.db, company_id, page).await?))
}

#[utoipa::path(get, path = "/api/v1/client/search/{name}", tag = "client", params(("name" = String, Path, description = "Name fragment")), responses((status = 200, description = "Matching clients"), (status = 403, description = "Forbidden")))]
pub async fn search(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(name): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<client::Model>>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(client_service::search_clients(&state.db, &name, page).await?))
}

#[utoipa::path(patch, path = "/api/v1/client/{id}", tag = "client", params(("id" = Uuid, Path, description = "Client id")), request_body = crate::openapi::UpdateClientRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateClient>,
) -> Result<Json<client::Model>, JsonApiError> {
    require_self_or(&principal, id, OFFICE_STAFF)?;
    Ok(Json(client_service::update_client(&state.db, id, input, state.auth.bcrypt_cost).await?))
}

#[utoipa::path(delete, path = "/api/v1/client/{id}", tag = "client", params(("id" = Uuid, Path, description = "Client id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    require_self_or(&principal, id, OFFICE_STAFF)?;
    client_service::delete_client(&state.db, id).await?;
    Ok(Json(DeletedResponse::new("Client deleted", 0)))
}
