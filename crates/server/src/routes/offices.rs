use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use common::types::DeletedResponse;
use models::office;
use service::auth::domain::Principal;
use service::office_service::{self, CreateOffice, UpdateOffice};
use service::Pagination;
use tracing::info;
use uuid::Uuid;

use super::auth::{require_role, ServerState, ADMIN_ONLY};
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/api/v1/office", tag = "office", params(crate::openapi::PageQuery), responses((status = 200, description = "Offices")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<office::Model>>, JsonApiError> {
    Ok(Json(office_service::list_offices(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/v1/office/{id}", tag = "office", params(("id" = Uuid, Path, description = "Office id")), responses((status = 200, description = "Office"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<office::Model>, JsonApiError> {
    office_service::get_office(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("office"))
}

#[utoipa::path(get, path = "/api/v1/office/company/{id}", tag = "office", params(("id" = Uuid, Path, description = "Company id")), responses((status = 200, description = "Offices of the company")))]
pub async fn by_company(
    State(state): State<ServerState>,
    Path(company_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<office::Model>>, JsonApiError> {
    Ok(Json(office_service::list_offices_by_company(&state.db, company_id, page).await?))
}

#[utoipa::path(get, path = "/api/v1/office/location/{location}", tag = "office", params(("location" = String, Path, description = "Location fragment")), responses((status = 200, description = "Matching offices")))]
pub async fn by_location(
    State(state): State<ServerState>,
    Path(location): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<office::Model>>, JsonApiError> {
    Ok(Json(office_service::search_offices_by_location(&state.db, &location, page).await?))
}

#[utoipa::path(post, path = "/api/v1/office", tag = "office", request_body = crate::openapi::CreateOfficeRequest, responses((status = 201, description = "Created"), (status = 400, description = "Unknown company"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateOffice>,
) -> Result<(StatusCode, Json<office::Model>), JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    let created = office_service::create_office(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(patch, path = "/api/v1/office/{id}", tag = "office", params(("id" = Uuid, Path, description = "Office id")), request_body = crate::openapi::UpdateOfficeRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateOffice>,
) -> Result<Json<office::Model>, JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    Ok(Json(office_service::update_office(&state.db, id, input).await?))
}

/// Employees and packages of the office move to sibling offices first.
#[utoipa::path(delete, path = "/api/v1/office/{id}", tag = "office", params(("id" = Uuid, Path, description = "Office id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found"), (status = 409, description = "No sibling office can take over")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    let report = office_service::delete_office(&state.db, id).await?;
    info!(office_id = %id, by = %principal.id, reassigned = report.reassigned, "office_delete_request_done");
    Ok(Json(DeletedResponse::new("Office deleted", report.reassigned)))
}
