use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use common::types::DeletedResponse;
use models::package;
use service::auth::domain::Principal;
use service::package_service::{self, CreatePackage, UpdatePackage};
use service::Pagination;
use uuid::Uuid;

use super::auth::{require_role, require_self_or, ServerState, ALL_STAFF, OFFICE_STAFF};
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/api/v1/package", tag = "package", params(crate::openapi::PageQuery), responses((status = 200, description = "Packages, newest first"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<package::Model>>, JsonApiError> {
    require_role(&principal, ALL_STAFF)?;
    Ok(Json(package_service::list_packages(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/v1/package/not-delivered", tag = "package", params(crate::openapi::PageQuery), responses((status = 200, description = "Packages without a delivery date"), (status = 403, description = "Forbidden")))]
pub async fn not_delivered(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<package::Model>>, JsonApiError> {
    require_role(&principal, ALL_STAFF)?;
    Ok(Json(package_service::list_not_delivered(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/v1/package/sender/{id}", tag = "package", params(("id" = Uuid, Path, description = "Client id")), responses((status = 200, description = "Packages sent by the client"), (status = 403, description = "Forbidden")))]
pub async fn by_sender(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<package::Model>>, JsonApiError> {
    require_self_or(&principal, id, ALL_STAFF)?;
    Ok(Json(package_service::list_packages_by_sender(&state.db, id, page).await?))
}

#[utoipa::path(get, path = "/api/v1/package/receiver/{id}", tag = "package", params(("id" = Uuid, Path, description = "Client id")), responses((status = 200, description = "Packages addressed to the client"), (status = 403, description = "Forbidden")))]
pub async fn by_receiver(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<package::Model>>, JsonApiError> {
    require_self_or(&principal, id, ALL_STAFF)?;
    Ok(Json(package_service::list_packages_by_receiver(&state.db, id, page).await?))
}

#[utoipa::path(get, path = "/api/v1/package/employee/{id}", tag = "package", params(("id" = Uuid, Path, description = "Employee id")), responses((status = 200, description = "Packages carried or registered by the employee"), (status = 403, description = "Forbidden")))]
pub async fn by_employee(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<package::Model>>, JsonApiError> {
    require_self_or(&principal, id, ALL_STAFF)?;
    Ok(Json(package_service::list_packages_by_employee(&state.db, id, page).await?))
}

#[utoipa::path(get, path = "/api/v1/package/{id}", tag = "package", params(("id" = Uuid, Path, description = "Package id")), responses((status = 200, description = "Package"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<package::Model>, JsonApiError> {
    let found = package_service::get_package(&state.db, id)
        .await?
        .ok_or_else(|| JsonApiError::not_found("package"))?;
    if principal.id != found.sender_id && principal.id != found.receiver_id {
        require_role(&principal, ALL_STAFF)?;
    }
    Ok(Json(found))
}

/// The caller is recorded as the registering employee.
#[utoipa::path(post, path = "/api/v1/package", tag = "package", request_body = crate::openapi::CreatePackageRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 403, description = "Forbidden")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreatePackage>,
) -> Result<(StatusCode, Json<package::Model>), JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    let created = package_service::create_package(&state.db, input, Some(principal.id)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(patch, path = "/api/v1/package/{id}", tag = "package", params(("id" = Uuid, Path, description = "Package id")), request_body = crate::openapi::UpdatePackageRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdatePackage>,
) -> Result<Json<package::Model>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(package_service::update_package(&state.db, id, input).await?))
}

#[utoipa::path(post, path = "/api/v1/package/{id}/deliver", tag = "package", params(("id" = Uuid, Path, description = "Package id")), responses((status = 200, description = "Marked delivered"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn deliver(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<package::Model>, JsonApiError> {
    require_role(&principal, ALL_STAFF)?;
    Ok(Json(package_service::mark_delivered(&state.db, id).await?))
}

#[utoipa::path(delete, path = "/api/v1/package/{id}", tag = "package", params(("id" = Uuid, Path, description = "Package id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    package_service::delete_package(&state.db, id).await?;
    Ok(Json(DeletedResponse::new("Package deleted", 0)))
}
