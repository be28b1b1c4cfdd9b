use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use common::types::DeletedResponse;
use models::{employee, Role};
use service::auth::domain::Principal;
use service::employee_service::{self, CreateEmployee, UpdateEmployee};
use service::Pagination;
use uuid::Uuid;

use super::auth::{require_role, require_self_or, ServerState, ADMIN_ONLY, OFFICE_STAFF};
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/api/v1/employee", tag = "employee", params(crate::openapi::PageQuery), responses((status = 200, description = "Employees"), (status = 403, description = "Forbidden")))]
pub async fn list(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<employee::Model>>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(employee_service::list_employees(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/v1/employee/{id}", tag = "employee", params(("id" = Uuid, Path, description = "Employee id")), responses((status = 200, description = "Employee"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn get(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<employee::Model>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    employee_service::get_employee(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("employee"))
}

#[utoipa::path(get, path = "/api/v1/employee/company/{id}", tag = "employee", params(("id" = Uuid, Path, description = "Company id")), responses((status = 200, description = "Employees of the company"), (status = 403, description = "Forbidden")))]
pub async fn by_company(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(company_id): Path<Uuid>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<employee::Model>>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(employee_service::list_employees_by_company(&state.db, company_id, page).await?))
}

#[utoipa::path(get, path = "/api/v1/employee/search/{name}", tag = "employee", params(("name" = String, Path, description = "Name fragment")), responses((status = 200, description = "Matching employees"), (status = 403, description = "Forbidden")))]
pub async fn search(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(name): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<employee::Model>>, JsonApiError> {
    require_role(&principal, OFFICE_STAFF)?;
    Ok(Json(employee_service::search_employees(&state.db, &name, page).await?))
}

#[utoipa::path(post, path = "/api/v1/employee", tag = "employee", request_body = crate::openapi::CreateEmployeeRequest, responses((status = 201, description = "Created"), (status = 400, description = "Bad Request"), (status = 403, description = "Forbidden"), (status = 409, description = "Email already in use")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateEmployee>,
) -> Result<(StatusCode, Json<employee::Model>), JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    let created = employee_service::create_employee(&state.db, input, state.auth.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Admins may change anything; an employee editing their own record may
/// not touch role or placement.
#[utoipa::path(patch, path = "/api/v1/employee/{id}", tag = "employee", params(("id" = Uuid, Path, description = "Employee id")), request_body = crate::openapi::UpdateEmployeeRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateEmployee>,
) -> Result<Json<employee::Model>, JsonApiError> {
    require_self_or(&principal, id, ADMIN_ONLY)?;
    let touches_placement = input.role.is_some() || input.company_id.is_some() || input.office_id.is_some();
    if principal.role != Role::Admin && touches_placement {
        return Err(JsonApiError::forbidden());
    }
    Ok(Json(employee_service::update_employee(&state.db, id, input, state.auth.bcrypt_cost).await?))
}

/// Packages of the employee move to colleagues first; admins cannot be deleted.
#[utoipa::path(delete, path = "/api/v1/employee/{id}", tag = "employee", params(("id" = Uuid, Path, description = "Employee id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Forbidden or protected"), (status = 404, description = "Not Found"), (status = 409, description = "No colleague can take over")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    let report = employee_service::delete_employee(&state.db, id).await?;
    Ok(Json(DeletedResponse::new("Employee deleted", report.reassigned)))
}
