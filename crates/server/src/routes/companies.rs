use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use common::types::DeletedResponse;
use models::company;
use service::auth::domain::Principal;
use service::company_service::{self, CompanyRevenue, CreateCompany, RevenuePeriod, UpdateCompany};
use service::Pagination;
use uuid::Uuid;

use super::auth::{require_role, ServerState, ADMIN_ONLY};
use crate::errors::JsonApiError;

#[utoipa::path(get, path = "/api/v1/company", tag = "company", params(crate::openapi::PageQuery), responses((status = 200, description = "Companies")))]
pub async fn list(
    State(state): State<ServerState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<company::Model>>, JsonApiError> {
    Ok(Json(company_service::list_companies(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/v1/company/{id}", tag = "company", params(("id" = Uuid, Path, description = "Company id")), responses((status = 200, description = "Company"), (status = 404, description = "Not Found")))]
pub async fn get(State(state): State<ServerState>, Path(id): Path<Uuid>) -> Result<Json<company::Model>, JsonApiError> {
    company_service::get_company(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("company"))
}

#[utoipa::path(get, path = "/api/v1/company/search/{name}", tag = "company", params(("name" = String, Path, description = "Name fragment")), responses((status = 200, description = "Matching companies")))]
pub async fn search(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<company::Model>>, JsonApiError> {
    Ok(Json(company_service::search_companies(&state.db, &name, page).await?))
}

#[utoipa::path(post, path = "/api/v1/company", tag = "company", request_body = crate::openapi::CreateCompanyRequest, responses((status = 201, description = "Created"), (status = 403, description = "Forbidden"), (status = 409, description = "Name taken")))]
pub async fn create(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Json(input): Json<CreateCompany>,
) -> Result<(StatusCode, Json<company::Model>), JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    let created = company_service::create_company(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(patch, path = "/api/v1/company/{id}", tag = "company", params(("id" = Uuid, Path, description = "Company id")), request_body = crate::openapi::UpdateCompanyRequest, responses((status = 200, description = "Updated"), (status = 403, description = "Forbidden"), (status = 404, description = "Not Found")))]
pub async fn update(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCompany>,
) -> Result<Json<company::Model>, JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    Ok(Json(company_service::update_company(&state.db, id, input).await?))
}

#[utoipa::path(delete, path = "/api/v1/company/{id}", tag = "company", params(("id" = Uuid, Path, description = "Company id")), responses((status = 200, description = "Deleted"), (status = 403, description = "Forbidden"), (status = 409, description = "Company still has offices or employees")))]
pub async fn delete(
    State(state): State<ServerState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletedResponse>, JsonApiError> {
    require_role(&principal, ADMIN_ONLY)?;
    company_service::delete_company(&state.db, id).await?;
    Ok(Json(DeletedResponse::new("Company deleted", 0)))
}

#[utoipa::path(post, path = "/api/v1/company/{id}/revenue", tag = "company", params(("id" = Uuid, Path, description = "Company id")), request_body = crate::openapi::RevenuePeriodRequest, responses((status = 200, description = "Revenue for the period"), (status = 400, description = "Bad dates")))]
pub async fn revenue(
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(period): Json<RevenuePeriod>,
) -> Result<Json<CompanyRevenue>, JsonApiError> {
    Ok(Json(company_service::revenue_for_period(&state.db, id, period).await?))
}
