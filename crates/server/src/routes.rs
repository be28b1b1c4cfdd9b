use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::openapi::ApiDoc;

pub mod auth;
pub mod clients;
pub mod companies;
pub mod employees;
pub mod offices;
pub mod packages;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Routes under `/api/v1`; every one of them requires a bearer token.
fn api_v1(state: auth::ServerState) -> Router<auth::ServerState> {
    Router::new()
        .route("/me", get(auth::me))
        .route("/company", get(companies::list).post(companies::create))
        .route("/company/search/:name", get(companies::search))
        .route(
            "/company/:id",
            get(companies::get).patch(companies::update).delete(companies::delete),
        )
        .route("/company/:id/revenue", post(companies::revenue))
        .route("/office", get(offices::list).post(offices::create))
        .route("/office/company/:id", get(offices::by_company))
        .route("/office/location/:location", get(offices::by_location))
        .route(
            "/office/:id",
            get(offices::get).patch(offices::update).delete(offices::delete),
        )
        .route("/employee", get(employees::list).post(employees::create))
        .route("/employee/company/:id", get(employees::by_company))
        .route("/employee/search/:name", get(employees::search))
        .route(
            "/employee/:id",
            get(employees::get).patch(employees::update).delete(employees::delete),
        )
        .route("/client", get(clients::list))
        .route("/client/company/:id", get(clients::by_company))
        .route("/client/search/:name", get(clients::search))
        .route(
            "/client/:id",
            get(clients::get).patch(clients::update).delete(clients::delete),
        )
        .route("/package", get(packages::list).post(packages::create))
        .route("/package/not-delivered", get(packages::not_delivered))
        .route("/package/sender/:id", get(packages::by_sender))
        .route("/package/receiver/:id", get(packages::by_receiver))
        .route("/package/employee/:id", get(packages::by_employee))
        .route(
            "/package/:id",
            get(packages::get).patch(packages::update).delete(packages::delete),
        )
        .route("/package/:id/deliver", post(packages::deliver))
        .route_layer(middleware::from_fn_with_state(state, auth::require_bearer_token_state))
}

/// Build the full application router: public routes, docs and the
/// authenticated `/api/v1` tree.
pub fn build_router(state: auth::ServerState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/login", post(auth::login))
        .route("/client/register", post(auth::register));

    public
        .nest("/api/v1", api_v1(state.clone()))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
