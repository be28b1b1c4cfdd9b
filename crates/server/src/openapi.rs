use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String, pub version: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginResponse { pub token: String, pub id: Uuid, pub email: String, pub role: String }

#[derive(ToSchema)]
pub struct RegisterClientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub favorite_office_id: Option<Uuid>,
}

/// `?limit=&offset=` on list endpoints; limit defaults to 10, capped at 100.
#[derive(utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery { pub limit: Option<u64>, pub offset: Option<u64> }

#[derive(ToSchema)]
pub struct CreateCompanyRequest { pub name: String, pub revenue: Option<f64> }

#[derive(ToSchema)]
pub struct UpdateCompanyRequest { pub name: Option<String>, pub revenue: Option<f64> }

#[derive(ToSchema)]
pub struct RevenuePeriodRequest {
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    #[schema(example = "2024-12-31")]
    pub end_date: String,
}

#[derive(ToSchema)]
pub struct CreateOfficeRequest { pub company_id: Uuid, pub location: String }

#[derive(ToSchema)]
pub struct UpdateOfficeRequest { pub location: Option<String> }

#[derive(ToSchema)]
pub struct CreateEmployeeRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// employee, courier or admin
    pub role: String,
    pub company_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct UpdateEmployeeRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub company_id: Option<Uuid>,
    pub office_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub favorite_office_id: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CreatePackageRequest {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub office_accepted_at_id: Uuid,
    pub office_delivered_at_id: Option<Uuid>,
    pub is_delivered_to_office: Option<bool>,
    pub delivery_location: Option<String>,
    pub weight: f64,
}

#[derive(ToSchema)]
pub struct UpdatePackageRequest {
    pub courier_id: Option<Uuid>,
    pub office_delivered_at_id: Option<Uuid>,
    pub is_delivered_to_office: Option<bool>,
    pub delivery_location: Option<String>,
    pub weight: Option<f64>,
    /// registered, in_transit or delivered
    pub delivery_status: Option<String>,
}

#[derive(ToSchema)]
pub struct DeletedResponseDoc { pub message: String, pub reassigned: u64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::auth::me,
        crate::routes::companies::list,
        crate::routes::companies::get,
        crate::routes::companies::search,
        crate::routes::companies::create,
        crate::routes::companies::update,
        crate::routes::companies::delete,
        crate::routes::companies::revenue,
        crate::routes::offices::list,
        crate::routes::offices::get,
        crate::routes::offices::by_company,
        crate::routes::offices::by_location,
        crate::routes::offices::create,
        crate::routes::offices::update,
        crate::routes::offices::delete,
        crate::routes::employees::list,
        crate::routes::employees::get,
        crate::routes::employees::by_company,
        crate::routes::employees::search,
        crate::routes::employees::create,
        crate::routes::employees::update,
        crate::routes::employees::delete,
        crate::routes::clients::list,
        crate::routes::clients::get,
        crate::routes::clients::by_company,
        crate::routes::clients::search,
        crate::routes::clients::update,
        crate::routes::clients::delete,
        crate::routes::packages::list,
        crate::routes::packages::not_delivered,
        crate::routes::packages::by_sender,
        crate::routes::packages::by_receiver,
        crate::routes::packages::by_employee,
        crate::routes::packages::get,
        crate::routes::packages::create,
        crate::routes::packages::update,
        crate::routes::packages::deliver,
        crate::routes::packages::delete,
    ),
    components(
        schemas(
            HealthResponse,
            LoginRequest,
            LoginResponse,
            RegisterClientRequest,
            CreateCompanyRequest,
            UpdateCompanyRequest,
            RevenuePeriodRequest,
            CreateOfficeRequest,
            UpdateOfficeRequest,
            CreateEmployeeRequest,
            UpdateEmployeeRequest,
            UpdateClientRequest,
            CreatePackageRequest,
            UpdatePackageRequest,
            DeletedResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "company"),
        (name = "office"),
        (name = "employee"),
        (name = "client"),
        (name = "package")
    )
)]
pub struct ApiDoc;
