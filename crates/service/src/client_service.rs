use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set,
};
use sea_orm::JoinType;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::client::{self, NewClient};
use models::{office, validate};
use crate::auth::password::hash_password;
use crate::employee_service::ensure_email_free;
use crate::errors::ServiceError;
use crate::pagination::Pagination;

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub favorite_office_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClient {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub favorite_office_id: Option<Uuid>,
}

async fn check_office(db: &DatabaseConnection, office_id: Option<Uuid>) -> Result<(), ServiceError> {
    if let Some(id) = office_id {
        if office::Entity::find_by_id(id).one(db).await?.is_none() {
            return Err(ServiceError::Validation("unknown favorite_office_id".into()));
        }
    }
    Ok(())
}

/// Self-registration of a client account.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn register_client(db: &DatabaseConnection, input: RegisterClient, cost: u32) -> Result<client::Model, ServiceError> {
    validate::email(&input.email)?;
    ensure_email_free(db, &input.email, None).await?;
    check_office(db, input.favorite_office_id).await?;
    let password_hash = hash_password(&input.password, cost)?;
    let created = client::create(
        db,
        NewClient {
            name: input.name,
            email: input.email,
            phone: input.phone,
            password_hash,
            favorite_office_id: input.favorite_office_id,
        },
    )
    .await?;
    info!(client_id = %created.id, "client_registered");
    Ok(created)
}

pub async fn get_client(db: &DatabaseConnection, id: Uuid) -> Result<Option<client::Model>, ServiceError> {
    let found = client::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

pub async fn list_clients(db: &DatabaseConnection, page: Pagination) -> Result<Vec<client::Model>, ServiceError> {
    let rows = page
        .apply(client::Entity::find().order_by_asc(client::Column::Name))
        .all(db)
        .await?;
    Ok(rows)
}

/// Clients whose name contains `name`.
pub async fn search_clients(db: &DatabaseConnection, name: &str, page: Pagination) -> Result<Vec<client::Model>, ServiceError> {
    let rows = page
        .apply(
            client::Entity::find()
                .filter(client::Column::Name.contains(name.trim()))
                .order_by_asc(client::Column::Name),
        )
        .all(db)
        .await?;
    Ok(rows)
}

/// Clients whose favourite office belongs to `company_id`.
pub async fn list_clients_by_company(db: &DatabaseConnection, company_id: Uuid, page: Pagination) -> Result<Vec<client::Model>, ServiceError> {
    let rows = page
        .apply(
            client::Entity::find()
                .join(JoinType::InnerJoin, client::Relation::FavoriteOffice.def())
                .filter(office::Column::CompanyId.eq(company_id))
                .order_by_asc(client::Column::Name),
        )
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn update_client(db: &DatabaseConnection, id: Uuid, input: UpdateClient, cost: u32) -> Result<client::Model, ServiceError> {
    let mut am: client::ActiveModel = client::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("client"))?
        .into();
    if let Some(name) = input.name {
        validate::required("name", &name)?;
        am.name = Set(name.trim().to_string());
    }
    if let Some(email) = input.email {
        validate::email(&email)?;
        ensure_email_free(db, &email, Some(id)).await?;
        am.email = Set(email.trim().to_lowercase());
    }
    if let Some(phone) = input.phone {
        validate::required("phone", &phone)?;
        am.phone = Set(phone.trim().to_string());
    }
    if let Some(password) = input.password {
        am.password_hash = Set(hash_password(&password, cost)?);
    }
    if input.favorite_office_id.is_some() {
        check_office(db, input.favorite_office_id).await?;
        am.favorite_office_id = Set(input.favorite_office_id);
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(models::errors::ModelError::from)?;
    Ok(updated)
}

/// Delete a client; packages they sent or receive go with them.
pub async fn delete_client(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = client::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("client"));
    }
    info!(client_id = %id, "client_deleted");
    Ok(())
}
