use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use models::package::{self, DeliveryStatus, NewPackage};
use models::{client, employee, office, validate, Role};
use crate::errors::ServiceError;
use crate::pagination::Pagination;

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub office_accepted_at_id: Uuid,
    pub office_delivered_at_id: Option<Uuid>,
    #[serde(default)]
    pub is_delivered_to_office: bool,
    pub delivery_location: Option<String>,
    pub weight: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePackage {
    pub courier_id: Option<Uuid>,
    pub office_delivered_at_id: Option<Uuid>,
    pub is_delivered_to_office: Option<bool>,
    pub delivery_location: Option<String>,
    pub weight: Option<f64>,
    pub delivery_status: Option<DeliveryStatus>,
}

async fn require_client(db: &DatabaseConnection, id: Uuid, field: &str) -> Result<(), ServiceError> {
    if client::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::Validation(format!("unknown {field}")));
    }
    Ok(())
}

async fn require_office(db: &DatabaseConnection, id: Uuid, field: &str) -> Result<(), ServiceError> {
    if office::Entity::find_by_id(id).one(db).await?.is_none() {
        return Err(ServiceError::Validation(format!("unknown {field}")));
    }
    Ok(())
}

async fn require_courier(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    match employee::Entity::find_by_id(id).one(db).await? {
        Some(e) if e.role == Role::Courier => Ok(()),
        Some(_) => Err(ServiceError::Validation("courier_id must reference a courier".into())),
        None => Err(ServiceError::Validation("unknown courier_id".into())),
    }
}

/// Register a package. The price is derived from weight and delivery mode;
/// `registered_by` is the staff member recording it, if any.
#[instrument(skip(db, input))]
pub async fn create_package(
    db: &DatabaseConnection,
    input: CreatePackage,
    registered_by: Option<Uuid>,
) -> Result<package::Model, ServiceError> {
    require_client(db, input.sender_id, "sender_id").await?;
    require_client(db, input.receiver_id, "receiver_id").await?;
    require_office(db, input.office_accepted_at_id, "office_accepted_at_id").await?;
    if let Some(id) = input.office_delivered_at_id {
        require_office(db, id, "office_delivered_at_id").await?;
    }
    if let Some(id) = input.courier_id {
        require_courier(db, id).await?;
    }
    let created = package::create(
        db,
        NewPackage {
            sender_id: input.sender_id,
            receiver_id: input.receiver_id,
            courier_id: input.courier_id,
            registered_by_id: registered_by,
            office_accepted_at_id: input.office_accepted_at_id,
            office_delivered_at_id: input.office_delivered_at_id,
            is_delivered_to_office: input.is_delivered_to_office,
            delivery_location: input.delivery_location,
            weight: input.weight,
        },
    )
    .await?;
    info!(package_id = %created.id, price = created.price, "package_registered");
    Ok(created)
}

pub async fn get_package(db: &DatabaseConnection, id: Uuid) -> Result<Option<package::Model>, ServiceError> {
    let found = package::Entity::find_by_id(id).one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(found)
}

async fn list_where(db: &DatabaseConnection, cond: Condition, page: Pagination) -> Result<Vec<package::Model>, ServiceError> {
    let rows = page
        .apply(
            package::Entity::find()
                .filter(cond)
                .order_by_desc(package::Column::CreatedAt),
        )
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn list_packages(db: &DatabaseConnection, page: Pagination) -> Result<Vec<package::Model>, ServiceError> {
    list_where(db, Condition::all(), page).await
}

pub async fn list_packages_by_sender(db: &DatabaseConnection, sender_id: Uuid, page: Pagination) -> Result<Vec<package::Model>, ServiceError> {
    list_where(db, Condition::all().add(package::Column::SenderId.eq(sender_id)), page).await
}

pub async fn list_packages_by_receiver(db: &DatabaseConnection, receiver_id: Uuid, page: Pagination) -> Result<Vec<package::Model>, ServiceError> {
    list_where(db, Condition::all().add(package::Column::ReceiverId.eq(receiver_id)), page).await
}

/// Packages an employee carries or registered.
pub async fn list_packages_by_employee(db: &DatabaseConnection, employee_id: Uuid, page: Pagination) -> Result<Vec<package::Model>, ServiceError> {
    let cond = Condition::any()
        .add(package::Column::CourierId.eq(employee_id))
        .add(package::Column::RegisteredById.eq(employee_id));
    list_where(db, cond, page).await
}

pub async fn list_not_delivered(db: &DatabaseConnection, page: Pagination) -> Result<Vec<package::Model>, ServiceError> {
    list_where(db, Condition::all().add(package::Column::DeliveryDate.is_null()), page).await
}

pub async fn update_package(db: &DatabaseConnection, id: Uuid, input: UpdatePackage) -> Result<package::Model, ServiceError> {
    let current = package::Entity::find_by_id(id)
        .one(db).await.map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("package"))?;

    if let Some(courier) = input.courier_id {
        require_courier(db, courier).await?;
    }
    if let Some(office_id) = input.office_delivered_at_id {
        require_office(db, office_id, "office_delivered_at_id").await?;
    }

    let to_office = input.is_delivered_to_office.unwrap_or(current.is_delivered_to_office);
    let delivered_at = input.office_delivered_at_id.or(current.office_delivered_at_id);
    let location = input.delivery_location.clone().or_else(|| current.delivery_location.clone());
    package::validate_destination(to_office, delivered_at, location.as_deref())?;
    let weight = input.weight.unwrap_or(current.weight);
    validate::positive("weight", weight)?;

    let mut am: package::ActiveModel = current.clone().into();
    if let Some(courier) = input.courier_id {
        am.courier_id = Set(Some(courier));
    }
    am.is_delivered_to_office = Set(to_office);
    am.office_delivered_at_id = Set(delivered_at);
    am.delivery_location = Set(location.map(|l| l.trim().to_string()));
    am.weight = Set(weight);
    am.price = Set(package::price_for(weight, to_office));
    if let Some(status) = input.delivery_status {
        am.delivery_status = Set(status);
        am.delivery_date = Set(match status {
            DeliveryStatus::Delivered => current.delivery_date.or_else(|| Some(Utc::now().into())),
            DeliveryStatus::Registered | DeliveryStatus::InTransit => None,
        });
    }
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok(updated)
}

/// Shortcut for setting the status to delivered.
pub async fn mark_delivered(db: &DatabaseConnection, id: Uuid) -> Result<package::Model, ServiceError> {
    let updated = update_package(
        db,
        id,
        UpdatePackage { delivery_status: Some(DeliveryStatus::Delivered), ..Default::default() },
    )
    .await?;
    info!(package_id = %id, "package_delivered");
    Ok(updated)
}

pub async fn delete_package(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = package::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("package"));
    }
    Ok(())
}
