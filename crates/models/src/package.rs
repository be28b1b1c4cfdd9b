use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::validate;
use crate::{client, employee, office};

/// Per-kilogram rate when the package is collected at an office.
pub const OFFICE_RATE_PER_KG: f64 = 4.99;
/// Per-kilogram rate for delivery to a street address.
pub const ADDRESS_RATE_PER_KG: f64 = 9.99;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    #[sea_orm(string_value = "registered")]
    Registered,
    #[sea_orm(string_value = "in_transit")]
    InTransit,
    #[sea_orm(string_value = "delivered")]
    Delivered,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "package")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub registered_by_id: Option<Uuid>,
    pub office_accepted_at_id: Uuid,
    pub office_delivered_at_id: Option<Uuid>,
    pub is_delivered_to_office: bool,
    pub delivery_location: Option<String>,
    pub weight: f64,
    pub price: f64,
    pub delivery_status: DeliveryStatus,
    pub delivery_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Sender,
    Receiver,
    Courier,
    RegisteredBy,
    OfficeAcceptedAt,
    OfficeDeliveredAt,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Sender => Entity::belongs_to(client::Entity)
                .from(Column::SenderId)
                .to(client::Column::Id)
                .into(),
            Relation::Receiver => Entity::belongs_to(client::Entity)
                .from(Column::ReceiverId)
                .to(client::Column::Id)
                .into(),
            Relation::Courier => Entity::belongs_to(employee::Entity)
                .from(Column::CourierId)
                .to(employee::Column::Id)
                .into(),
            Relation::RegisteredBy => Entity::belongs_to(employee::Entity)
                .from(Column::RegisteredById)
                .to(employee::Column::Id)
                .into(),
            Relation::OfficeAcceptedAt => Entity::belongs_to(office::Entity)
                .from(Column::OfficeAcceptedAtId)
                .to(office::Column::Id)
                .into(),
            Relation::OfficeDeliveredAt => Entity::belongs_to(office::Entity)
                .from(Column::OfficeDeliveredAtId)
                .to(office::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_delivered(&self) -> bool {
        self.delivery_date.is_some()
    }
}

/// Price in currency units, rounded to cents.
pub fn price_for(weight: f64, to_office: bool) -> f64 {
    let rate = if to_office { OFFICE_RATE_PER_KG } else { ADDRESS_RATE_PER_KG };
    (weight * rate * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct NewPackage {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub courier_id: Option<Uuid>,
    pub registered_by_id: Option<Uuid>,
    pub office_accepted_at_id: Uuid,
    pub office_delivered_at_id: Option<Uuid>,
    pub is_delivered_to_office: bool,
    pub delivery_location: Option<String>,
    pub weight: f64,
}

/// Checks the destination fields agree with the delivery mode.
pub fn validate_destination(
    is_delivered_to_office: bool,
    office_delivered_at_id: Option<Uuid>,
    delivery_location: Option<&str>,
) -> Result<(), ModelError> {
    if is_delivered_to_office {
        if office_delivered_at_id.is_none() {
            return Err(ModelError::Validation(
                "office_delivered_at_id required for office delivery".into(),
            ));
        }
    } else if delivery_location.map_or(true, |l| l.trim().is_empty()) {
        return Err(ModelError::Validation(
            "delivery_location required for address delivery".into(),
        ));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewPackage) -> Result<Model, ModelError> {
    validate::positive("weight", input.weight)?;
    validate_destination(
        input.is_delivered_to_office,
        input.office_delivered_at_id,
        input.delivery_location.as_deref(),
    )?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        sender_id: Set(input.sender_id),
        receiver_id: Set(input.receiver_id),
        courier_id: Set(input.courier_id),
        registered_by_id: Set(input.registered_by_id),
        office_accepted_at_id: Set(input.office_accepted_at_id),
        office_delivered_at_id: Set(input.office_delivered_at_id),
        is_delivered_to_office: Set(input.is_delivered_to_office),
        delivery_location: Set(input.delivery_location.map(|l| l.trim().to_string())),
        weight: Set(input.weight),
        price: Set(price_for(input.weight, input.is_delivered_to_office)),
        delivery_status: Set(DeliveryStatus::Registered),
        delivery_date: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
