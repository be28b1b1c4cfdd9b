use chrono::Utc;
use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;
use crate::office;
use crate::validate;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "client")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub favorite_office_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    FavoriteOffice,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::FavoriteOffice => Entity::belongs_to(office::Entity)
                .from(Column::FavoriteOfficeId)
                .to(office::Column::Id)
                .into(),
        }
    }
}

impl Related<office::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FavoriteOffice.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub favorite_office_id: Option<Uuid>,
}

pub async fn create<C: ConnectionTrait>(db: &C, input: NewClient) -> Result<Model, ModelError> {
    validate::required("name", &input.name)?;
    validate::email(&input.email)?;
    validate::required("phone", &input.phone)?;
    validate::required("password", &input.password_hash)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        email: Set(input.email.trim().to_lowercase()),
        phone: Set(input.phone.trim().to_string()),
        password_hash: Set(input.password_hash),
        favorite_office_id: Set(input.favorite_office_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
