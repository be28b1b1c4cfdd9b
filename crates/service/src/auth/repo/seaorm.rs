use models::{client, employee, Role};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::auth::domain::Account;
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

#[derive(Clone)]
pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAuthRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn from_employee(e: employee::Model) -> Account {
    Account { id: e.id, email: e.email, role: e.role, password_hash: e.password_hash }
}

fn from_client(c: client::Model) -> Account {
    Account { id: c.id, email: c.email, role: Role::Client, password_hash: c.password_hash }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, AuthError> {
        let email = email.trim().to_lowercase();
        let staff = employee::Entity::find()
            .filter(employee::Column::Email.eq(email.clone()))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        if let Some(e) = staff {
            return Ok(Some(from_employee(e)));
        }
        let res = client::Entity::find()
            .filter(client::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(from_client))
    }

    async fn find_account(&self, id: Uuid, role: Role) -> Result<Option<Account>, AuthError> {
        match role {
            Role::Client => {
                let res = client::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(|e| AuthError::Repository(e.to_string()))?;
                Ok(res.map(from_client))
            }
            Role::Employee | Role::Courier | Role::Admin => {
                let res = employee::Entity::find_by_id(id)
                    .one(&self.db)
                    .await
                    .map_err(|e| AuthError::Repository(e.to_string()))?;
                Ok(res.map(from_employee))
            }
        }
    }
}
