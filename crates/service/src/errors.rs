use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    /// The entity may never be deleted (admin accounts).
    #[error("{0} is protected and cannot be deleted")]
    ProtectedEntity(String),
    /// Dependents exist but no valid target can take them over.
    #[error("no replacement available for {dependents} of {entity} {id}")]
    NoReplacementAvailable {
        entity: &'static str,
        id: Uuid,
        dependents: &'static str,
    },
    #[error("database error: {0}")]
    Db(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        ServiceError::Db(e.to_string())
    }
}
