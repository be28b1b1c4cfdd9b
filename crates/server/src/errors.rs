use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

/// Error body shared by every handler: `{"error": title, "message": detail}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, message: Option<String>) -> Self {
        Self { status, error, message }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized", Some(message.into()))
    }

    pub fn forbidden() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Forbidden", Some("insufficient role".into()))
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "Not Found", Some(format!("{entity} not found")))
    }

    fn internal(detail: String) -> Self {
        error!(error = %detail, "internal_error");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", None)
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.error, "message": self.message });
        (self.status, Json(body)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(msg) | ServiceError::Model(ModelError::Validation(msg)) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg))
            }
            ServiceError::NotFound(msg) => JsonApiError::new(StatusCode::NOT_FOUND, "Not Found", Some(msg)),
            ServiceError::Conflict(msg) | ServiceError::Model(ModelError::Conflict(msg)) => {
                JsonApiError::new(StatusCode::CONFLICT, "Conflict", Some(msg))
            }
            e @ ServiceError::ProtectedEntity(_) => {
                warn!(error = %e, "protected_entity");
                JsonApiError::new(StatusCode::FORBIDDEN, "Protected Entity", Some(e.to_string()))
            }
            e @ ServiceError::NoReplacementAvailable { .. } => {
                warn!(error = %e, "no_replacement_available");
                JsonApiError::new(StatusCode::CONFLICT, "No Replacement Available", Some(e.to_string()))
            }
            ServiceError::Db(msg) | ServiceError::Internal(msg) | ServiceError::Model(ModelError::Db(msg)) => {
                JsonApiError::internal(msg)
            }
        }
    }
}

impl From<AuthError> for JsonApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Unauthorized | AuthError::TokenError(_) => JsonApiError::unauthorized(e.to_string()),
            AuthError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
            other => JsonApiError::internal(format!("auth {}: {}", other.code(), other)),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn service_errors_map_to_status_codes() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::not_found("office"), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::ProtectedEntity("employee".into()), StatusCode::FORBIDDEN),
            (
                ServiceError::NoReplacementAvailable { entity: "office", id: Uuid::nil(), dependents: "employees.office_id" },
                StatusCode::CONFLICT,
            ),
            (ServiceError::Db("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (ServiceError::Model(ModelError::Validation("x".into())), StatusCode::BAD_REQUEST),
        ];
        for (err, status) in cases {
            assert_eq!(JsonApiError::from(err).status, status);
        }
    }

    #[test]
    fn internal_errors_hide_details() {
        let e = JsonApiError::from(ServiceError::Db("password=secret".into()));
        assert!(e.message.is_none());
    }

    #[test]
    fn token_errors_are_unauthorized() {
        let e = JsonApiError::from(AuthError::TokenError("expired".into()));
        assert_eq!(e.status, StatusCode::UNAUTHORIZED);
    }
}
