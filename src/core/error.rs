use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::error;

use crate::external::{CrmError, LedgerError, StorageError};

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: &'static str,
    details: Option<Value>,
}

impl AppError {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        Self {
            status,
            message,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(Value::String(details.into()));
        self
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.details = Some(fields);
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }

    // Common error constructors
    pub fn not_found(message: &'static str) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: &'static str) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: &'static str) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn internal_server_error(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::bad_request("Duplicate entry").with_details(db.message().to_string())
            }

            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                Self::bad_request("Referenced resource does not exist")
                    .with_details(db.message().to_string())
            }

            other => Self::internal_server_error("Internal server error")
                .with_details(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut fields = Map::new();
        for (field, errors) in err.field_errors() {
            let messages: Vec<Value> = errors
                .iter()
                .map(|e| {
                    Value::String(
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field)),
                    )
                })
                .collect();
            fields.insert(field.to_string(), Value::Array(messages));
        }
        Self::bad_request("Validation error").with_fields(Value::Object(fields))
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        Self::internal_server_error("File storage error").with_details(err.to_string())
    }
}

impl From<CrmError> for AppError {
    fn from(err: CrmError) -> Self {
        Self::internal_server_error("Failed to forward lead to CRM").with_details(err.to_string())
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        Self::internal_server_error("Failed to record uploaded image").with_details(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::internal_server_error("Failed to process password").with_details(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // I dettagli degli errori 500 finiscono nei log, mai al client
        let details = if self.status.is_server_error() {
            error!(
                status = %self.status,
                details = ?self.details,
                "{}", self.message
            );
            None
        } else {
            self.details
        };

        let body = Json(ErrorResponse {
            success: false,
            error: self.message,
            details,
        });
        (self.status, body).into_response()
    }
}
