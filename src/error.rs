use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    InternalError,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return AppError::Conflict("Resource already exists".to_string());
            }
            if db_err.is_foreign_key_violation() {
                return foreign_key_error(db_err.constraint());
            }
        }
        AppError::Database(err)
    }
}

/// A write referencing a missing owner means the token outlived its account.
fn foreign_key_error(constraint: Option<&str>) -> AppError {
    match constraint {
        Some(name) if name.ends_with("_user_id_fkey") => {
            AppError::Unauthorized("Invalid token".to_string())
        }
        _ => AppError::NotFound("Referenced resource not found".to_string()),
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Io(_) | AppError::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Authentication(_)
            | AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred"
            }
            AppError::Io(ref e) => {
                tracing::error!("I/O error: {:?}", e);
                "Internal server error"
            }
            AppError::InternalError => "Internal server error",
            AppError::Authentication(ref msg)
            | AppError::Validation(ref msg)
            | AppError::NotFound(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::Conflict(ref msg)
            | AppError::BadRequest(ref msg) => msg.as_str(),
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Structural check of a record id taken from the path.
pub fn parse_id(raw: &str, entity: &str) -> Result<uuid::Uuid> {
    uuid::Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {entity} ID")))
}
