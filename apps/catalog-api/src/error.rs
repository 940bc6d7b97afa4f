//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Catalog API                        │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │         │                                                               │
//! │         ├── ValidationError ─────────────► 400 {"error": "..."}        │
//! │         ├── CoreError::CategoryCycle ────► 400                         │
//! │         ├── DbError::NotFound ───────────► 404                         │
//! │         ├── DbError::UniqueViolation ────► 409                         │
//! │         ├── DbError::ForeignKey / Check ─► 400                         │
//! │         └── anything else ───────────────► 500 (logged, not leaked)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Clients only ever see `{"error": "<message>"}`; the [`ErrorCode`] picks
//! the status line.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use catalog_core::{CoreError, ValidationError};
use catalog_db::DbError;
use serde::Serialize;

/// API error returned from handlers.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Machine-readable error code, mapped onto the HTTP status
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Unique constraint hit (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Wire shape of every error body.
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error with a preformatted message.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// `"{Entity} with id - {id} not found"`.
    pub fn missing(entity: &str, id: impl std::fmt::Display) -> Self {
        ApiError::not_found(format!("{} with id - {} not found", entity, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::missing(&entity, id),
            DbError::Rejected(err) => err.into(),
            DbError::UniqueViolation { field, value } => {
                tracing::debug!(%field, %value, "Unique constraint rejected write");
                ApiError::new(ErrorCode::Conflict, conflict_message(&field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!("Foreign key violation: {}", message);
                ApiError::validation("Invalid reference - object does not exist.")
            }
            DbError::CheckViolation { message } => {
                tracing::warn!("Check constraint failed: {}", message);
                ApiError::validation("Ensure the value is greater than or equal to 0.")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Internal server error")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Internal server error")
            }
            DbError::MigrationFailed(e) | DbError::QueryFailed(e) | DbError::Internal(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database operation failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Internal server error")
            }
            DbError::Corrupt { column, value } => {
                tracing::error!(%column, %value, "Stored value could not be decoded");
                ApiError::internal("Internal server error")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CategoryCycle { .. } | CoreError::TooDeep { .. } => {
                ApiError::validation(err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status(), body).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// `categories.title` → `category with this title already exists.`
fn conflict_message(field: &str) -> String {
    match field.split_once('.') {
        Some((table, column)) => format!(
            "{} with this {} already exists.",
            singular(table),
            column
        ),
        None => format!("{} already exists.", field),
    }
}

fn singular(table: &str) -> String {
    if let Some(stem) = table.strip_suffix("ies") {
        format!("{}y", stem)
    } else {
        table.strip_suffix('s').unwrap_or(table).to_string()
    }
}
