//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application,
//! from the repositories up to the request handlers.
//!
//! `AppError` implements `actix_web::error::ResponseError` so every failure leaves the
//! service in the same envelope: `{"success": false, "message": ...}`, plus an `errors`
//! field when the request did not match its schema.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and `BlockingError` let the `?`
//! operator do the conversion.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Message used by every schema-validation failure.
pub const INVALID_DATA: &str = "Invalid data";

/// Name of the partial unique index guarding `users.email`.
const USERS_EMAIL_INDEX: &str = "users_email_active_key";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired credentials (HTTP 401).
    Unauthorized(String),
    /// A generic client-side error (HTTP 400).
    BadRequest(String),
    /// The caller is authenticated but not allowed to act (HTTP 403).
    Forbidden(String),
    /// A referenced user or task does not exist (HTTP 404).
    NotFound(String),
    /// The request collides with existing state, e.g. a duplicate email (HTTP 409).
    Conflict(String),
    /// An unexpected server-side error (HTTP 500).
    InternalServerError(String),
    /// A failure reported by the storage layer (HTTP 500).
    DatabaseError(String),
    /// Field-level failures from the `validator` crate (HTTP 400).
    ValidationError(ValidationErrors),
    /// A body, query string or path segment that could not be deserialized (HTTP 400).
    MalformedInput(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Collapses domain failures into a `400 Bad Request` carrying the same message.
    ///
    /// Used by handlers whose contract answers every use-case failure with 400.
    /// Storage and internal faults are left untouched.
    pub fn into_client_error(self) -> Self {
        match self {
            AppError::NotFound(msg)
            | AppError::Forbidden(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => AppError::BadRequest(msg),
            other => other,
        }
    }

    /// The human-readable message carried by the error.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => msg.clone(),
            AppError::ValidationError(_) | AppError::MalformedInput(_) => INVALID_DATA.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(errors) => write!(f, "Validation Error: {}", errors),
            AppError::MalformedInput(msg) => write!(f, "Malformed Input: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_)
            | AppError::ValidationError(_)
            | AppError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => json!({
                "success": false,
                "message": INVALID_DATA,
                "errors": errors,
            }),
            AppError::MalformedInput(detail) => json!({
                "success": false,
                "message": INVALID_DATA,
                "errors": [detail],
            }),
            // Storage details stay in the logs.
            AppError::DatabaseError(msg) => {
                log::error!("database error: {}", msg);
                json!({
                    "success": false,
                    "message": "Internal server error",
                })
            }
            other => json!({
                "success": false,
                "message": other.message(),
            }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// Constraint violations become the client-facing errors the pre-checks would have
/// raised; anything else is a `DatabaseError`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                if db.constraint() == Some(USERS_EMAIL_INDEX) {
                    AppError::Conflict("User already exists with the provided email".into())
                } else {
                    AppError::Conflict("Record already exists".into())
                }
            }
            sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                AppError::NotFound("User not found".into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error)
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::Unauthorized`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

/// A hashing job that panicked or was cancelled on the blocking pool.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}
