// src/application/error_handling.rs
//
// User-facing error mapping
//
// ARCHITECTURE:
// - Maps internal errors → user-friendly responses
// - Provides consistent error format for the UI layer
// - Never exposes SQL or storage details in the message
// - Logs unexpected failures for debugging

use log::error;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for UI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Resource not found
    NotFound,

    /// Invalid input
    Validation,

    /// Domain invariant violation
    DomainError,

    /// Write rejected by a unique, foreign key or check constraint
    Conflict,

    /// Database/persistence error
    Database,

    /// File system error
    FileSystem,

    /// Other/unknown error
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(err: AppError) -> Self {
        if err.is_constraint_violation() {
            return Self::new(
                ErrorType::Conflict,
                "A conflicting record already exists or a referenced record is missing",
                Some(err.to_string()),
            );
        }

        match err {
            AppError::NotFound => Self::new(ErrorType::NotFound, "Resource not found", None),

            AppError::Domain(domain_error) => Self::new(
                ErrorType::DomainError,
                "Domain validation failed",
                Some(domain_error.to_string()),
            ),

            AppError::Database(db_error) => {
                error!("Database error: {:?}", db_error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Decode(message) => {
                error!("Stored value could not be decoded: {}", message);
                Self::new(ErrorType::Database, "Stored data is malformed", Some(message))
            }

            AppError::Pool(pool_error) => {
                error!("Connection pool error: {}", pool_error);
                Self::new(ErrorType::Database, "Database connection failed", None)
            }

            AppError::Serialization(serde_error) => {
                error!("Serialization error: {:?}", serde_error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                error!("IO error: {:?}", io_error);
                Self::new(
                    ErrorType::FileSystem,
                    "File system operation failed",
                    Some(io_error.to_string()),
                )
            }

            AppError::Other(message) => {
                error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message, None)
            }
        }
    }

    /// Create validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorType::Validation, message, None)
    }

    /// Create not found error
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorType::NotFound, format!("{} not found", resource), None)
    }
}

impl From<AppError> for ErrorResponse {
    fn from(err: AppError) -> Self {
        Self::from_app_error(err)
    }
}

/// Helper trait to convert Results for the UI boundary
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, ErrorResponse>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, ErrorResponse> {
        self.map_err(ErrorResponse::from_app_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;
    use rusqlite::Connection;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(AppError::NotFound);
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "Resource not found");
        assert!(!error.success);
    }

    #[test]
    fn test_domain_error_carries_details() {
        let error = ErrorResponse::from_app_error(AppError::Domain(
            DomainError::InvariantViolation("Idol name cannot be empty".to_string()),
        ));
        assert_eq!(error.error_type, ErrorType::DomainError);
        assert!(error.details.unwrap().contains("Idol name cannot be empty"));
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE company (name TEXT UNIQUE);
             INSERT INTO company VALUES ('Cube');",
        )
        .unwrap();
        let err: AppError = conn
            .execute("INSERT INTO company VALUES ('Cube')", [])
            .unwrap_err()
            .into();

        assert_eq!(ErrorResponse::from(err).error_type, ErrorType::Conflict);
    }

    #[test]
    fn test_decode_error_is_database() {
        let error = ErrorResponse::from_app_error(AppError::Decode("bad date".to_string()));
        assert_eq!(error.error_type, ErrorType::Database);
        assert_eq!(error.details.as_deref(), Some("bad date"));
    }

    #[test]
    fn test_validation_error() {
        let error = ErrorResponse::validation("Invalid input");
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Invalid input");
    }

    #[test]
    fn test_to_error_response() {
        let result: Result<(), AppError> = Err(AppError::NotFound);
        let response = result.to_error_response().unwrap_err();
        assert_eq!(response, ErrorResponse::not_found("Resource"));
    }

    #[test]
    fn test_serialization() {
        let error = ErrorResponse::not_found("Idol");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["error_type"], "not_found");
        assert_eq!(json["message"], "Idol not found");
        assert_eq!(json["success"], false);
    }
}
