// src/error/types.rs
use crate::domain::DomainError;
use rusqlite::ErrorCode;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Resource not found")]
    NotFound,

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// True when SQLite rejected a write because of a UNIQUE, FOREIGN KEY,
    /// CHECK or NOT NULL constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            AppError::Database(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation
        )
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Values that were read but could not be turned back into domain types
/// surface as `Decode`; everything else stays a database error.
impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(column, _, inner) => {
                AppError::Decode(format!("column {}: {}", column, inner))
            }
            other => AppError::Database(other),
        }
    }
}

impl From<chrono::ParseError> for AppError {
    fn from(err: chrono::ParseError) -> Self {
        AppError::Decode(format!("Date parse error: {}", err))
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_unique_violation_is_constraint_violation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (name TEXT UNIQUE); INSERT INTO t VALUES ('a');")
            .unwrap();

        let err: AppError = conn
            .execute("INSERT INTO t VALUES ('a')", [])
            .unwrap_err()
            .into();

        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_other_errors_are_not_constraint_violations() {
        assert!(!AppError::NotFound.is_constraint_violation());
        assert!(!AppError::Decode("bad".to_string()).is_constraint_violation());
        let no_rows = AppError::Database(rusqlite::Error::QueryReturnedNoRows);
        assert!(!no_rows.is_constraint_violation());
    }

    #[test]
    fn test_conversion_failure_becomes_decode_error() {
        let failure = rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, "bad date")),
        );

        match AppError::from(failure) {
            AppError::Decode(message) => assert!(message.contains("bad date")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn test_serializes_as_message() {
        let json = serde_json::to_string(&AppError::NotFound).unwrap();
        assert_eq!(json, "\"Resource not found\"");
    }
}
