//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.

use std::fmt;

use sea_orm::{DbErr, SqlErr};

#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Resource not found (or not visible to the caller)
    NotFound,
    /// Validation error with message
    Validation(String),
    /// Uniqueness or referential conflict
    Conflict(String),
    /// No authenticated session
    Unauthorized,
    /// Authenticated but missing the required role
    Forbidden,
    /// Database/persistence error
    Database(String),
    /// Object storage error
    Storage(String),
    /// Generic internal error
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Unauthorized => write!(f, "Authentication required"),
            DomainError::Forbidden => write!(f, "Admin access required"),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Storage(msg) => write!(f, "Storage error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Constraint violations become conflicts; everything else stays a database error.
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Conflict(msg),
            _ => {
                let msg = e.to_string();
                if msg.contains("UNIQUE constraint failed")
                    || msg.contains("FOREIGN KEY constraint failed")
                {
                    DomainError::Conflict(msg)
                } else {
                    DomainError::Database(msg)
                }
            }
        }
    }
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, DomainError::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_constraint_messages_map_to_conflict() {
        let err = DbErr::Custom("UNIQUE constraint failed: newsletter_subscribers.email".into());
        assert!(DomainError::from(err).is_conflict());

        let err = DbErr::Custom("FOREIGN KEY constraint failed".into());
        assert!(DomainError::from(err).is_conflict());
    }

    #[test]
    fn other_db_errors_stay_database_errors() {
        let err = DbErr::Custom("disk I/O error".into());
        assert!(matches!(DomainError::from(err), DomainError::Database(_)));
    }
}
