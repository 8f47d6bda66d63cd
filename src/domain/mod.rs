// Domain layer - standings policy, ledger and match lifecycle.
// No HTTP concerns; handlers translate DomainError to responses.

pub mod ledger;
pub mod matches;
pub mod policy;

use crate::db::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Standings consistency violation: {0}")]
    Consistency(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<DatabaseError> for DomainError {
    fn from(e: DatabaseError) -> Self {
        match e {
            DatabaseError::NotFound(msg) => DomainError::NotFound(msg),
            DatabaseError::IntegrityError(msg) => DomainError::Consistency(msg),
            other => DomainError::Database(other.to_string()),
        }
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => DomainError::NotFound("Resource not found".to_string()),
            _ => DomainError::Database(e.to_string()),
        }
    }
}

pub use ledger::{apply_match, reverse_match, StandingDelta};
pub use matches::{create_match, delete_match, update_match};
pub use policy::{score_match, MatchResult, Outcome};
