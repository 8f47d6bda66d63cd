use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection error: {0}")]
    ConnectionError(String),

    #[error("Query execution error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Transaction error: {0}")]
    TransactionError(String),

    #[error("Integrity constraint violation: {0}")]
    IntegrityError(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Retry limit exceeded after {attempts} attempts")]
    RetryLimitExceeded { attempts: u8 },
}

impl DatabaseError {
    /// Map a foreign key violation to NotFound: inserting a standing or
    /// match for a league/team that was deleted mid-flight must surface as
    /// a missing record, not a 500.
    pub fn from_fk_violation(e: sqlx::Error, what: &str) -> Self {
        if let Some(db_error) = e.as_database_error() {
            if db_error.code().as_deref() == Some("23503") {
                return DatabaseError::NotFound(what.to_string());
            }
        }
        DatabaseError::QueryError(e)
    }

    /// Transient errors worth retrying: serialization failures and
    /// deadlocks from concurrent lifecycle sequences on overlapping rows.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::QueryError(sqlx::Error::Io(_)) | Self::QueryError(sqlx::Error::PoolTimedOut) => {
                true
            }
            Self::QueryError(e) => {
                if let Some(db_error) = e.as_database_error() {
                    matches!(
                        db_error.code().as_deref(),
                        Some("40001") | // serialization_failure
                        Some("40P01") // deadlock_detected
                    )
                } else {
                    false
                }
            }
            Self::ConnectionError(_) => true,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, DatabaseError>;
