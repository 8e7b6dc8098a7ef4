//! Store error types.

use rusqlite::ErrorCode;
use study_core::{CardId, ConfigurationError, ValidationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("card not found: {0}")]
    NotFound(CardId),

    #[error("duplicate card id: {0}")]
    DuplicateCard(CardId),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("store is busy: {0}")]
    Concurrency(String),

    #[error("malformed {table} record {key}: {reason}")]
    MalformedRecord {
        table: &'static str,
        key: String,
        reason: String,
    },

    #[error("sqlite error: {0}")]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => {
                Self::Concurrency(e.to_string())
            }
            _ => Self::Sqlite(e),
        }
    }
}
