use crate::errors::QueryError;
use crate::models::Column;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored `readings` table cannot hold a record; nothing of the batch was written.
    #[error("Readings table does not match the record shape: no {column} column")]
    SchemaMismatch { column: Column },

    #[error("Invalid date range: {0}")]
    InvalidRange(#[from] QueryError),

    #[error("Storage failure: {0}")]
    IoFailure(#[from] sqlx::Error),
}
