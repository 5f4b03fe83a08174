//! Error types for repository operations

use blogstore_storage::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("{type_tag} {id} not found")]
    NotFound { type_tag: String, id: u64 },

    #[error("{type_tag} has no id yet; store it before using it here")]
    Unassigned { type_tag: &'static str },

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] StorageError),

    #[error("Transaction aborted: {0}")]
    TransactionAborted(#[source] StorageError),

    #[error("Codec error: {0}")]
    Codec(#[from] bincode::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound { type_tag, id } => Self::NotFound { type_tag, id },
            err @ StorageError::TransactionAborted(_) => Self::TransactionAborted(err),
            other => Self::StoreUnavailable(other),
        }
    }
}
