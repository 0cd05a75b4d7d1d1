//! Store errors and their mapping into repository errors

use colloquy_application::RepositoryError;
use thiserror::Error;

/// Low-level storage failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for RepositoryError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Io(e) => RepositoryError::Storage(e.to_string()),
            StoreError::Json(e) => RepositoryError::Serialization(e.to_string()),
        }
    }
}
