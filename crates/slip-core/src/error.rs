use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("Malformed persisted data: {0}")]
    MalformedPersistedData(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Receipts are still loading")]
    NotReady,
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
