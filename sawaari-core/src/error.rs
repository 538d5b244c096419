/// Error taxonomy shared by every operation boundary. Validation failures
/// are raised before any mutation; `Storage` covers backend faults after
/// inputs have been accepted.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Asset store error: {0}")]
    Asset(String),
}

pub type Result<T> = std::result::Result<T, Error>;
