use tally_domain::Amount;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid amount: {0} (amounts must be positive and at most 18446744073709551615)")]
    InvalidAmount(Amount),
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl CoreError {
    /// True for failures of the persistence backend, where the caller should retry.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            CoreError::StorageUnavailable(_) | CoreError::Io(_) | CoreError::Serde(_)
        )
    }
}
