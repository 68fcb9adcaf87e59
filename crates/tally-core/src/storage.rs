use std::sync::Mutex;

use tally_domain::Ledger;

use crate::CoreError;

/// Abstraction over persistence backends capable of storing the ledger.
///
/// `save_ledger` must not return before the ledger is durable; the record store
/// acknowledges appends only after it succeeds.
pub trait LedgerStorage: Send + Sync {
    /// Loads the persisted ledger, or an empty one when nothing has been stored yet.
    fn load_ledger(&self) -> Result<Ledger, CoreError>;
    fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError>;
}

/// Volatile backend that keeps the last saved ledger in memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    saved: Mutex<Option<Ledger>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(ledger: Ledger) -> Self {
        Self {
            saved: Mutex::new(Some(ledger)),
        }
    }
}

impl LedgerStorage for MemoryStorage {
    fn load_ledger(&self) -> Result<Ledger, CoreError> {
        let saved = self
            .saved
            .lock()
            .map_err(|_| CoreError::StorageUnavailable("memory storage poisoned".into()))?;
        Ok(saved.clone().unwrap_or_default())
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|_| CoreError::StorageUnavailable("memory storage poisoned".into()))?;
        *saved = Some(ledger.clone());
        Ok(())
    }
}
