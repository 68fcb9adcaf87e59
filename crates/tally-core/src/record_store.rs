//! Authoritative in-memory ledger with write-through persistence.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tally_domain::{Amount, Ledger, RecordId, TransactionKind, TransactionRecord};

use crate::{storage::LedgerStorage, CoreError};

/// Largest accepted amount; matches the inbound parser's whole-number range.
pub const MAX_AMOUNT: u64 = u64::MAX;

/// Owns the ledger and its persistence backend.
///
/// Appends are serialized behind a write lock that is held across persist and
/// publish, so a snapshot always sees either the ledger before an append or
/// after it has been durably stored.
pub struct RecordStore {
    storage: Box<dyn LedgerStorage>,
    ledger: RwLock<Ledger>,
}

impl RecordStore {
    /// Loads the current ledger from `storage`.
    pub fn open(storage: Box<dyn LedgerStorage>) -> Result<Self, CoreError> {
        let ledger = storage.load_ledger()?;
        tracing::debug!(records = ledger.record_count(), "ledger loaded");
        Ok(Self {
            storage,
            ledger: RwLock::new(ledger),
        })
    }

    /// Appends one record to the bucket for `date` and persists the ledger.
    pub fn append(
        &self,
        date: NaiveDate,
        kind: TransactionKind,
        amount: Amount,
        description: Option<&str>,
    ) -> Result<RecordId, CoreError> {
        if amount <= Decimal::ZERO || amount > Decimal::from(MAX_AMOUNT) {
            tracing::warn!(%amount, "rejected amount outside the accepted range");
            return Err(CoreError::InvalidAmount(amount));
        }

        let record = TransactionRecord::new(date, kind, amount, description);
        let id = record.id;
        let mut current = self.write()?;
        let mut next = current.clone();
        next.push(record);

        if let Err(err) = self.storage.save_ledger(&next) {
            tracing::error!(error = %err, %date, "failed to persist ledger; record dropped");
            return Err(match err {
                CoreError::StorageUnavailable(reason) => CoreError::StorageUnavailable(reason),
                other => CoreError::StorageUnavailable(other.to_string()),
            });
        }

        *current = next;
        tracing::info!(%id, %date, %kind, %amount, "record appended");
        Ok(id)
    }

    /// Point-in-time copy of the whole ledger.
    pub fn snapshot(&self) -> Result<Ledger, CoreError> {
        Ok(self.read()?.clone())
    }

    pub fn record_count(&self) -> Result<usize, CoreError> {
        Ok(self.read()?.record_count())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Ledger>, CoreError> {
        self.ledger
            .read()
            .map_err(|_| CoreError::StorageUnavailable("ledger lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Ledger>, CoreError> {
        self.ledger
            .write()
            .map_err(|_| CoreError::StorageUnavailable("ledger lock poisoned".into()))
    }
}
