//! tally-storage-json
//!
//! Single-document JSON persistence for the ledger. Every save rewrites the
//! whole document through a temporary sibling file and an atomic rename.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use tally_core::{storage::LedgerStorage, CoreError};
use tally_domain::Ledger;

const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence for the ledger.
#[derive(Debug, Clone)]
pub struct JsonLedgerStorage {
    path: PathBuf,
}

impl JsonLedgerStorage {
    /// Prepares storage at `path`, creating parent directories as needed.
    pub fn new(path: PathBuf) -> Result<Self, CoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn load_ledger(&self) -> Result<Ledger, CoreError> {
        if !self.path.exists() {
            tracing::info!(path = %self.path.display(), "no ledger file yet; starting empty");
            return Ok(Ledger::new());
        }
        load_ledger_from_path(&self.path)
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError> {
        save_ledger_to_path(ledger, &self.path)
    }
}

/// Saves a ledger to an arbitrary path on disk.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = tmp_path(path);
    write_durable(&tmp, &serialize_ledger(ledger)?)?;
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), records = ledger.record_count(), "ledger saved");
    Ok(())
}

/// Loads a ledger from the provided filesystem path.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_durable(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_ledger(ledger: &Ledger) -> Result<String, CoreError> {
    serde_json::to_string_pretty(ledger).map_err(|err| CoreError::Serde(err.to_string()))
}
