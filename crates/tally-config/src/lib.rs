//! tally-config
//!
//! Persistent settings for the ledger runtime: report schedule, delivery
//! destination, and ledger location. Owns the Config model plus disk helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
