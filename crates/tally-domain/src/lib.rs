//! tally-domain
//!
//! Pure domain models for the personal ledger (records, date buckets, ranges).
//! No I/O, no CLI, no storage. Only data types, calendar helpers and core enums.

pub mod common;
pub mod ledger;
pub mod transaction;

pub use common::*;
pub use ledger::*;
pub use transaction::*;
