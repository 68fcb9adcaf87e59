//! tally-core
//!
//! Record store, aggregation, report formatting and the report schedule.
//! Depends on tally-domain. No CLI, no terminal I/O, no direct file access.

pub mod aggregation;
pub mod error;
pub mod format;
pub mod record_store;
pub mod report;
pub mod schedule;
pub mod storage;
pub mod time;

pub use aggregation::*;
pub use error::CoreError;
pub use format::*;
pub use record_store::*;
pub use report::*;
pub use schedule::*;
pub use storage::*;
pub use time::*;

#[cfg(test)]
mod tests;
