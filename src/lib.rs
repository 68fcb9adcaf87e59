#![doc(test(attr(deny(warnings))))]

//! Tally records income and expense messages into a durable ledger and
//! answers with daily, monthly and yearly reports, on request or on schedule.

pub mod app;
pub mod cli;
pub mod commands;
pub mod delivery;
pub mod errors;
pub mod runtime;
pub mod utils;

use std::sync::Once;

pub use app::{App, Reply};
pub use commands::{parse_command, Command, CommandError};
pub use delivery::{ConsoleChannel, DeliveryChannel, DeliveryError};
pub use errors::AppError;
pub use runtime::{Event, Runtime, TriggerTimer};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Tally tracing initialized.");
    });
}
