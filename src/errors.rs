use tally_config::ConfigError;
use tally_core::CoreError;
use thiserror::Error;

use crate::{commands::CommandError, delivery::DeliveryError};

/// Top-level failures surfaced by the application and the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Line editor error: {0}")]
    Readline(String),
    #[error("Event loop has stopped")]
    RuntimeClosed,
}
