use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Unknown timezone `{0}` (expected an IANA name such as Asia/Tashkent)")]
    InvalidTimezone(String),

    #[error("Invalid time of day `{0}` (expected HH:MM)")]
    InvalidTime(String),

    #[error("top_expenses must be at least 1, got {0}")]
    InvalidTopExpenses(usize),
}
