//! Outbound delivery of rendered reports.

use std::{
    io::{self, Write},
    sync::Mutex,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Delivery channel unavailable: {0}")]
    Unavailable(String),
}

/// Hands rendered text to a destination. Failures stay with the channel's caller.
pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, destination: &str, text: &str) -> Result<(), DeliveryError>;
}

/// Writes `[destination] text` blocks to a writer, stdout by default.
pub struct ConsoleChannel<W: Write + Send> {
    writer: Mutex<W>,
}

impl ConsoleChannel<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleChannel<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, DeliveryError> {
        self.writer
            .into_inner()
            .map_err(|_| DeliveryError::Unavailable("console writer poisoned".into()))
    }
}

impl<W: Write + Send> DeliveryChannel for ConsoleChannel<W> {
    fn deliver(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| DeliveryError::Unavailable("console writer poisoned".into()))?;
        writeln!(writer, "[{destination}]")?;
        writeln!(writer, "{}", text.trim_end())?;
        writer.flush()?;
        Ok(())
    }
}
