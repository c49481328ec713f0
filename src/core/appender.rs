//! Appender trait for console-like output destinations

use super::{error::Result, log_entry::LogEntry};

/// A destination for emitted log lines.
///
/// Every appender registered on a [`Console`](super::Console) receives each
/// emitted entry; the entry's `channel` tells it which stream the line
/// belongs to.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}
