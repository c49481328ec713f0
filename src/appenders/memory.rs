//! In-memory appender for capturing output

use crate::core::{Appender, Channel, LogEntry, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects entries in memory.
///
/// Clones share the same buffer, so a clone can be registered on a
/// [`Console`](crate::Console) while the original is kept for inspection.
///
/// # Example
///
/// ```
/// use rust_debug_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let console = Console::builder().appender(memory.clone()).build();
/// Logger::with_console("db", console.into()).warn(&[&"slow query"]);
///
/// assert_eq!(memory.lines_on(Channel::Warn), vec!["[db] slow query"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every captured entry, oldest first
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Captured lines in `[<namespace>] ...` form
    pub fn lines(&self) -> Vec<String> {
        self.entries.lock().iter().map(LogEntry::line).collect()
    }

    pub fn lines_on(&self, channel: Channel) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.channel == channel)
            .map(LogEntry::line)
            .collect()
    }

    /// Captured lines whose namespace equals `namespace`
    pub fn lines_for(&self, namespace: &str) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|e| e.namespace == namespace)
            .map(LogEntry::line)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
