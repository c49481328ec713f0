//! Log entry structure

use super::log_level::{Channel, LogLevel};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One emitted line: a namespace tag followed by the rendered values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub channel: Channel,
    pub namespace: String,
    pub message: String,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, namespace: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            level,
            channel: level.channel(),
            namespace: namespace.into(),
            message: Self::sanitize_message(&message),
        }
    }

    /// Build an entry from a list of values, each rendered with `Display`
    /// and separated by a single space.
    pub fn from_values(level: LogLevel, namespace: &str, values: &[&dyn fmt::Display]) -> Self {
        let mut message = String::new();
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                message.push(' ');
            }
            use std::fmt::Write;
            // Writing into a String cannot fail
            let _ = write!(message, "{}", value);
        }
        Self::new(level, namespace, message)
    }

    /// The bracketed namespace tag, e.g. `[UserService]`
    pub fn tag(&self) -> String {
        format!("[{}]", self.namespace)
    }

    /// Full output line: `[<namespace>] <values...>`
    pub fn line(&self) -> String {
        if self.message.is_empty() {
            self.tag()
        } else {
            format!("[{}] {}", self.namespace, self.message)
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line())
    }
}
