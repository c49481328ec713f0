//! Console appender implementation

use crate::core::{Appender, Channel, LogEntry, LoggerError, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

/// Writes `[<namespace>] <values...>` lines to the terminal.
///
/// The `log` and `info` channels go to stdout, `warn` and `error` to
/// stderr. Write failures are returned to the caller.
pub struct ConsoleAppender {
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Format the line, coloring the namespace tag by level when enabled
    #[cfg(feature = "console")]
    fn format_line(&self, entry: &LogEntry) -> String {
        if !self.use_colors {
            return entry.line();
        }

        let tag = entry.tag().color(entry.level.color_code()).to_string();
        if entry.message.is_empty() {
            tag
        } else {
            format!("{} {}", tag, entry.message)
        }
    }

    #[cfg(not(feature = "console"))]
    fn format_line(&self, entry: &LogEntry) -> String {
        entry.line()
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_line(entry);

        let written = if entry.channel.is_stderr() {
            writeln!(std::io::stderr().lock(), "{}", output)
        } else {
            writeln!(std::io::stdout().lock(), "{}", output)
        };

        written.map_err(|e| {
            let stream = match entry.channel {
                Channel::Warn | Channel::Error => "stderr",
                Channel::Log | Channel::Info => "stdout",
            };
            LoggerError::io_operation(format!("writing to {}", stream), "console write failed", e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_plain_format() {
        let appender = ConsoleAppender::with_colors(false);
        let entry = LogEntry::new(LogLevel::Info, "svc", "ready 8080");
        assert_eq!(appender.format_line(&entry), "[svc] ready 8080");
    }

    #[cfg(feature = "console")]
    #[test]
    fn test_colored_format_keeps_content() {
        colored::control::set_override(true);
        let appender = ConsoleAppender::with_colors(true);
        let entry = LogEntry::new(LogLevel::Error, "svc", "down");
        let line = appender.format_line(&entry);
        assert!(line.contains("[svc]"));
        assert!(line.ends_with(" down"));
    }

    #[test]
    fn test_append_all_channels() {
        let mut appender = ConsoleAppender::with_colors(false);
        for level in LogLevel::ALL {
            let entry = LogEntry::new(level, "console-test", "line");
            assert!(appender.append(&entry).is_ok());
        }
        assert!(appender.flush().is_ok());
    }
}
