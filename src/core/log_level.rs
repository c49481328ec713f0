//! Log level and output channel definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub const ALL: [LogLevel; 4] = [LogLevel::Debug, LogLevel::Info, LogLevel::Warn, LogLevel::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Channel this level is written to.
    ///
    /// Debug output goes to the general `Log` channel rather than a
    /// dedicated debug channel.
    pub fn channel(&self) -> Channel {
        match self {
            LogLevel::Debug => Channel::Log,
            LogLevel::Info => Channel::Info,
            LogLevel::Warn => Channel::Warn,
            LogLevel::Error => Channel::Error,
        }
    }

    /// Whether the enablement rule gates this level
    #[inline]
    pub fn is_gated(&self) -> bool {
        matches!(self, LogLevel::Debug)
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Blue,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

/// Console channel a log line is routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Log,
    Info,
    Warn,
    Error,
}

impl Channel {
    pub fn to_str(&self) -> &'static str {
        match self {
            Channel::Log => "log",
            Channel::Info => "info",
            Channel::Warn => "warn",
            Channel::Error => "error",
        }
    }

    /// Whether a terminal console writes this channel to stderr
    pub fn is_stderr(&self) -> bool {
        matches!(self, Channel::Warn | Channel::Error)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}
