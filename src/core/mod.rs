//! Core logger types and traits

pub mod appender;
pub mod console;
pub mod enable_rule;
pub mod error;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use appender::Appender;
pub use console::{Console, ConsoleBuilder};
pub use enable_rule::{
    default_rule, is_debug_enabled, reset_enable_rule, set_enable_rule, EnableRule, EnvRule,
    FlagStore, MemoryFlagStore, RuleCell, DEBUG_KEY, ENV_VAR, PRODUCTION,
};
pub use error::{LoggerError, Result};
pub use log_entry::LogEntry;
pub use log_level::{Channel, LogLevel};
pub use logger::{make_dev_logger, make_dev_logger_with, make_logger, Logger, DEV_MODE};
pub use metrics::LoggerMetrics;
