//! # Rust Debug Logger
//!
//! Namespaced, leveled console logging with debug output gated by a
//! process-wide enablement rule, plus automatic call instrumentation.
//!
//! ## Features
//!
//! - **Namespaced Loggers**: every line is prefixed with `[namespace]`
//! - **Gated Debug Output**: debug lines follow a replaceable rule, by
//!   default "not running in production"
//! - **Dev-only Loggers**: [`make_dev_logger`] turns into a no-op when the
//!   crate is built with `DEV_MODE=false` or the `strip-dev-logs` feature
//! - **Call Instrumentation**: [`with_debug_proxy`] with [`proxy_call!`], and
//!   [`debug_log!`], log arguments, results and failures without changing
//!   behavior
//! - **Pluggable Output**: console by default, in-memory capture for tests
//!
//! ## Example
//!
//! ```
//! use rust_debug_logger::prelude::*;
//!
//! let log = make_logger("UserService");
//! log.info(&[&"Server started on port", &8080]);
//!
//! set_enable_rule(|| false);
//! log.debug(&[&"not written"]);
//! reset_enable_rule();
//! ```

pub mod appenders;
pub mod core;
pub mod instrument;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, MemoryAppender};
    pub use crate::core::{
        is_debug_enabled, make_dev_logger, make_dev_logger_with, make_logger, reset_enable_rule,
        set_enable_rule, Appender, Channel, Console, ConsoleBuilder, EnableRule, EnvRule,
        FlagStore, LogEntry, LogLevel, Logger, LoggerError, LoggerMetrics, MemoryFlagStore,
        DEV_MODE,
    };
    pub use crate::instrument::{
        loggable, with_debug_proxy, DebugLog, DebugProxy, DecoratedMethod, InstrumentOptions,
        MethodHandle,
    };
    pub use crate::{debug_log, log_args, proxy_call};
}

pub use appenders::{ConsoleAppender, MemoryAppender};
pub use core::{
    is_debug_enabled, make_dev_logger, make_dev_logger_with, make_logger, reset_enable_rule,
    set_enable_rule, Appender, Channel, Console, ConsoleBuilder, EnableRule, EnvRule, FlagStore,
    LogEntry, LogLevel, Logger, LoggerError, LoggerMetrics, MemoryFlagStore, Result, DEV_MODE,
};
pub use instrument::{
    loggable, with_debug_proxy, DebugLog, DebugProxy, DecoratedMethod, InstrumentOptions,
    MethodHandle,
};
