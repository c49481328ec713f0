//! Logging macros for variadic emission.
//!
//! Each macro takes a [`Logger`](crate::Logger) followed by any number of
//! values implementing `Display`. The values are written after the
//! namespace tag, separated by spaces.
//!
//! # Examples
//!
//! ```
//! use rust_debug_logger::{info, make_logger};
//!
//! let logger = make_logger("server");
//!
//! // Basic logging
//! info!(logger, "started");
//!
//! // Several values: "[server] listening on 8080"
//! let port = 8080;
//! info!(logger, "listening on", port);
//! ```

/// Log values at an explicit level.
///
/// # Examples
///
/// ```
/// # use rust_debug_logger::prelude::*;
/// # let logger = make_logger("app");
/// use rust_debug_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code:", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr $(, $value:expr)* $(,)?) => {
        $logger.log($level, &[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Log a debug-level line; written only while the enablement rule is true.
///
/// # Examples
///
/// ```
/// # use rust_debug_logger::prelude::*;
/// # let logger = make_logger("app");
/// use rust_debug_logger::debug;
/// debug!(logger, "Counter value:", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Debug $(, $value)*)
    };
}

/// Log an info-level line.
///
/// # Examples
///
/// ```
/// # use rust_debug_logger::prelude::*;
/// # let logger = make_logger("app");
/// use rust_debug_logger::info;
/// info!(logger, "Processing", 100, "items");
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Info $(, $value)*)
    };
}

/// Log a warn-level line.
///
/// # Examples
///
/// ```
/// # use rust_debug_logger::prelude::*;
/// # let logger = make_logger("app");
/// use rust_debug_logger::warn;
/// warn!(logger, "Retry attempt", 3, "of", 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Warn $(, $value)*)
    };
}

/// Log an error-level line.
///
/// # Examples
///
/// ```
/// # use rust_debug_logger::prelude::*;
/// # let logger = make_logger("app");
/// use rust_debug_logger::error;
/// error!(logger, "Failed to connect to", "db-1");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        $crate::log!($logger, $crate::LogLevel::Error $(, $value)*)
    };
}

/// Debug-level line that is removed at compile time when
/// [`DEV_MODE`](crate::DEV_MODE) is `Some(false)`, together with its
/// argument expressions.
///
/// # Examples
///
/// ```
/// # use rust_debug_logger::prelude::*;
/// use rust_debug_logger::dev_debug;
/// let logger = make_dev_logger("render");
/// dev_debug!(logger, "frame", 42);
/// ```
#[macro_export]
macro_rules! dev_debug {
    ($logger:expr $(, $value:expr)* $(,)?) => {
        if !::std::matches!($crate::DEV_MODE, ::std::option::Option::Some(false)) {
            $crate::debug!($logger $(, $value)*)
        }
    };
}
