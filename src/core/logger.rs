//! Namespaced logger and its factories

use super::{
    console::Console,
    error::Result,
    log_entry::LogEntry,
    log_level::LogLevel,
};
use std::fmt;
use std::sync::Arc;

/// Build-time development flag consulted by [`make_dev_logger`]
///
/// `Some(false)` when the `strip-dev-logs` feature is enabled or the crate
/// was compiled with `DEV_MODE=false` (or `0`); `Some(true)` for
/// `DEV_MODE=true` (or `1`); `None` when the flag is not set.
pub const DEV_MODE: Option<bool> = if cfg!(feature = "strip-dev-logs") {
    Some(false)
} else {
    parse_dev_flag(option_env!("DEV_MODE"))
};

const fn parse_dev_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some(v) => {
            let v = v.as_bytes();
            if bytes_eq(v, b"true") || bytes_eq(v, b"1") {
                Some(true)
            } else if bytes_eq(v, b"false") || bytes_eq(v, b"0") {
                Some(false)
            } else {
                None
            }
        }
        None => None,
    }
}

const fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// A leveled logger bound to one namespace.
///
/// Every line starts with the bracketed namespace tag followed by the
/// supplied values, rendered with `Display` and separated by spaces.
/// Debug lines are written only while the console's enablement rule
/// returns true; info, warn and error are always written.
///
/// Cloning is cheap: the namespace and console are shared.
#[derive(Clone)]
pub struct Logger {
    namespace: Arc<str>,
    console: Option<Arc<Console>>,
}

impl Logger {
    /// Create a logger writing to an explicit console
    #[must_use]
    pub fn with_console(namespace: impl Into<Arc<str>>, console: Arc<Console>) -> Self {
        Self {
            namespace: namespace.into(),
            console: Some(console),
        }
    }

    /// A logger whose every operation does nothing
    #[must_use]
    pub fn noop(namespace: impl Into<Arc<str>>) -> Self {
        Self {
            namespace: namespace.into(),
            console: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn is_noop(&self) -> bool {
        self.console.is_none()
    }

    pub fn console(&self) -> Option<&Arc<Console>> {
        self.console.as_ref()
    }

    /// Emit one line, returning any appender failure to the caller
    pub fn try_log(&self, level: LogLevel, values: &[&dyn fmt::Display]) -> Result<()> {
        let Some(console) = &self.console else {
            return Ok(());
        };

        // The rule is read on every debug call and never cached
        if level.is_gated() && !console.debug_enabled() {
            return Ok(());
        }

        let entry = LogEntry::from_values(level, &self.namespace, values);
        console.emit(&entry)
    }

    /// Emit one line
    ///
    /// # Panics
    ///
    /// A failing output channel is not handled here. An appender panic
    /// unwinds out of this call, and an appender error is raised as a
    /// panic carrying the error. Use [`try_log`](Self::try_log) to receive
    /// the error as a value instead.
    pub fn log(&self, level: LogLevel, values: &[&dyn fmt::Display]) {
        if let Err(e) = self.try_log(level, values) {
            panic!("[{}] {} line not written: {}", self.namespace, level, e);
        }
    }

    #[inline]
    pub fn debug(&self, values: &[&dyn fmt::Display]) {
        self.log(LogLevel::Debug, values);
    }

    #[inline]
    pub fn info(&self, values: &[&dyn fmt::Display]) {
        self.log(LogLevel::Info, values);
    }

    #[inline]
    pub fn warn(&self, values: &[&dyn fmt::Display]) {
        self.log(LogLevel::Warn, values);
    }

    #[inline]
    pub fn error(&self, values: &[&dyn fmt::Display]) {
        self.log(LogLevel::Error, values);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("namespace", &self.namespace)
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Create a logger on the process-wide console
///
/// # Example
///
/// ```
/// use rust_debug_logger::make_logger;
///
/// let log = make_logger("UserService");
/// log.info(&[&"listening on", &8080]);
/// ```
pub fn make_logger(namespace: impl Into<Arc<str>>) -> Logger {
    Logger::with_console(namespace, Arc::clone(Console::global()))
}

/// Create a logger that compiles away when [`DEV_MODE`] is `Some(false)`
pub fn make_dev_logger(namespace: impl Into<Arc<str>>) -> Logger {
    make_dev_logger_with(namespace, DEV_MODE)
}

/// Decide between a real and a no-op logger for an explicit flag
///
/// Only a flag that is defined and false yields the no-op logger.
pub fn make_dev_logger_with(namespace: impl Into<Arc<str>>, dev_mode: Option<bool>) -> Logger {
    match dev_mode {
        Some(false) => Logger::noop(namespace),
        Some(true) | None => make_logger(namespace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::{Channel, LoggerError};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn capture(rule: bool) -> (Arc<Console>, MemoryAppender) {
        let memory = MemoryAppender::new();
        let console = Console::builder()
            .appender(memory.clone())
            .enable_rule(move || rule)
            .build();
        (Arc::new(console), memory)
    }

    #[test]
    fn test_debug_goes_to_log_channel() {
        let (console, memory) = capture(true);
        let log = Logger::with_console("X", console);

        log.debug(&[&"a", &1]);

        assert_eq!(memory.lines_on(Channel::Log), vec!["[X] a 1"]);
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_debug_suppressed_error_still_written() {
        let (console, memory) = capture(false);
        let log = Logger::with_console("X", console.clone());

        log.debug(&[&"a", &1]);
        assert!(memory.is_empty());

        log.error(&[&"b"]);
        assert_eq!(memory.lines_on(Channel::Error), vec!["[X] b"]);
        assert_eq!(console.metrics().emitted(), 1);
    }

    #[test]
    fn test_levels_route_to_matching_channels() {
        let (console, memory) = capture(false);
        let log = Logger::with_console("svc", console);

        log.info(&[&"i"]);
        log.warn(&[&"w"]);
        log.error(&[&"e"]);

        assert_eq!(memory.lines_on(Channel::Info), vec!["[svc] i"]);
        assert_eq!(memory.lines_on(Channel::Warn), vec!["[svc] w"]);
        assert_eq!(memory.lines_on(Channel::Error), vec!["[svc] e"]);
    }

    #[test]
    fn test_rule_read_on_every_debug_call() {
        let switch = Arc::new(AtomicBool::new(true));
        let switch_clone = Arc::clone(&switch);
        let memory = MemoryAppender::new();
        let console = Console::builder()
            .appender(memory.clone())
            .enable_rule(move || switch_clone.load(Ordering::Relaxed))
            .build();
        let log = Logger::with_console("toggle", Arc::new(console));

        log.debug(&[&"first"]);
        switch.store(false, Ordering::Relaxed);
        log.debug(&[&"second"]);
        switch.store(true, Ordering::Relaxed);
        log.debug(&[&"third"]);

        assert_eq!(memory.lines(), vec!["[toggle] first", "[toggle] third"]);
    }

    #[test]
    fn test_noop_logger_writes_nothing() {
        let log = Logger::noop("quiet");
        assert!(log.is_noop());
        assert!(log.console().is_none());
        log.error(&[&"never"]);
        assert!(log.try_log(LogLevel::Error, &[&"never"]).is_ok());
    }

    #[test]
    fn test_try_log_propagates_appender_failure() {
        struct Broken;
        impl crate::core::Appender for Broken {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::IoError(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "closed",
                )))
            }
            fn name(&self) -> &str {
                "broken"
            }
        }

        let console = Arc::new(Console::builder().appender(Broken).build());
        let log = Logger::with_console("io", console.clone());

        let result = log.try_log(LogLevel::Warn, &[&"lost"]);
        assert!(matches!(result, Err(LoggerError::IoError(_))));

        let raised = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log.warn(&[&"lost again"]);
        }));
        let payload = raised.expect_err("warn must not swallow the failure");
        let message = payload
            .downcast_ref::<String>()
            .expect("panic carries the formatted error");
        assert!(message.starts_with("[io] WARN line not written:"), "{}", message);
        assert_eq!(console.metrics().failed(), 2);
    }

    #[test]
    fn test_appender_panic_reaches_caller() {
        struct Exploding;
        impl crate::core::Appender for Exploding {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                panic!("stdout gone");
            }
            fn name(&self) -> &str {
                "exploding"
            }
        }

        let console = Arc::new(Console::builder().appender(Exploding).build());
        let log = Logger::with_console("X", console.clone());

        let raised = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            log.error(&[&"b"]);
        }));

        let payload = raised.expect_err("the appender panic must unwind out of error()");
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"stdout gone"));
        assert_eq!(console.metrics().failed(), 1);
    }

    #[test]
    fn test_dev_logger_flag() {
        assert!(make_dev_logger_with("dev", Some(false)).is_noop());
        assert!(!make_dev_logger_with("dev", Some(true)).is_noop());
        assert!(!make_dev_logger_with("dev", None).is_noop());
        assert_eq!(make_dev_logger("dev").is_noop(), DEV_MODE == Some(false));
    }

    #[test]
    fn test_parse_dev_flag() {
        assert_eq!(parse_dev_flag(Some("true")), Some(true));
        assert_eq!(parse_dev_flag(Some("1")), Some(true));
        assert_eq!(parse_dev_flag(Some("false")), Some(false));
        assert_eq!(parse_dev_flag(Some("0")), Some(false));
        assert_eq!(parse_dev_flag(Some("yes")), None);
        assert_eq!(parse_dev_flag(None), None);
    }
}
