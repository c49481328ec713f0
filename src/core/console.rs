//! Output sink shared by loggers
//!
//! A [`Console`] owns the appenders lines are written to, the enablement
//! rule cell and the metrics. [`Console::global`] is the process-wide
//! instance used by [`make_logger`](super::make_logger); tests and embedders
//! construct their own and bind loggers to it explicitly.

use super::{
    appender::Appender,
    enable_rule::{EnableRule, RuleCell},
    error::Result,
    log_entry::LogEntry,
    metrics::LoggerMetrics,
};
use crate::appenders::ConsoleAppender;
use parking_lot::RwLock;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Arc<Console>> = OnceLock::new();

pub struct Console {
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    rule: RuleCell,
    metrics: LoggerMetrics,
}

impl Console {
    /// A console with no appenders and the default enablement rule
    #[must_use]
    pub fn new() -> Self {
        Self {
            appenders: RwLock::new(Vec::new()),
            rule: RuleCell::default(),
            metrics: LoggerMetrics::new(),
        }
    }

    #[must_use]
    pub fn builder() -> ConsoleBuilder {
        ConsoleBuilder::new()
    }

    /// The process-wide console, writing to stdout/stderr
    pub fn global() -> &'static Arc<Console> {
        GLOBAL.get_or_init(|| {
            Arc::new(
                Console::builder()
                    .appender(ConsoleAppender::new())
                    .build(),
            )
        })
    }

    pub fn add_appender(&self, appender: Box<dyn Appender>) {
        self.appenders.write().push(appender);
    }

    pub fn clear_appenders(&self) {
        self.appenders.write().clear();
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    pub fn set_enable_rule<F>(&self, rule: F)
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.rule.replace(Arc::new(rule));
    }

    pub fn set_shared_rule(&self, rule: EnableRule) {
        self.rule.replace(rule);
    }

    pub fn enable_rule(&self) -> EnableRule {
        self.rule.current()
    }

    /// Evaluate the installed rule for one debug emission
    pub fn debug_enabled(&self) -> bool {
        self.rule.evaluate()
    }

    /// Hand an entry to every appender
    ///
    /// An appender error does not stop the others from receiving the
    /// entry; the first error is returned. An appender panic is counted
    /// as a failure and then unwinds out of this call unchanged.
    pub fn emit(&self, entry: &LogEntry) -> Result<()> {
        let mut appenders = self.appenders.write();
        let mut first_error = None;

        for appender in appenders.iter_mut() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(payload) => {
                    self.metrics.record_failed();
                    std::panic::resume_unwind(payload);
                }
            }
        }

        match first_error {
            None => {
                self.metrics.record_emitted();
                Ok(())
            }
            Some(e) => {
                self.metrics.record_failed();
                Err(e)
            }
        }
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .appenders
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        f.debug_struct("Console")
            .field("appenders", &names)
            .field("metrics", &self.metrics)
            .finish()
    }
}

/// Extract a readable message from a panic payload
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Builder for constructing a [`Console`] with a fluent API
///
/// # Example
/// ```
/// use rust_debug_logger::prelude::*;
///
/// let memory = MemoryAppender::new();
/// let console = Console::builder()
///     .appender(memory.clone())
///     .enable_rule(|| true)
///     .build();
///
/// let log = Logger::with_console("checkout", console.into());
/// log.debug(&[&"cart", &3]);
/// assert_eq!(memory.lines(), vec!["[checkout] cart 3"]);
/// ```
pub struct ConsoleBuilder {
    appenders: Vec<Box<dyn Appender>>,
    rule: Option<EnableRule>,
}

impl ConsoleBuilder {
    pub fn new() -> Self {
        Self {
            appenders: Vec::new(),
            rule: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Install an enablement rule instead of the default one
    #[must_use = "builder methods return a new value"]
    pub fn enable_rule<F>(mut self, rule: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.rule = Some(Arc::new(rule));
        self
    }

    pub fn build(self) -> Console {
        let console = Console::new();
        if let Some(rule) = self.rule {
            console.set_shared_rule(rule);
        }
        console.appenders.write().extend(self.appenders);
        console
    }
}

impl Default for ConsoleBuilder {
    fn default() -> Self {
        Self::new()
    }
}
