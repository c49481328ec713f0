//! Entry, success and failure logging around one call
//!
//! Shared by the wrapper and the decorator. The original return value,
//! error or panic payload always reaches the caller untouched; only the
//! logged copies pass through the redactors.

use super::options::{ArgsRedactor, ResultRedactor};
use super::value::loggable;
use crate::core::console::panic_message;
use crate::core::Logger;
use futures::FutureExt;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

const ENTER: &str = "→";
const EXIT: &str = "←";

#[derive(Clone)]
pub(crate) struct CallSite {
    method: String,
    /// Per-call namespace; entry and success lines
    logger: Logger,
    /// Failure lines
    base: Logger,
    redact_args: Option<ArgsRedactor>,
    redact_result: Option<ResultRedactor>,
}

impl CallSite {
    pub(crate) fn new(method: &str, logger: Logger, base: Logger) -> Self {
        Self {
            method: method.to_string(),
            logger,
            base,
            redact_args: None,
            redact_result: None,
        }
    }

    pub(crate) fn with_redactors(
        mut self,
        redact_args: Option<ArgsRedactor>,
        redact_result: Option<ResultRedactor>,
    ) -> Self {
        self.redact_args = redact_args;
        self.redact_result = redact_result;
        self
    }

    pub(crate) fn namespace(&self) -> &str {
        self.logger.namespace()
    }

    fn enter(&self, args: Vec<Value>) {
        let shown = match &self.redact_args {
            Some(redact) => redact(&args, &self.method),
            None => args,
        };
        self.logger
            .debug(&[&ENTER, &self.method, &Value::Array(shown)]);
    }

    fn succeed<R: Serialize + ?Sized>(&self, value: &R) {
        let copy = loggable(value);
        let shown = match &self.redact_result {
            Some(redact) => redact(&copy, &self.method),
            None => copy,
        };
        self.logger.debug(&[&EXIT, &self.method, &shown]);
    }

    fn fail(&self, error: &dyn fmt::Display) {
        let label = format!("{} failed:", self.method);
        self.base.error(&[&label, error]);
    }

    fn fail_with_panic(&self, payload: &(dyn std::any::Any + Send)) {
        let message = format!("panicked: {}", panic_message(payload));
        self.fail(&message);
    }

    /// Call returning a plain value
    pub(crate) fn invoke<R, F>(&self, args: Vec<Value>, f: F) -> R
    where
        R: Serialize,
        F: FnOnce() -> R,
    {
        self.enter(args);
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => {
                self.succeed(&value);
                value
            }
            Err(payload) => {
                self.fail_with_panic(payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    /// Call returning `Result`; `Err` is logged then handed back as is
    pub(crate) fn call<T, E, F>(&self, args: Vec<Value>, f: F) -> Result<T, E>
    where
        T: Serialize,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.enter(args);
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(outcome) => {
                self.settle(&outcome);
                outcome
            }
            Err(payload) => {
                self.fail_with_panic(payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }

    fn settle<T: Serialize, E: fmt::Display>(&self, outcome: &Result<T, E>) {
        match outcome {
            Ok(value) => self.succeed(value),
            Err(e) => self.fail(e),
        }
    }

    /// Deferred call resolving to `Result`
    ///
    /// The entry line is written and `f` is invoked before this returns;
    /// the outcome is logged when the returned future completes.
    pub(crate) fn call_async<T, E, F, Fut>(
        self,
        args: Vec<Value>,
        f: F,
    ) -> impl Future<Output = Result<T, E>>
    where
        T: Serialize,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let pending = self.start(args, f);
        async move {
            match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(outcome) => {
                    self.settle(&outcome);
                    outcome
                }
                Err(payload) => {
                    self.fail_with_panic(payload.as_ref());
                    panic::resume_unwind(payload)
                }
            }
        }
    }

    /// Deferred call resolving to a plain value
    pub(crate) fn invoke_async<R, F, Fut>(self, args: Vec<Value>, f: F) -> impl Future<Output = R>
    where
        R: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        let pending = self.start(args, f);
        async move {
            match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(value) => {
                    self.succeed(&value);
                    value
                }
                Err(payload) => {
                    self.fail_with_panic(payload.as_ref());
                    panic::resume_unwind(payload)
                }
            }
        }
    }

    /// Log entry and run the synchronous part of a deferred call
    fn start<F, Fut>(&self, args: Vec<Value>, f: F) -> Fut
    where
        F: FnOnce() -> Fut,
    {
        self.enter(args);
        match panic::catch_unwind(AssertUnwindSafe(f)) {
            Ok(pending) => pending,
            Err(payload) => {
                self.fail_with_panic(payload.as_ref());
                panic::resume_unwind(payload)
            }
        }
    }
}
