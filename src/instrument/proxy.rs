//! Call-instrumentation wrapper over a whole service value
//!
//! [`with_debug_proxy`] wraps a target so that each method reached through
//! [`DebugProxy::method`] logs its arguments on entry, its result on
//! success and its error on failure. [`proxy_call!`](crate::proxy_call)
//! writes such a call from a single method-call expression, so the logged
//! name and arguments are always the ones actually passed.
//!
//! Everything reached through `Deref` is uninstrumented: fields, and also
//! methods called directly on the wrapper (`users.get_user(id)`). Only calls
//! made through [`DebugProxy::method`] or `proxy_call!` are logged.
//!
//! ```
//! use rust_debug_logger::prelude::*;
//! use serde::Serialize;
//! use std::sync::Arc;
//!
//! #[derive(Serialize, Debug, PartialEq)]
//! struct User { id: String, name: String }
//!
//! struct UserService;
//!
//! impl UserService {
//!     fn get_user(&self, id: &str) -> User {
//!         User { id: id.to_string(), name: "Alice".to_string() }
//!     }
//! }
//!
//! let memory = MemoryAppender::new();
//! let console = Arc::new(Console::builder().appender(memory.clone()).enable_rule(|| true).build());
//! let users = DebugProxy::with_console(UserService, "UserService", InstrumentOptions::new(), console);
//!
//! let id = "123";
//! let user = proxy_call!(users.get_user(id));
//!
//! assert_eq!(user.name, "Alice");
//! assert_eq!(memory.lines(), vec![
//!     r#"[UserService.get_user] → get_user ["123"]"#,
//!     r#"[UserService.get_user] ← get_user {"id":"123","name":"Alice"}"#,
//! ]);
//! ```

use super::call::CallSite;
use super::options::InstrumentOptions;
use crate::core::{Console, Logger};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::ops::Deref;
use std::sync::Arc;

/// A target wrapped for call instrumentation
///
/// `Deref` to `T` gives plain, unlogged access to the target.
pub struct DebugProxy<T> {
    target: T,
    options: InstrumentOptions,
    /// Namespace `name`; receives failure lines
    base: Logger,
}

/// Wrap `target` under `name`, logging to the process-wide console
pub fn with_debug_proxy<T>(
    target: T,
    name: impl Into<Arc<str>>,
    options: InstrumentOptions,
) -> DebugProxy<T> {
    DebugProxy::with_console(target, name, options, Arc::clone(Console::global()))
}

impl<T> DebugProxy<T> {
    pub fn with_console(
        target: T,
        name: impl Into<Arc<str>>,
        options: InstrumentOptions,
        console: Arc<Console>,
    ) -> Self {
        Self {
            target,
            options,
            base: Logger::with_console(name, console),
        }
    }

    pub fn name(&self) -> &str {
        self.base.namespace()
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn into_inner(self) -> T {
        self.target
    }

    pub fn options(&self) -> &InstrumentOptions {
        &self.options
    }

    /// Access `method` for instrumented calls
    ///
    /// The opt-out predicate is evaluated here, once. A handle obtained for
    /// an opted-out method never logs, however often it is called.
    pub fn method(&self, method: &str) -> MethodHandle<'_, T> {
        MethodHandle {
            proxy: self,
            method: method.to_string(),
            opted_out: self.options.is_opted_out(method),
        }
    }

    /// Build the logging context for one call
    fn call_site(&self, method: &str) -> CallSite {
        let namespace = self.options.namespace(self.name(), method);
        let logger = match self.base.console() {
            Some(console) => Logger::with_console(namespace, Arc::clone(console)),
            None => Logger::noop(namespace),
        };
        CallSite::new(method, logger, self.base.clone()).with_redactors(
            self.options.args_redactor(),
            self.options.result_redactor(),
        )
    }
}

impl<T> Deref for DebugProxy<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.target
    }
}

impl<T: fmt::Debug> fmt::Debug for DebugProxy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugProxy")
            .field("name", &self.name())
            .field("target", &self.target)
            .field("options", &self.options)
            .finish()
    }
}

/// One method of a [`DebugProxy`], as seen at access time
///
/// `args` passed to the call methods is the display copy used for the
/// entry line; the closure receives the target and runs the real method
/// with the caller's original values.
pub struct MethodHandle<'a, T> {
    proxy: &'a DebugProxy<T>,
    method: String,
    opted_out: bool,
}

impl<'a, T> MethodHandle<'a, T> {
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn is_opted_out(&self) -> bool {
        self.opted_out
    }

    /// Namespace the next call would log under; `None` when opted out
    pub fn namespace(&self) -> Option<String> {
        (!self.opted_out).then(|| self.proxy.options.namespace(self.proxy.name(), &self.method))
    }

    fn site(&self) -> Option<CallSite> {
        (!self.opted_out).then(|| self.proxy.call_site(&self.method))
    }

    /// Call a method returning a plain value
    pub fn invoke<R, F>(&self, args: Vec<Value>, f: F) -> R
    where
        R: Serialize,
        F: FnOnce(&'a T) -> R,
    {
        let target = &self.proxy.target;
        match self.site() {
            Some(site) => site.invoke(args, || f(target)),
            None => f(target),
        }
    }

    /// Call a method returning `Result`
    pub fn call<R, E, F>(&self, args: Vec<Value>, f: F) -> Result<R, E>
    where
        R: Serialize,
        E: fmt::Display,
        F: FnOnce(&'a T) -> Result<R, E>,
    {
        let target = &self.proxy.target;
        match self.site() {
            Some(site) => site.call(args, || f(target)),
            None => f(target),
        }
    }

    /// Call an async method resolving to `Result`
    ///
    /// Nothing happens until the returned future is polled. The entry line
    /// is then written before the method starts, and success or failure is
    /// logged once its future completes.
    pub async fn call_async<R, E, F, Fut>(&self, args: Vec<Value>, f: F) -> Result<R, E>
    where
        R: Serialize,
        E: fmt::Display,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = Result<R, E>>,
    {
        let target = &self.proxy.target;
        match self.site() {
            Some(site) => site.call_async(args, || f(target)).await,
            None => f(target).await,
        }
    }

    /// Call an async method resolving to a plain value
    pub async fn invoke_async<R, F, Fut>(&self, args: Vec<Value>, f: F) -> R
    where
        R: Serialize,
        F: FnOnce(&'a T) -> Fut,
        Fut: Future<Output = R>,
    {
        let target = &self.proxy.target;
        match self.site() {
            Some(site) => site.invoke_async(args, || f(target)).await,
            None => f(target).await,
        }
    }
}

/// Instrumented call through a [`DebugProxy`], written as a method call
///
/// The method name and the logged arguments are both taken from the call
/// expression, and each argument is evaluated exactly once. The proxy must
/// be a single token: an identifier, `self`, or a parenthesized expression.
///
/// | Form | Dispatches to |
/// |------|---------------|
/// | `proxy_call!(p.m(a, b))` | [`MethodHandle::invoke`] |
/// | `proxy_call!(p.m(a, b) => Result)` | [`MethodHandle::call`] |
/// | `proxy_call!(async p.m(a, b))` | [`MethodHandle::invoke_async`] |
/// | `proxy_call!(async p.m(a, b) => Result)` | [`MethodHandle::call_async`] |
///
/// The async forms evaluate the arguments immediately and return a future
/// that borrows the proxy.
///
/// ```
/// use rust_debug_logger::prelude::*;
/// use std::sync::Arc;
///
/// struct Accounts;
///
/// impl Accounts {
///     fn withdraw(&self, account: &str, cents: u64) -> Result<u64, String> {
///         if cents > 500 { Err("insufficient funds".into()) } else { Ok(cents) }
///     }
/// }
///
/// let memory = MemoryAppender::new();
/// let console = Arc::new(Console::builder().appender(memory.clone()).enable_rule(|| true).build());
/// let accounts = DebugProxy::with_console(Accounts, "Accounts", InstrumentOptions::new(), console);
///
/// assert_eq!(proxy_call!(accounts.withdraw("acct-1", 900) => Result), Err("insufficient funds".to_string()));
/// assert_eq!(memory.lines(), vec![
///     r#"[Accounts.withdraw] → withdraw ["acct-1",900]"#,
///     "[Accounts] withdraw failed: insufficient funds",
/// ]);
/// ```
#[macro_export]
macro_rules! proxy_call {
    (async $proxy:tt . $method:ident ( $($arg:expr),* $(,)? ) => Result) => {
        $crate::__proxy_call!(@bind [async call_async] [$proxy $method] [] $($arg,)*)
    };
    (async $proxy:tt . $method:ident ( $($arg:expr),* $(,)? )) => {
        $crate::__proxy_call!(@bind [async invoke_async] [$proxy $method] [] $($arg,)*)
    };
    ($proxy:tt . $method:ident ( $($arg:expr),* $(,)? ) => Result) => {
        $crate::__proxy_call!(@bind [sync call] [$proxy $method] [] $($arg,)*)
    };
    ($proxy:tt . $method:ident ( $($arg:expr),* $(,)? )) => {
        $crate::__proxy_call!(@bind [sync invoke] [$proxy $method] [] $($arg,)*)
    };
}

/// Binds each argument to its own local, then dispatches
#[doc(hidden)]
#[macro_export]
macro_rules! __proxy_call {
    (@bind [sync $via:ident] [$proxy:tt $method:ident] [$($bound:ident)*]) => {
        $proxy
            .method(::std::stringify!($method))
            .$via($crate::log_args!($($bound),*), |target| target.$method($($bound),*))
    };
    (@bind [async $via:ident] [$proxy:tt $method:ident] [$($bound:ident)*]) => {{
        let proxy = &$proxy;
        async move {
            proxy
                .method(::std::stringify!($method))
                .$via($crate::log_args!($($bound),*), |target| target.$method($($bound),*))
                .await
        }
    }};
    (@bind $mode:tt $call:tt [$($bound:ident)*] $arg:expr, $($rest:expr,)*) => {{
        let value = $arg;
        $crate::__proxy_call!(@bind $mode $call [$($bound)* value] $($rest,)*)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::Channel;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter {
        label: &'static str,
        hits: AtomicUsize,
    }

    impl Counter {
        fn bump(&self, by: usize) -> usize {
            self.hits.fetch_add(by, Ordering::Relaxed) + by
        }

        fn step(&self, by: usize) -> Result<usize, String> {
            if by == 0 {
                Err("zero step".to_string())
            } else {
                Ok(self.bump(by))
            }
        }

        fn span(&self, from: &str, to: &str) -> String {
            format!("{}..{}", from, to)
        }

        async fn settle(&self, by: usize) -> Result<usize, String> {
            futures::future::ready(()).await;
            self.step(by)
        }

        async fn total(&self) -> usize {
            self.hits.load(Ordering::Relaxed)
        }
    }

    fn wrap(options: InstrumentOptions) -> (DebugProxy<Counter>, MemoryAppender) {
        let memory = MemoryAppender::new();
        let console = Arc::new(
            Console::builder()
                .appender(memory.clone())
                .enable_rule(|| true)
                .build(),
        );
        let counter = Counter {
            label: "visits",
            hits: AtomicUsize::new(0),
        };
        (
            DebugProxy::with_console(counter, "Counter", options, console),
            memory,
        )
    }

    #[test]
    fn test_fields_pass_through() {
        let (proxy, memory) = wrap(InstrumentOptions::new());
        assert_eq!(proxy.label, "visits");
        assert_eq!(proxy.target().label, "visits");
        assert_eq!(proxy.name(), "Counter");
        assert!(memory.is_empty());
    }

    #[test]
    fn test_invoke_logs_under_method_namespace() {
        let (proxy, memory) = wrap(InstrumentOptions::new());
        let total = proxy.method("bump").invoke(crate::log_args!(2), |c| c.bump(2));

        assert_eq!(total, 2);
        assert_eq!(
            memory.lines_for("Counter.bump"),
            vec!["[Counter.bump] → bump [2]", "[Counter.bump] ← bump 2"]
        );
    }

    #[test]
    fn test_opt_out_decided_at_access() {
        let (proxy, memory) = wrap(InstrumentOptions::new().opt_out(|m| m == "bump"));
        let handle = proxy.method("bump");

        assert!(handle.is_opted_out());
        assert_eq!(handle.namespace(), None);
        handle.invoke(vec![], |c| c.bump(1));
        handle.invoke(vec![], |c| c.bump(1));

        assert_eq!(proxy.hits.load(Ordering::Relaxed), 2);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_failure_uses_wrapper_name() {
        let (proxy, memory) = wrap(InstrumentOptions::new());
        let result: Result<usize, String> = proxy
            .method("bump")
            .call(crate::log_args!(0), |_| Err("zero step".to_string()));

        assert_eq!(result, Err("zero step".to_string()));
        assert_eq!(
            memory.lines_on(Channel::Error),
            vec!["[Counter] bump failed: zero step"]
        );
    }

    #[test]
    fn test_namespace_override_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);
        let options = InstrumentOptions::new().namespace_for(move |_| {
            let n = calls_clone.fetch_add(1, Ordering::Relaxed);
            Some(format!("metrics.{}", n))
        });
        let (proxy, memory) = wrap(options);
        let handle = proxy.method("bump");

        handle.invoke(vec![], |c| c.bump(1));
        handle.invoke(vec![], |c| c.bump(1));

        assert_eq!(memory.lines_for("metrics.0").len(), 2);
        assert_eq!(memory.lines_for("metrics.1").len(), 2);
    }

    #[test]
    fn test_into_inner_returns_target() {
        let (proxy, _memory) = wrap(InstrumentOptions::new());
        proxy.method("bump").invoke(vec![], |c| c.bump(5));
        let counter = proxy.into_inner();
        assert_eq!(counter.hits.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_call_macro_names_method_and_args() {
        let (proxy, memory) = wrap(InstrumentOptions::new());
        let span = crate::proxy_call!(proxy.span("a", "z"));

        assert_eq!(span, "a..z");
        assert_eq!(
            memory.lines(),
            vec![
                r#"[Counter.span] → span ["a","z"]"#,
                r#"[Counter.span] ← span "a..z""#,
            ]
        );
    }

    #[test]
    fn test_call_macro_evaluates_args_once() {
        let (proxy, memory) = wrap(InstrumentOptions::new());
        let mut evaluated = 0;

        let total = crate::proxy_call!(proxy.bump({
            evaluated += 1;
            3
        }));

        assert_eq!(total, 3);
        assert_eq!(evaluated, 1);
        assert_eq!(memory.lines()[0], "[Counter.bump] → bump [3]");
    }

    #[test]
    fn test_call_macro_result_form() {
        let (proxy, memory) = wrap(InstrumentOptions::new());

        assert_eq!(crate::proxy_call!(proxy.step(2) => Result), Ok(2));
        assert_eq!(
            crate::proxy_call!(proxy.step(0) => Result),
            Err("zero step".to_string())
        );
        assert_eq!(
            memory.lines_on(Channel::Error),
            vec!["[Counter] step failed: zero step"]
        );
    }

    #[test]
    fn test_call_macro_async_forms() {
        let (proxy, memory) = wrap(InstrumentOptions::new());

        let settled = tokio_test::block_on(crate::proxy_call!(async proxy.settle(4) => Result));
        let total = tokio_test::block_on(crate::proxy_call!(async proxy.total()));

        assert_eq!(settled, Ok(4));
        assert_eq!(total, 4);
        assert_eq!(
            memory.lines(),
            vec![
                "[Counter.settle] → settle [4]",
                "[Counter.settle] ← settle 4",
                "[Counter.total] → total []",
                "[Counter.total] ← total 4",
            ]
        );
    }

    #[test]
    fn test_call_macro_respects_opt_out() {
        let (proxy, memory) = wrap(InstrumentOptions::new().opt_out(|m| m == "bump"));

        assert_eq!(crate::proxy_call!(proxy.bump(1)), 1);
        assert!(memory.is_empty());
    }

    #[test]
    fn test_deref_calls_are_not_logged() {
        let (proxy, memory) = wrap(InstrumentOptions::new());

        assert_eq!(proxy.bump(2), 2);
        assert_eq!(proxy.step(0), Err("zero step".to_string()));
        assert!(memory.is_empty());
    }
}
