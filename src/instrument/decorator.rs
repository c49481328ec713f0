//! Per-method call instrumentation
//!
//! [`DebugLog`] applies the wrapper's entry/success/failure logging to a
//! single method, with no opt-out, redaction or namespace override. The
//! namespace is the one given to [`DebugLog::new`], or the method name.
//! [`debug_log!`](crate::debug_log) applies it where the method is defined.

use super::call::CallSite;
use crate::core::{Console, Logger};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DebugLog {
    namespace: Option<Arc<str>>,
    console: Arc<Console>,
}

impl DebugLog {
    /// Decorator logging to the process-wide console
    pub fn new(namespace: Option<&str>) -> Self {
        Self {
            namespace: namespace.map(Arc::from),
            console: Arc::clone(Console::global()),
        }
    }

    #[must_use]
    pub fn with_console(mut self, console: Arc<Console>) -> Self {
        self.console = console;
        self
    }

    /// Apply the decorator to `method`
    pub fn method(&self, method: &str) -> DecoratedMethod {
        let namespace = self
            .namespace
            .clone()
            .unwrap_or_else(|| Arc::from(method));
        let logger = Logger::with_console(namespace, Arc::clone(&self.console));
        DecoratedMethod {
            site: CallSite::new(method, logger.clone(), logger),
        }
    }
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::new(None)
    }
}

/// A method with decorator logging applied
#[derive(Clone)]
pub struct DecoratedMethod {
    site: CallSite,
}

impl DecoratedMethod {
    pub fn namespace(&self) -> &str {
        self.site.namespace()
    }

    pub fn invoke<R, F>(&self, args: Vec<Value>, f: F) -> R
    where
        R: Serialize,
        F: FnOnce() -> R,
    {
        self.site.invoke(args, f)
    }

    pub fn call<T, E, F>(&self, args: Vec<Value>, f: F) -> Result<T, E>
    where
        T: Serialize,
        E: fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        self.site.call(args, f)
    }

    pub async fn call_async<T, E, F, Fut>(&self, args: Vec<Value>, f: F) -> Result<T, E>
    where
        T: Serialize,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.site.clone().call_async(args, f).await
    }

    pub async fn invoke_async<R, F, Fut>(&self, args: Vec<Value>, f: F) -> R
    where
        R: Serialize,
        F: FnOnce() -> Fut,
        Fut: Future<Output = R>,
    {
        self.site.clone().invoke_async(args, f).await
    }
}

impl fmt::Debug for DecoratedMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoratedMethod")
            .field("namespace", &self.namespace())
            .finish()
    }
}

/// Instrument methods where they are defined
///
/// Accepts `fn` and `async fn` items taking `&self` plus named arguments
/// with an explicit return type. A `Result<T, E>` return logs `Err` values
/// as failures; any other return type must implement `Serialize`.
/// Arguments must implement `Serialize` so they can be logged.
///
/// ```
/// use rust_debug_logger::debug_log;
///
/// struct Billing;
///
/// impl Billing {
///     debug_log! {
///         namespace = "Billing";
///         pub fn charge(&self, cents: u64) -> Result<u64, String> {
///             if cents == 0 {
///                 return Err("nothing to charge".to_string());
///             }
///             Ok(cents)
///         }
///     }
///
///     debug_log! {
///         fn describe(&self) -> String {
///             "billing".to_string()
///         }
///     }
/// }
///
/// assert_eq!(Billing.charge(250), Ok(250));
/// assert!(Billing.charge(0).is_err());
/// assert_eq!(Billing.describe(), "billing");
/// ```
#[macro_export]
macro_rules! debug_log {
    (namespace = $ns:expr; $($item:tt)*) => {
        $crate::__debug_log_items! { (::std::option::Option::Some($ns)) $($item)* }
    };
    ($($item:tt)*) => {
        $crate::__debug_log_items! { (::std::option::Option::None) $($item)* }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __debug_log_items {
    (($ns:expr)) => {};

    // async fn returning Result
    (($ns:expr)
        $(#[$meta:meta])*
        $vis:vis async fn $name:ident(&$self:ident $(, $arg:ident : $ty:ty)* $(,)?)
            -> Result<$ok:ty, $err:ty> $body:block
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        $vis async fn $name(&$self $(, $arg: $ty)*) -> ::std::result::Result<$ok, $err> {
            $crate::DebugLog::new($ns)
                .method(::std::stringify!($name))
                .call_async($crate::log_args!($($arg),*), || async move {
                    let outcome: ::std::result::Result<$ok, $err> = async move { $body }.await;
                    outcome
                })
                .await
        }
        $crate::__debug_log_items! { ($ns) $($rest)* }
    };

    // async fn returning a plain value
    (($ns:expr)
        $(#[$meta:meta])*
        $vis:vis async fn $name:ident(&$self:ident $(, $arg:ident : $ty:ty)* $(,)?)
            -> $ret:ty $body:block
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        $vis async fn $name(&$self $(, $arg: $ty)*) -> $ret {
            $crate::DebugLog::new($ns)
                .method(::std::stringify!($name))
                .invoke_async($crate::log_args!($($arg),*), || async move {
                    let value: $ret = async move { $body }.await;
                    value
                })
                .await
        }
        $crate::__debug_log_items! { ($ns) $($rest)* }
    };

    // fn returning Result
    (($ns:expr)
        $(#[$meta:meta])*
        $vis:vis fn $name:ident(&$self:ident $(, $arg:ident : $ty:ty)* $(,)?)
            -> Result<$ok:ty, $err:ty> $body:block
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        $vis fn $name(&$self $(, $arg: $ty)*) -> ::std::result::Result<$ok, $err> {
            $crate::DebugLog::new($ns)
                .method(::std::stringify!($name))
                .call($crate::log_args!($($arg),*), || -> ::std::result::Result<$ok, $err> { $body })
        }
        $crate::__debug_log_items! { ($ns) $($rest)* }
    };

    // fn returning a plain value
    (($ns:expr)
        $(#[$meta:meta])*
        $vis:vis fn $name:ident(&$self:ident $(, $arg:ident : $ty:ty)* $(,)?)
            -> $ret:ty $body:block
        $($rest:tt)*
    ) => {
        $(#[$meta])*
        $vis fn $name(&$self $(, $arg: $ty)*) -> $ret {
            $crate::DebugLog::new($ns)
                .method(::std::stringify!($name))
                .invoke($crate::log_args!($($arg),*), || -> $ret { $body })
        }
        $crate::__debug_log_items! { ($ns) $($rest)* }
    };
}
