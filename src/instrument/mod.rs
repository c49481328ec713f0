//! Automatic call instrumentation
//!
//! Two ways to log a call's arguments, result and failure without touching
//! its logic:
//!
//! - [`with_debug_proxy`] wraps a whole service value; each method is
//!   reached through [`DebugProxy::method`] and can be opted out, redacted
//!   or given its own namespace through [`InstrumentOptions`].
//! - [`DebugLog`] and the [`debug_log!`](crate::debug_log) macro decorate a
//!   single method.
//!
//! Entry and success lines are debug-level and follow the enablement rule.
//! Failures are written at error level. Return values, errors and panics
//! reach the caller exactly as the original produced them.

mod call;
pub mod decorator;
pub mod options;
pub mod proxy;
pub mod value;

pub use decorator::{DebugLog, DecoratedMethod};
pub use options::{ArgsRedactor, InstrumentOptions, NamespaceFor, OptOut, ResultRedactor};
pub use proxy::{with_debug_proxy, DebugProxy, MethodHandle};
pub use value::{loggable, UNSERIALIZABLE};
