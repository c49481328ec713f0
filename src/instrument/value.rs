//! Display copies of arguments and results

use serde::Serialize;
use serde_json::Value;

/// Logged in place of a value that cannot be serialized
pub const UNSERIALIZABLE: &str = "<unserializable>";

/// Capture a display copy of `value`
///
/// The copy is what redaction functions see and what ends up in the log
/// line; the caller keeps the original.
pub fn loggable<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|_| Value::String(UNSERIALIZABLE.to_string()))
}

/// Build the argument list for an instrumented call
///
/// # Example
///
/// ```
/// use rust_debug_logger::log_args;
///
/// let id = "123";
/// let args = log_args!(id, 42);
/// assert_eq!(serde_json::Value::Array(args).to_string(), r#"["123",42]"#);
/// ```
#[macro_export]
macro_rules! log_args {
    ($($arg:expr),* $(,)?) => {
        ::std::vec![$($crate::instrument::loggable(&$arg)),*]
    };
}
