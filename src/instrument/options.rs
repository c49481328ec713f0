//! Options for the instrumentation wrapper

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Returns true for method names that must not be instrumented
pub type OptOut = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Rewrites the logged copy of a call's arguments
pub type ArgsRedactor = Arc<dyn Fn(&[Value], &str) -> Vec<Value> + Send + Sync>;

/// Rewrites the logged copy of a call's result
pub type ResultRedactor = Arc<dyn Fn(&Value, &str) -> Value + Send + Sync>;

/// Chooses the namespace for a method; `None` keeps `<name>.<method>`
pub type NamespaceFor = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Configuration for one [`with_debug_proxy`](super::with_debug_proxy) call
///
/// Every field is optional; an absent field means no transformation.
/// Redaction only changes what is logged, never what callers receive.
///
/// # Example
///
/// ```
/// use rust_debug_logger::InstrumentOptions;
/// use serde_json::Value;
///
/// let options = InstrumentOptions::new()
///     .opt_out(|method| method == "health")
///     .redact_args(|args, method| {
///         if method == "login" {
///             vec![Value::from("***"); args.len()]
///         } else {
///             args.to_vec()
///         }
///     })
///     .namespace_for(|method| (method == "login").then(|| "auth".to_string()));
///
/// assert!(options.is_opted_out("health"));
/// assert_eq!(options.namespace("UserService", "login"), "auth");
/// assert_eq!(options.namespace("UserService", "get_user"), "UserService.get_user");
/// ```
#[derive(Clone, Default)]
pub struct InstrumentOptions {
    opt_out: Option<OptOut>,
    redact_args: Option<ArgsRedactor>,
    redact_result: Option<ResultRedactor>,
    namespace_for: Option<NamespaceFor>,
}

impl InstrumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn opt_out<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.opt_out = Some(Arc::new(f));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn redact_args<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value], &str) -> Vec<Value> + Send + Sync + 'static,
    {
        self.redact_args = Some(Arc::new(f));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn redact_result<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value, &str) -> Value + Send + Sync + 'static,
    {
        self.redact_result = Some(Arc::new(f));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn namespace_for<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.namespace_for = Some(Arc::new(f));
        self
    }

    pub fn is_opted_out(&self, method: &str) -> bool {
        self.opt_out.as_ref().is_some_and(|f| f(method))
    }

    /// Namespace for one call of `method` on a target wrapped as `name`
    pub fn namespace(&self, name: &str, method: &str) -> String {
        self.namespace_for
            .as_ref()
            .and_then(|f| f(method))
            .unwrap_or_else(|| format!("{}.{}", name, method))
    }

    pub(crate) fn args_redactor(&self) -> Option<ArgsRedactor> {
        self.redact_args.clone()
    }

    pub(crate) fn result_redactor(&self) -> Option<ResultRedactor> {
        self.redact_result.clone()
    }
}

impl fmt::Debug for InstrumentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentOptions")
            .field("opt_out", &self.opt_out.is_some())
            .field("redact_args", &self.redact_args.is_some())
            .field("redact_result", &self.redact_result.is_some())
            .field("namespace_for", &self.namespace_for.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_identity() {
        let options = InstrumentOptions::new();
        assert!(!options.is_opted_out("anything"));
        assert_eq!(options.namespace("Svc", "run"), "Svc.run");
        assert!(options.args_redactor().is_none());
        assert!(options.result_redactor().is_none());
    }

    #[test]
    fn test_namespace_override_falls_back() {
        let options = InstrumentOptions::new()
            .namespace_for(|m| m.strip_prefix("admin_").map(|rest| format!("admin.{}", rest)));

        assert_eq!(options.namespace("Svc", "admin_purge"), "admin.purge");
        assert_eq!(options.namespace("Svc", "list"), "Svc.list");
    }

    #[test]
    fn test_debug_lists_configured_fields() {
        let options = InstrumentOptions::new().opt_out(|_| true);
        let rendered = format!("{:?}", options);
        assert!(rendered.contains("opt_out: true"));
        assert!(rendered.contains("redact_args: false"));
    }
}
