//! Runtime switch for debug-level output
//!
//! The enablement rule is a zero-argument predicate consulted on every
//! debug emission. Info, warn and error output never consult it.
//!
//! The default rule ([`EnvRule`]) enables debug output unless
//! `NODE_ENV=production`. A host with a persistent key/value store (a
//! browser's local storage, a settings file) can supply it through
//! [`FlagStore`]; a non-empty `"debug"` entry other than `"false"` then
//! forces debug output on even in production.

use super::console::Console;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether debug output is active for a single call
pub type EnableRule = Arc<dyn Fn() -> bool + Send + Sync>;

/// Environment variable read by the default rule
pub const ENV_VAR: &str = "NODE_ENV";

/// Value of [`ENV_VAR`] that disables debug output
pub const PRODUCTION: &str = "production";

/// Key looked up in a [`FlagStore`] by the default rule
pub const DEBUG_KEY: &str = "debug";

/// Persistent string store consulted by the default rule
pub trait FlagStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// In-memory [`FlagStore`]
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.values.write().remove(key);
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().get(key).cloned()
    }
}

/// The default enablement rule
#[derive(Clone, Default)]
pub struct EnvRule {
    store: Option<Arc<dyn FlagStore>>,
}

impl EnvRule {
    /// Rule for hosts without a persistent store: environment check only
    pub fn new() -> Self {
        Self { store: None }
    }

    /// Rule for browser-like hosts that persist a `"debug"` flag
    pub fn with_store(store: Arc<dyn FlagStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Evaluate against the live process environment and store
    pub fn evaluate(&self) -> bool {
        let env = std::env::var(ENV_VAR).ok();
        self.evaluate_with(env.as_deref())
    }

    /// Evaluate against an explicit `NODE_ENV` value
    pub fn evaluate_with(&self, node_env: Option<&str>) -> bool {
        let forced = self
            .store
            .as_ref()
            .and_then(|store| store.get(DEBUG_KEY))
            .is_some_and(|flag| flag_forces_debug(&flag));

        forced || env_allows_debug(node_env)
    }

    pub fn into_rule(self) -> EnableRule {
        Arc::new(move || self.evaluate())
    }
}

impl fmt::Debug for EnvRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvRule")
            .field("has_store", &self.store.is_some())
            .finish()
    }
}

/// Unset counts as "not production"
fn env_allows_debug(node_env: Option<&str>) -> bool {
    node_env != Some(PRODUCTION)
}

fn flag_forces_debug(flag: &str) -> bool {
    !flag.is_empty() && flag != "false"
}

/// The rule installed at startup
pub fn default_rule() -> EnableRule {
    EnvRule::new().into_rule()
}

/// Single-cell holder for the active rule. Last write wins.
pub struct RuleCell {
    rule: RwLock<EnableRule>,
}

impl RuleCell {
    pub fn new(rule: EnableRule) -> Self {
        Self {
            rule: RwLock::new(rule),
        }
    }

    pub fn replace(&self, rule: EnableRule) {
        *self.rule.write() = rule;
    }

    /// The currently installed rule
    pub fn current(&self) -> EnableRule {
        Arc::clone(&self.rule.read())
    }

    /// Run the installed rule. The lock is released before the predicate
    /// runs, so a rule may replace itself.
    pub fn evaluate(&self) -> bool {
        let rule = self.current();
        rule()
    }
}

impl Default for RuleCell {
    fn default() -> Self {
        Self::new(default_rule())
    }
}

impl fmt::Debug for RuleCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleCell").finish_non_exhaustive()
    }
}

/// Replace the process-wide enablement rule
///
/// # Example
///
/// ```
/// use rust_debug_logger::{is_debug_enabled, reset_enable_rule, set_enable_rule};
///
/// set_enable_rule(|| false);
/// assert!(!is_debug_enabled());
/// reset_enable_rule();
/// ```
pub fn set_enable_rule<F>(rule: F)
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    Console::global().set_enable_rule(rule);
}

/// Reinstall the default rule on the process-wide console
pub fn reset_enable_rule() {
    Console::global().set_shared_rule(default_rule());
}

/// Evaluate the process-wide rule now
pub fn is_debug_enabled() -> bool {
    Console::global().debug_enabled()
}
