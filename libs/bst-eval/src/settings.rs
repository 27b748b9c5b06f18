//! Interpreter settings.

use config::constants::{Limits, ENTRY_MAX, GLOBAL_MAX};

/// Limits and built-in values used by a [`Machine`](crate::Machine).
///
/// # Examples
/// ```
/// use bst_eval::EvalConfig;
/// let config = EvalConfig::default().with_max_call_depth(64);
/// assert_eq!(config.limits.max_call_depth, 64);
/// assert_eq!(config.entry_max, 250);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    pub limits: Limits,
    /// Value of `entry.max$`; entry strings are truncated to this length.
    pub entry_max: i64,
    /// Value of `global.max$`; global strings are truncated to this length.
    pub global_max: i64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self::from(Limits::default())
    }
}

impl From<Limits> for EvalConfig {
    fn from(limits: Limits) -> Self {
        Self {
            limits,
            entry_max: ENTRY_MAX,
            global_max: GLOBAL_MAX,
        }
    }
}

impl EvalConfig {
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.limits.max_call_depth = depth.max(1);
        self
    }

    pub fn with_max_stack_size(mut self, size: usize) -> Self {
        self.limits.max_stack_size = size.max(1);
        self
    }

    pub fn with_max_while_iterations(mut self, iterations: usize) -> Self {
        self.limits.max_while_iterations = iterations.max(1);
        self
    }
}
