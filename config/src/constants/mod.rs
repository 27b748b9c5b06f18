//! Centralized configuration values shared across the BST toolchain.
//!
//! Each public item in this module documents its purpose and provides a minimal
//! usage example so that downstream crates can remain declarative and avoid
//! scattering literals.

use std::fmt;

// =============================================================================
// GRAMMAR CONSTANTS
// =============================================================================

/// Name of the language described by the grammar descriptor.
///
/// # Examples
/// ```
/// use config::constants::GRAMMAR_NAME;
/// assert_eq!(GRAMMAR_NAME, "bst");
/// ```
pub const GRAMMAR_NAME: &str = "bst";

/// Layout version of the grammar descriptor.
///
/// Bumped whenever the symbol or field tables change in a way that would
/// invalidate ids cached by a host.
///
/// # Examples
/// ```
/// use config::constants::GRAMMAR_ABI_VERSION;
/// assert!(GRAMMAR_ABI_VERSION >= 1);
/// ```
pub const GRAMMAR_ABI_VERSION: u32 = 15;

/// File extensions recognised as BST sources.
///
/// # Examples
/// ```
/// use config::constants::FILE_EXTENSIONS;
/// assert!(FILE_EXTENSIONS.contains(&"bst"));
/// ```
pub const FILE_EXTENSIONS: &[&str] = &["bst"];

/// Maximum nesting of `{ }` blocks inside a function body.
///
/// Deeper blocks are a parse error, which bounds the recursion of every
/// pass over the syntax tree.
///
/// # Examples
/// ```
/// use config::constants::MAX_BLOCK_DEPTH;
/// assert!(MAX_BLOCK_DEPTH >= 16);
/// ```
pub const MAX_BLOCK_DEPTH: usize = 100;

// =============================================================================
// BUILT-IN VARIABLES
// =============================================================================

/// Value of the built-in integer variable `entry.max$`.
///
/// Maximum length of an entry string variable in BibTeX 0.99d.
///
/// # Examples
/// ```
/// use config::constants::ENTRY_MAX;
/// assert_eq!(ENTRY_MAX, 250);
/// ```
pub const ENTRY_MAX: i64 = 250;

/// Value of the built-in integer variable `global.max$`.
///
/// Maximum length of a global string variable in BibTeX 0.99d.
///
/// # Examples
/// ```
/// use config::constants::GLOBAL_MAX;
/// assert_eq!(GLOBAL_MAX, 20_000);
/// ```
pub const GLOBAL_MAX: i64 = 20_000;

// =============================================================================
// INTERPRETER LIMITS
// =============================================================================

/// Maximum nesting of user function calls and block executions.
///
/// # Examples
/// ```
/// use config::constants::MAX_CALL_DEPTH;
/// assert!(MAX_CALL_DEPTH >= 64);
/// ```
pub const MAX_CALL_DEPTH: usize = 1000;

/// Maximum number of values on the operand stack.
///
/// # Examples
/// ```
/// use config::constants::MAX_STACK_SIZE;
/// assert!(MAX_STACK_SIZE >= 100);
/// ```
pub const MAX_STACK_SIZE: usize = 10_000;

/// Maximum number of iterations of a single `while$` loop.
///
/// # Examples
/// ```
/// use config::constants::MAX_WHILE_ITERATIONS;
/// assert!(MAX_WHILE_ITERATIONS >= 1_000);
/// ```
pub const MAX_WHILE_ITERATIONS: usize = 1_000_000;

/// Bytes of stack space reserved when growing recursion limits using the
/// `stacker` crate.
///
/// # Examples
/// ```
/// use config::constants::STACKER_STACK_SIZE_BYTES;
/// assert!(STACKER_STACK_SIZE_BYTES >= 1024);
/// ```
pub const STACKER_STACK_SIZE_BYTES: usize = 8 * 1024 * 1024;

/// Remaining stack below which `stacker` allocates a new segment.
///
/// # Examples
/// ```
/// use config::constants::{STACKER_RED_ZONE_BYTES, STACKER_STACK_SIZE_BYTES};
/// assert!(STACKER_RED_ZONE_BYTES < STACKER_STACK_SIZE_BYTES);
/// ```
pub const STACKER_RED_ZONE_BYTES: usize = 256 * 1024;

/// Maximum source file size accepted by the toolchain (in bytes).
pub const MAX_FILE_SIZE: usize = 16 * 1024 * 1024;

/// Immutable snapshot of interpreter limits that can be shared between
/// crates.
///
/// # Examples
/// ```
/// use config::constants::Limits;
/// let limits = Limits::default();
/// assert!(limits.max_stack_size > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting of function calls.
    pub max_call_depth: usize,
    /// Maximum operand stack size.
    pub max_stack_size: usize,
    /// Maximum iterations of one `while$` loop.
    pub max_while_iterations: usize,
}

impl Limits {
    /// Builds a limits snapshot, rejecting zero values.
    ///
    /// # Examples
    /// ```
    /// use config::constants::Limits;
    /// let limits = Limits::new(16, 128, 1_000).expect("valid limits");
    /// assert_eq!(limits.max_call_depth, 16);
    /// ```
    pub fn new(
        max_call_depth: usize,
        max_stack_size: usize,
        max_while_iterations: usize,
    ) -> Result<Self, ConfigError> {
        if max_call_depth == 0 {
            return Err(ConfigError::InvalidCallDepth(max_call_depth));
        }
        if max_stack_size == 0 {
            return Err(ConfigError::InvalidStackSize(max_stack_size));
        }
        if max_while_iterations == 0 {
            return Err(ConfigError::InvalidIterations(max_while_iterations));
        }
        Ok(Self {
            max_call_depth,
            max_stack_size,
            max_while_iterations,
        })
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_call_depth: MAX_CALL_DEPTH,
            max_stack_size: MAX_STACK_SIZE,
            max_while_iterations: MAX_WHILE_ITERATIONS,
        }
    }
}

/// Error returned when invalid configuration values are provided.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Raised when the call depth limit is zero.
    InvalidCallDepth(usize),
    /// Raised when the operand stack limit is zero.
    InvalidStackSize(usize),
    /// Raised when the `while$` iteration limit is zero.
    InvalidIterations(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidCallDepth(value) => {
                write!(f, "max_call_depth must be positive: {value}")
            }
            ConfigError::InvalidStackSize(value) => {
                write!(f, "max_stack_size must be positive: {value}")
            }
            ConfigError::InvalidIterations(value) => {
                write!(f, "max_while_iterations must be positive: {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests;
