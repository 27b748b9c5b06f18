//! Tests for the centralized configuration constants.

use super::*;

/// Ensures default limits mirror the constants.
#[test]
fn default_limits_match_constants() {
    let limits = Limits::default();
    assert_eq!(limits.max_call_depth, MAX_CALL_DEPTH);
    assert_eq!(limits.max_stack_size, MAX_STACK_SIZE);
    assert_eq!(limits.max_while_iterations, MAX_WHILE_ITERATIONS);
}

/// Validates the builder rejects invalid values.
#[test]
fn new_validates_inputs() {
    assert_eq!(
        Limits::new(0, 10, 10).unwrap_err(),
        ConfigError::InvalidCallDepth(0)
    );
    assert_eq!(
        Limits::new(10, 0, 10).unwrap_err(),
        ConfigError::InvalidStackSize(0)
    );
    assert_eq!(
        Limits::new(10, 10, 0).unwrap_err(),
        ConfigError::InvalidIterations(0)
    );
}

#[test]
fn config_error_display_names_the_setting() {
    let msg = ConfigError::InvalidStackSize(0).to_string();
    assert!(msg.contains("max_stack_size"));
}
