//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants.

use crate::constants::*;

// =============================================================================
// GRAMMAR TESTS
// =============================================================================

#[test]
fn test_grammar_name_is_lowercase() {
    assert_eq!(GRAMMAR_NAME, GRAMMAR_NAME.to_lowercase());
}

#[test]
fn test_file_extensions_have_no_dot() {
    for ext in FILE_EXTENSIONS {
        assert!(!ext.starts_with('.'), "extension {ext} should not start with a dot");
    }
}

// =============================================================================
// BUILT-IN VARIABLE TESTS
// =============================================================================

#[test]
fn test_entry_max_smaller_than_global_max() {
    assert!(ENTRY_MAX < GLOBAL_MAX, "entry.max$ should be below global.max$");
}

// =============================================================================
// LIMIT TESTS
// =============================================================================

#[test]
fn test_red_zone_fits_in_stack_segment() {
    assert!(STACKER_RED_ZONE_BYTES * 4 <= STACKER_STACK_SIZE_BYTES);
}

#[test]
fn test_limits_are_positive() {
    assert!(MAX_CALL_DEPTH > 0);
    assert!(MAX_STACK_SIZE > 0);
    assert!(MAX_WHILE_ITERATIONS > 0);
    assert!(MAX_FILE_SIZE > 0);
}
