//! This crate provides the BST (BibTeX style file) grammar descriptor.
//!
//! The descriptor is a process-wide singleton: [`language`] builds it on the
//! first call and hands out the same `&'static` reference afterwards. C and C++
//! hosts reach the same object through the exported `tree_sitter_bst` and
//! `get_bst_grammar` functions declared in `bindings/c/tree-sitter-bst.h`.
//!
//! ```
//! let grammar = tree_sitter_bst::language();
//! assert_eq!(grammar.name(), "bst");
//! assert!(std::ptr::eq(grammar, tree_sitter_bst::language()));
//! ```

use std::marker::{PhantomData, PhantomPinned};
use std::sync::OnceLock;

mod grammar;

pub use grammar::{Command, FieldInfo, Grammar, NodeTypes, SymbolInfo, CROSSREF_FIELD, SORT_KEY};

/// The content of the C header for this grammar.
pub const HEADER: &str = include_str!("../c/tree-sitter-bst.h");

static GRAMMAR: OnceLock<Grammar> = OnceLock::new();

/// Returns the grammar descriptor.
///
/// The first call builds the descriptor; concurrent first callers block until
/// it is ready and all of them observe the same instance. Later calls are a
/// plain load.
pub fn language() -> &'static Grammar {
    GRAMMAR.get_or_init(Grammar::build)
}

// =============================================================================
// C ABI
// =============================================================================

/// Opaque handle the C side sees as `const BstGrammar *`.
///
/// Zero-sized and unconstructible; it only exists behind a pointer.
#[repr(C)]
pub struct BstGrammar {
    _opaque: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

impl Grammar {
    /// The descriptor as the pointer handed to C hosts.
    pub fn as_raw(&'static self) -> *const BstGrammar {
        (self as *const Grammar).cast()
    }

    /// Maps a pointer returned by the C entry points back to the descriptor.
    ///
    /// Only the singleton's own address is accepted; any other pointer,
    /// including null, yields `None`.
    pub fn from_raw(ptr: *const BstGrammar) -> Option<&'static Grammar> {
        let grammar = GRAMMAR.get()?;
        std::ptr::eq(grammar.as_raw(), ptr).then_some(grammar)
    }
}

/// C entry point. Never returns null.
#[no_mangle]
pub extern "C" fn tree_sitter_bst() -> *const BstGrammar {
    language().as_raw()
}

/// Alias of [`tree_sitter_bst`] returning the same pointer.
#[no_mangle]
pub extern "C" fn get_bst_grammar() -> *const BstGrammar {
    tree_sitter_bst()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[cfg(feature = "header-check")]
    extern "C" {
        fn bst_header_check_c() -> *const BstGrammar;
        fn bst_header_check_c_alias() -> *const BstGrammar;
    }

    #[cfg(feature = "cxx-header-check")]
    extern "C" {
        fn bst_header_check_cxx() -> *const BstGrammar;
    }

    /// Test that repeated calls return the same descriptor.
    #[test]
    fn test_language_is_pointer_identical() {
        let first = language();
        for _ in 0..100 {
            assert!(std::ptr::eq(first, language()));
        }
        assert_eq!(first.name(), "bst");
    }

    /// Test that the exported symbols agree with the Rust accessor.
    #[test]
    fn test_c_entry_points_return_singleton() {
        let raw = tree_sitter_bst();
        assert!(!raw.is_null());
        assert_eq!(raw, get_bst_grammar());
        assert_eq!(raw, language().as_raw());
    }

    /// Test that scoped threads racing on first use observe one instance.
    #[test]
    fn test_concurrent_first_calls_share_identity() {
        let addrs: Vec<usize> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| tree_sitter_bst() as usize))
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().expect("thread panicked"))
                .collect()
        });
        assert!(addrs.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(addrs[0], language().as_raw() as usize);
    }

    /// Test identity across a rayon pool.
    #[test]
    fn test_parallel_calls_share_identity() {
        let expected = language() as *const Grammar as usize;
        let all_same = (0..1024)
            .into_par_iter()
            .map(|_| language() as *const Grammar as usize)
            .all(|addr| addr == expected);
        assert!(all_same);
    }

    #[test]
    fn test_from_raw_accepts_only_singleton() {
        let raw = get_bst_grammar();
        let grammar = Grammar::from_raw(raw).expect("singleton pointer");
        assert!(std::ptr::eq(grammar, language()));

        assert!(Grammar::from_raw(std::ptr::null()).is_none());
        let other = 0u64;
        assert!(Grammar::from_raw((&other as *const u64).cast()).is_none());
    }

    /// Test the C translation unit that includes the header twice.
    #[cfg(feature = "header-check")]
    #[test]
    fn test_c_header_links_to_accessor() {
        let (from_c, from_alias) = unsafe { (bst_header_check_c(), bst_header_check_c_alias()) };
        assert_eq!(from_c, tree_sitter_bst());
        assert_eq!(from_alias, tree_sitter_bst());
    }

    #[cfg(feature = "cxx-header-check")]
    #[test]
    fn test_cxx_header_links_to_accessor() {
        let from_cxx = unsafe { bst_header_check_cxx() };
        assert_eq!(from_cxx, tree_sitter_bst());
    }

    #[test]
    fn test_header_declares_guard_and_linkage() {
        assert!(HEADER.contains("#ifndef TREE_SITTER_BST_H_"));
        assert!(HEADER.contains("#define TREE_SITTER_BST_H_"));
        assert!(HEADER.contains("extern \"C\" {"));
        assert!(HEADER.contains("const BstGrammar *tree_sitter_bst(void);"));
        assert!(HEADER.contains("const BstGrammar *get_bst_grammar(void);"));
    }
}
