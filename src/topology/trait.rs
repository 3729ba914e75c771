use alloc::string::String;

use crate::errors::Result;

/// Maps tree text to a canonical topology key.
///
/// Two tree texts with the same unrooted topology over the same taxa must
/// map to the same key regardless of rooting, child order, or branch
/// lengths; any other difference must produce a different key. The pool
/// treats the key as opaque and never parses tree text itself.
///
/// Implementations are pure: the same input always yields the same key.
pub trait TopologyCanonicalizer: Send + Sync {
    /// Canonical topology key for `tree_text`.
    fn canonicalize(&self, tree_text: &str) -> Result<String>;
}

impl<C: TopologyCanonicalizer + ?Sized> TopologyCanonicalizer for &C {
    #[inline]
    fn canonicalize(&self, tree_text: &str) -> Result<String> {
        (**self).canonicalize(tree_text)
    }
}
