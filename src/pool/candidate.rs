use alloc::string::String;

use crate::score::Score;

/// One retained solution: the tree text as submitted, its score, and the
/// topology key the canonicalizer assigned to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidateTree {
    tree_text: String,
    score: Score,
    topology: String,
}

impl CandidateTree {
    pub fn new(tree_text: String, score: Score, topology: String) -> Self {
        Self {
            tree_text,
            score,
            topology,
        }
    }

    /// The serialized tree, exactly as passed to the pool.
    #[inline]
    pub fn tree_text(&self) -> &str {
        &self.tree_text
    }

    #[inline]
    pub fn score(&self) -> f64 {
        self.score.value()
    }

    /// Canonical topology key of the tree.
    #[inline]
    pub fn topology(&self) -> &str {
        &self.topology
    }
}
