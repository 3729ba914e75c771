use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::candidate::CandidateTree;
use super::parent_queue::ParentQueue;
use super::stats::PoolStats;
use crate::config::PoolConfig;
use crate::errors::{Result, TreePoolError};
use crate::score::Score;
use crate::topology::TopologyCanonicalizer;

/// Position of an entry in the ranking: score first, then insertion order.
///
/// Among equal scores the most recently inserted entry ranks highest, so it
/// is the first one met when walking from the best end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey {
    score: Score,
    seq: u64,
}

/// A bounded, score-ranked, topology-deduplicated pool of candidate trees.
///
/// The pool keeps at most `limit` trees, one per topology, and evicts the
/// worst-scoring tree to admit a better new topology once full. A tree
/// whose topology is already present only overwrites the stored variant
/// when it scores at least as well. Rank 0 is the best tree; the top
/// `max_candidates` ranks form the elite subset used by
/// [`get_rand_cand_tree`](Self::get_rand_cand_tree) and
/// [`get_next_cand_tree`](Self::get_next_cand_tree).
///
/// The pool is single-threaded; hosts evaluating trees in parallel must
/// serialize access to it.
#[derive(Clone, Debug)]
pub struct CandidatePool<C, R = SmallRng> {
    config: PoolConfig,
    canonicalizer: C,
    entries: BTreeMap<RankKey, CandidateTree>,
    /// topology key -> rank key of the single entry holding that topology
    topologies: BTreeMap<String, RankKey>,
    best_score: Score,
    next_seq: u64,
    parents: ParentQueue,
    stats: PoolStats,
    rng: R,
}

impl<C: TopologyCanonicalizer> CandidatePool<C, SmallRng> {
    /// Create a pool with a random seed.
    ///
    /// When the `std` feature is enabled, entropy is derived from the
    /// current system time. In `no_std` builds a fixed seed of `0` is used;
    /// prefer [`with_seed`](Self::with_seed) for reproducible runs.
    pub fn new(limit: usize, max_candidates: usize, canonicalizer: C) -> Result<Self> {
        Self::from_config(PoolConfig::new(limit, max_candidates), canonicalizer)
    }

    /// Create a pool with a deterministic seed for reproducibility.
    pub fn with_seed(
        limit: usize,
        max_candidates: usize,
        canonicalizer: C,
        seed: u64,
    ) -> Result<Self> {
        Self::with_rng(
            PoolConfig::new(limit, max_candidates),
            canonicalizer,
            SmallRng::seed_from_u64(seed),
        )
    }

    pub fn from_config(config: PoolConfig, canonicalizer: C) -> Result<Self> {
        Self::with_rng(config, canonicalizer, SmallRng::seed_from_u64(entropy_seed()))
    }
}

impl<C: TopologyCanonicalizer, R: Rng> CandidatePool<C, R> {
    /// Create a pool drawing its random choices from `rng`.
    pub fn with_rng(config: PoolConfig, canonicalizer: C, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            canonicalizer,
            entries: BTreeMap::new(),
            topologies: BTreeMap::new(),
            best_score: Score::NEG_INFINITY,
            next_seq: 0,
            parents: ParentQueue::Empty,
            stats: PoolStats::default(),
            rng,
        })
    }

    /// Offer a newly evaluated tree to the pool.
    ///
    /// Returns `true` only when a new topology was admitted. A tree whose
    /// topology is already present returns `false`, even when it replaces
    /// the stored variant. The best score seen is updated in every case.
    pub fn update(&mut self, tree_text: impl Into<String>, score: f64) -> Result<bool> {
        let tree_text = tree_text.into();
        let topology = self.canonicalizer.canonicalize(&tree_text)?;
        Ok(self.update_with_topology(tree_text, topology, score))
    }

    /// Offer several trees at once.
    ///
    /// All trees are canonicalized first (in parallel with the `rayon`
    /// feature), then applied in input order exactly as repeated
    /// [`update`](Self::update) calls would be. A canonicalization error
    /// aborts the batch before the pool is touched.
    pub fn update_batch<T>(&mut self, trees: &[(T, f64)]) -> Result<Vec<bool>>
    where
        T: AsRef<str> + Sync,
    {
        #[cfg(feature = "rayon")]
        let topologies: Vec<String> = trees
            .par_iter()
            .map(|(text, _)| self.canonicalizer.canonicalize(text.as_ref()))
            .collect::<Result<Vec<String>>>()?;

        #[cfg(not(feature = "rayon"))]
        let topologies: Vec<String> = trees
            .iter()
            .map(|(text, _)| self.canonicalizer.canonicalize(text.as_ref()))
            .collect::<Result<Vec<String>>>()?;

        Ok(trees
            .iter()
            .zip(topologies)
            .map(|((text, score), topology)| {
                self.update_with_topology(String::from(text.as_ref()), topology, *score)
            })
            .collect())
    }

    fn update_with_topology(&mut self, tree_text: String, topology: String, score: f64) -> bool {
        debug_assert!(!score.is_nan(), "candidate score must not be NaN");
        let score = Score::new(score);
        self.best_score = self.best_score.max(score);

        if let Some(&existing) = self.topologies.get(&topology) {
            if score.value() >= existing.score.value() {
                self.entries.remove(&existing);
                self.insert_entry(tree_text, score, topology);
                self.stats.refreshed += 1;
                debug!(
                    old_score = existing.score.value(),
                    new_score = score.value(),
                    "refreshed known topology"
                );
            } else {
                self.stats.duplicates_ignored += 1;
                trace!(score = score.value(), "ignored worse variant of known topology");
            }
            return false;
        }

        if self.entries.len() < self.config.limit {
            self.insert_entry(tree_text, score, topology);
            self.stats.inserted += 1;
            debug!(score = score.value(), size = self.entries.len(), "inserted candidate");
            return true;
        }

        let worst = match self.entries.first_key_value() {
            Some((key, _)) => *key,
            None => return false,
        };
        if score.value() > worst.score.value() {
            if let Some((_, evicted)) = self.entries.pop_first() {
                self.topologies.remove(evicted.topology());
            }
            self.insert_entry(tree_text, score, topology);
            self.stats.inserted += 1;
            self.stats.evicted += 1;
            debug!(
                score = score.value(),
                evicted_score = worst.score.value(),
                "evicted worst candidate"
            );
            return true;
        }

        self.stats.rejected += 1;
        trace!(
            score = score.value(),
            worst_score = worst.score.value(),
            "rejected candidate"
        );
        false
    }

    /// Overwrite the stored variant of a known topology, whatever its score.
    ///
    /// Returns `false` and leaves the pool untouched when the topology is
    /// not present. The best score seen is not updated.
    pub fn replace(&mut self, tree_text: impl Into<String>, score: f64) -> Result<bool> {
        let tree_text = tree_text.into();
        let topology = self.canonicalizer.canonicalize(&tree_text)?;
        debug_assert!(!score.is_nan(), "candidate score must not be NaN");

        let Some(existing) = self.topologies.get(&topology).copied() else {
            return Ok(false);
        };
        self.entries.remove(&existing);
        self.insert_entry(tree_text, Score::new(score), topology);
        self.stats.replaced += 1;
        debug!(
            old_score = existing.score.value(),
            new_score = score,
            "replaced topology variant"
        );
        Ok(true)
    }

    /// Insert an entry and point its topology at it.
    fn insert_entry(&mut self, tree_text: String, score: Score, topology: String) {
        let key = RankKey {
            score,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.topologies.insert(topology.clone(), key);
        self.entries
            .insert(key, CandidateTree::new(tree_text, score, topology));
    }

    /// Iterate over all candidates from rank 0 (best) downwards.
    pub fn iter_ranked(&self) -> impl Iterator<Item = &CandidateTree> + '_ {
        self.entries.values().rev()
    }

    /// The candidate at `rank`, counted from the best (rank 0).
    pub fn candidate_at_rank(&self, rank: usize) -> Option<&CandidateTree> {
        self.entries.values().nth_back(rank)
    }

    /// All tree texts sharing the highest score currently in the pool.
    pub fn get_best_tree(&self) -> Vec<&str> {
        let Some(best) = self.entries.last_key_value().map(|(key, _)| key.score.value()) else {
            return Vec::new();
        };
        self.iter_ranked()
            .take_while(|c| c.score() == best)
            .map(CandidateTree::tree_text)
            .collect()
    }

    /// Up to `num_trees` tree texts, best first; `0` means `max_candidates`.
    ///
    /// Fails if `num_trees` exceeds the pool limit.
    pub fn get_best_trees(&self, num_trees: usize) -> Result<Vec<&str>> {
        if num_trees > self.config.limit {
            return Err(TreePoolError::RequestExceedsLimit {
                requested: num_trees,
                limit: self.config.limit,
            });
        }
        let count = if num_trees == 0 {
            self.config.max_candidates
        } else {
            num_trees
        };
        Ok(self
            .iter_ranked()
            .take(count)
            .map(CandidateTree::tree_text)
            .collect())
    }

    /// Up to `num_best` scores, best first.
    pub fn get_best_scores(&self, num_best: usize) -> Vec<f64> {
        self.iter_ranked().take(num_best).map(CandidateTree::score).collect()
    }

    /// A tree drawn uniformly from the elite subset, or `None` if empty.
    pub fn get_rand_cand_tree(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let elite = self.elite_size();
        let rank = self.rng.gen_range(0..elite);
        self.candidate_at_rank(rank).map(CandidateTree::tree_text)
    }

    /// Next parent tree for the search loop.
    ///
    /// Serves a snapshot of the elite subset, taken best to worst and
    /// popped last-in-first-out, so the worst snapshot entry comes first
    /// and the best last. A new snapshot is taken only once the previous
    /// one is exhausted; until then trees are served even if they have
    /// since left the pool.
    pub fn get_next_cand_tree(&mut self) -> Result<String> {
        if self.entries.is_empty() {
            return Err(TreePoolError::EmptyPool);
        }
        if self.parents.is_empty() {
            let snapshot: Vec<String> = self
                .entries
                .values()
                .rev()
                .take(self.config.max_candidates)
                .map(|c| String::from(c.tree_text()))
                .collect();
            trace!(count = snapshot.len(), "refilled parent queue");
            self.parents.refill(snapshot);
        }
        self.parents.pop().ok_or(TreePoolError::EmptyPool)
    }

    /// Whether a tree with this topology key is in the pool.
    pub fn tree_topology_exists(&self, topology: &str) -> bool {
        self.topologies.contains_key(topology)
    }

    /// Whether a tree with the same topology as `tree_text` is in the pool.
    pub fn tree_exists(&self, tree_text: &str) -> Result<bool> {
        let topology = self.canonicalizer.canonicalize(tree_text)?;
        Ok(self.tree_topology_exists(&topology))
    }

    /// Score stored for a topology key.
    pub fn topology_score(&self, topology: &str) -> Option<f64> {
        self.topologies.get(topology).map(|key| key.score.value())
    }

    /// Highest score ever passed to [`update`](Self::update), including
    /// rejected trees; negative infinity before the first update.
    pub fn get_best_score(&self) -> f64 {
        self.best_score.value()
    }

    /// Lowest score currently in the pool.
    pub fn worst_score(&self) -> Option<f64> {
        self.entries.first_key_value().map(|(key, _)| key.score.value())
    }

    /// Number of candidates in the pool.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.config.limit
    }

    pub fn max_candidates(&self) -> usize {
        self.config.max_candidates
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    pub fn canonicalizer(&self) -> &C {
        &self.canonicalizer
    }

    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    /// Number of trees left in the current parent snapshot.
    pub fn pending_parents(&self) -> usize {
        self.parents.len()
    }

    /// Drop every candidate and the parent snapshot. The best score seen
    /// and the statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.topologies.clear();
        self.parents.clear();
    }

    /// Size of the elite subset right now.
    fn elite_size(&self) -> usize {
        self.config.max_candidates.min(self.entries.len())
    }
}

fn entropy_seed() -> u64 {
    #[cfg(feature = "std")]
    {
        use std::time::SystemTime;
        let dur = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        dur.as_nanos() as u64
    }

    #[cfg(not(feature = "std"))]
    {
        0
    }
}
