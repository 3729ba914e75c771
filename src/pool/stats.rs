/// Outcome counters for a candidate pool.
///
/// Every `update` call lands in exactly one of `inserted`, `refreshed`,
/// `duplicates_ignored` or `rejected`. `evicted` counts the insertions that
/// displaced the worst candidate, and `replaced` counts successful
/// `replace` calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolStats {
    /// New topologies admitted.
    pub inserted: u64,
    pub evicted: u64,
    /// Known topologies whose stored variant was overwritten by a
    /// better- or equal-scored one.
    pub refreshed: u64,
    /// Known topologies submitted with a worse score.
    pub duplicates_ignored: u64,
    /// New topologies turned away by a full pool.
    pub rejected: u64,
    pub replaced: u64,
}

impl PoolStats {
    /// Total number of `update` calls recorded.
    pub fn updates(&self) -> u64 {
        self.inserted + self.refreshed + self.duplicates_ignored + self.rejected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updates_excludes_evictions_and_replacements() {
        let stats = PoolStats {
            inserted: 4,
            evicted: 2,
            refreshed: 1,
            duplicates_ignored: 3,
            rejected: 5,
            replaced: 7,
        };
        assert_eq!(stats.updates(), 13);
    }
}
