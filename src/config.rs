use crate::errors::{Result, TreePoolError};

/// Sizing of a candidate pool, fixed for the lifetime of a search run.
///
/// `limit` bounds how many distinct topologies the pool retains.
/// `max_candidates` is the size of the elite subset that parent selection
/// and random draws operate on; it never exceeds `limit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PoolConfig {
    pub limit: usize,
    pub max_candidates: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            limit: 5,
            max_candidates: 5,
        }
    }
}

impl PoolConfig {
    pub fn new(limit: usize, max_candidates: usize) -> Self {
        Self {
            limit,
            max_candidates,
        }
    }

    /// Check the sizing contract: `1 <= max_candidates <= limit`.
    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(TreePoolError::InvalidConfig {
                param: "limit",
                value: self.limit,
            });
        }
        if self.max_candidates == 0 || self.max_candidates > self.limit {
            return Err(TreePoolError::InvalidConfig {
                param: "max_candidates",
                value: self.max_candidates,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(PoolConfig::default().validate().is_ok());
    }

    #[test]
    fn elite_larger_than_limit_is_rejected() {
        let err = PoolConfig::new(3, 4).validate().unwrap_err();
        assert_eq!(
            err,
            TreePoolError::InvalidConfig {
                param: "max_candidates",
                value: 4
            }
        );
    }

    #[test]
    fn zero_sizes_are_rejected() {
        assert!(PoolConfig::new(0, 0).validate().is_err());
        assert!(PoolConfig::new(4, 0).validate().is_err());
        assert!(PoolConfig::new(1, 1).validate().is_ok());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn loads_from_json() {
        let config: PoolConfig =
            serde_json::from_str(r#"{"limit": 100, "max_candidates": 20}"#).unwrap();
        assert_eq!(config, PoolConfig::new(100, 20));
        assert!(config.validate().is_ok());
    }
}
