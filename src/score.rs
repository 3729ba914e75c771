use core::cmp::Ordering;

/// A tree score (typically a log-likelihood); higher is better.
///
/// Wraps an `f64` with a total order (`f64::total_cmp`) so scores can key
/// ordered collections. Equality follows the same total order, so `-0.0`
/// and `0.0` are distinct keys. NaN is never a meaningful score; the pool
/// rejects it in debug builds.
#[derive(Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Score(f64);

impl Score {
    /// The score below every finite score; the initial best score of a pool.
    pub const NEG_INFINITY: Self = Self(f64::NEG_INFINITY);

    #[inline]
    pub fn new(value: f64) -> Self {
        Self(value)
    }

    /// Raw `f64` value.
    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Score {
    #[inline]
    fn from(value: f64) -> Self {
        Self(value)
    }
}

impl PartialEq for Score {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_like_f64_for_finite_values() {
        assert!(Score::new(-10.5) < Score::new(-3.25));
        assert!(Score::new(1.0) > Score::new(0.5));
        assert_eq!(Score::new(2.0), Score::from(2.0));
        assert_eq!(Score::new(-7.0).max(Score::new(-8.0)).value(), -7.0);
    }

    #[test]
    fn neg_infinity_is_minimal() {
        assert!(Score::NEG_INFINITY < Score::new(f64::MIN));
        assert!(Score::NEG_INFINITY < Score::new(-1e300));
    }
}
