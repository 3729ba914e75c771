use alloc::string::String;
use alloc::vec::Vec;

/// Stack of parent trees handed out to the search loop.
///
/// The queue is either `Empty` or `Loaded` with a non-empty snapshot. It is
/// refilled only from `Empty`: a partially drained snapshot keeps being
/// served even if the pool has changed since it was taken, so a search
/// explores a fixed elite set before looking at the pool again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ParentQueue {
    #[default]
    Empty,
    /// Tree texts in push order; the last element is served next.
    Loaded(Vec<String>),
}

impl ParentQueue {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Number of tree texts still pending.
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Loaded(pending) => pending.len(),
        }
    }

    /// Push `trees` in the given order. Has no effect unless the queue is
    /// empty, or when `trees` yields nothing.
    pub fn refill<I>(&mut self, trees: I)
    where
        I: IntoIterator<Item = String>,
    {
        if !self.is_empty() {
            return;
        }
        let pending: Vec<String> = trees.into_iter().collect();
        if !pending.is_empty() {
            *self = Self::Loaded(pending);
        }
    }

    /// Pop the most recently pushed tree text.
    pub fn pop(&mut self) -> Option<String> {
        let Self::Loaded(pending) = self else {
            return None;
        };
        let tree = pending.pop();
        if pending.is_empty() {
            *self = Self::Empty;
        }
        tree
    }

    /// Drop everything still pending.
    pub fn clear(&mut self) {
        *self = Self::Empty;
    }
}
