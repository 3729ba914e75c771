use alloc::string::String;
use core::fmt;

/// Error types for the treepool crate.
#[derive(Debug, Clone, PartialEq)]
pub enum TreePoolError {
    /// A pool configuration parameter is invalid.
    InvalidConfig { param: &'static str, value: usize },
    /// The parent queue was pulled from while the pool holds no candidates.
    EmptyPool,
    /// More best trees were requested than the pool can ever hold.
    RequestExceedsLimit { requested: usize, limit: usize },
    /// Tree text is not well-formed Newick.
    NewickSyntax { position: usize, message: &'static str },
    /// A leaf label does not name any taxon known to the canonicalizer.
    UnknownTaxon(String),
    /// A taxon label occurs more than once (in a tree or in a taxon list).
    DuplicateTaxon(String),
    /// The reference leaf used for rerooting is absent from the tree.
    MissingReferenceLeaf(String),
    /// The canonicalizer was constructed without any taxa.
    NoTaxa,
}

impl fmt::Display for TreePoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { param, value } => {
                write!(f, "invalid pool parameter '{}': {}", param, value)
            }
            Self::EmptyPool => {
                write!(f, "candidate pool is empty")
            }
            Self::RequestExceedsLimit { requested, limit } => {
                write!(
                    f,
                    "requested {} trees but the pool limit is {}",
                    requested, limit
                )
            }
            Self::NewickSyntax { position, message } => {
                write!(f, "newick syntax error at byte {}: {}", position, message)
            }
            Self::UnknownTaxon(label) => {
                write!(f, "unknown taxon '{}'", label)
            }
            Self::DuplicateTaxon(label) => {
                write!(f, "duplicate taxon '{}'", label)
            }
            Self::MissingReferenceLeaf(label) => {
                write!(f, "reference leaf '{}' not found in tree", label)
            }
            Self::NoTaxa => {
                write!(f, "taxon list is empty")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for TreePoolError {}

pub type Result<T> = core::result::Result<T, TreePoolError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn display_messages() {
        let err = TreePoolError::InvalidConfig {
            param: "max_candidates",
            value: 9,
        };
        assert_eq!(err.to_string(), "invalid pool parameter 'max_candidates': 9");

        let err = TreePoolError::RequestExceedsLimit {
            requested: 12,
            limit: 10,
        };
        assert_eq!(err.to_string(), "requested 12 trees but the pool limit is 10");

        let err = TreePoolError::MissingReferenceLeaf("human".into());
        assert_eq!(err.to_string(), "reference leaf 'human' not found in tree");
    }
}
