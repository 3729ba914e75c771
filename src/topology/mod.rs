pub mod canonical;
pub mod newick;
mod r#trait;

pub use canonical::NewickCanonicalizer;
pub use newick::NewickTree;
pub use r#trait::TopologyCanonicalizer;
