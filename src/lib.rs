#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod errors;
pub mod pool;
pub mod score;
pub mod topology;

#[cfg(feature = "pyo3")]
pub mod pyo3_bindings;

pub use config::PoolConfig;
pub use errors::TreePoolError;
pub use pool::{CandidatePool, CandidateTree, ParentQueue, PoolStats};
pub use score::Score;
pub use topology::{NewickCanonicalizer, TopologyCanonicalizer};
