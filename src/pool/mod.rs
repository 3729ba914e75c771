pub mod candidate;
pub mod candidate_pool;
pub mod parent_queue;
pub mod stats;

pub use candidate::CandidateTree;
pub use candidate_pool::CandidatePool;
pub use parent_queue::ParentQueue;
pub use stats::PoolStats;
