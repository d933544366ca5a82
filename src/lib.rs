//! Parallel branch-and-bound search for maximum-sum disjoint-closure
//! multiset pairs.
//!
//! The hard part is the scheduling and memory-reclamation fabric that
//! turns a textbook recursive search into a cooperating worker pool:
//! see [`deque`] for the shared work queue and its termination oracle,
//! [`node`] and [`reclaim`] for the pooled, reference-counted node
//! forest, and [`worker`] for the adaptive split/recurse policy.

pub mod cli;
pub mod deque;
pub mod error;
pub mod io;
pub mod node;
pub mod reclaim;
pub mod solution;
pub mod solver;
pub mod sumset;
pub mod worker;

pub use deque::BranchDeque;
pub use error::EngineError;
pub use node::{NodeHandle, NodePool};
pub use solution::Solution;
pub use solver::Orchestrator;
pub use sumset::Sumset;
pub use worker::{Classification, Worker};

#[cfg(feature = "instrument")]
pub mod instrument {
    //! Optional, compiled-out-by-default peak-allocation accounting.
    //!
    //! Grounded on the teacher's `xputils::PEAK_ALLOC` global allocator
    //! instrumentation; kept behind the `instrument` feature per
    //! spec.md's design note that diagnostic accounting "must not appear
    //! in the production core" unless routed through an observer that
    //! can be compiled out entirely.
    use peak_alloc::PeakAlloc;

    #[global_allocator]
    pub static PEAK_ALLOC: PeakAlloc = PeakAlloc;

    /// Peak resident bytes observed since process start, in megabytes.
    pub fn peak_usage_mb() -> f32 {
        PEAK_ALLOC.peak_usage_as_mb()
    }
}
