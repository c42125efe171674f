//! Concurrent traversal and matching.
//!
//! The engine parallelizes breadth at the top of the tree only: the
//! immediate subdirectories of the root are partitioned into fixed-size
//! batches, and each batch is one task on a bounded worker pool. Within a
//! task the assigned subtrees are walked depth-first on that worker's
//! thread; discovered subdirectories are never resubmitted to the pool.
//! Deep, skewed subtrees therefore scan single-threaded, which trades
//! load balance for zero scheduling overhead below the first level.
//!
//! Traversal is best-effort: a directory that cannot be read is treated
//! as empty and counted in the scan statistics, never surfaced as an
//! error. The only fatal failures are configuration problems detected
//! before the walk starts and worker-pool construction faults.

pub mod engine;
pub mod matcher;
pub mod walker;

pub use engine::{search, search_with_cancel, CancelToken};
pub use matcher::EntryMatcher;
pub use walker::BatchWalker;
