//! # atrium-pool
//!
//! Reusable panel instances grouped by type tag. An instance is either
//! available (waiting for reuse) or in use (handed out by `acquire`), never
//! both. Per-type and global caps bound how many instances are tracked;
//! when a cap is hit `acquire` still succeeds but the instance is untracked.

pub mod entry;
pub mod pool;

pub use entry::{Lease, PoolEntry};
pub use pool::ObjectPool;
