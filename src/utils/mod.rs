//! Shared helpers.

pub mod parallel;

pub use parallel::{map_indexed, parallelism_enabled, set_parallelism, ParallelismGuard};
