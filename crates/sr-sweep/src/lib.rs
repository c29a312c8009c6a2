//! # sr-sweep
//!
//! Sweep enumeration and dispatch for Sweeprig.
//!
//! Provides the lazy Cartesian-product enumerator ([`Sweeper`]), a
//! deterministic content-hash shard filter ([`ShardFilter`]) for
//! communication-free partitioning across launches, serial and
//! worker-pool dispatch ([`SweepRunner`]), and the process-wide seeding
//! registry ([`seeding`]).

pub mod seeding;

mod runner;
mod shard;
mod sweep;

pub use runner::{SweepReport, SweepRunner};
pub use shard::ShardFilter;
pub use sweep::{SweepIter, Sweeper};
