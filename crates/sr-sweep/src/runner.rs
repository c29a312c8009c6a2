//! Sweep dispatch.
//!
//! [`SweepRunner`] drives enumeration and hands every passing configuration
//! to a caller-supplied function, either sequentially in enumeration order
//! or across a fixed-size worker pool. Return values are ignored; whatever
//! a run produces (result files, log rows) is the function's own side
//! effect.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rayon::prelude::*;
use tracing::{debug, info};

use sr_types::{ConcreteConfig, SweepError, SweepResult, SweepSpace};

use crate::seeding;
use crate::shard::ShardFilter;
use crate::sweep::Sweeper;

type FilterFn = Arc<dyn Fn(&ConcreteConfig) -> bool + Send + Sync>;

/// Counts from a completed (or attempted) sweep run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    /// Configurations handed to the run function.
    pub dispatched: usize,
    /// Configurations rejected by the filter.
    pub skipped: usize,
    /// Pool size used (1 for serial runs).
    pub workers: usize,
}

/// Drives a sweep over one space.
#[derive(Clone)]
pub struct SweepRunner {
    space: SweepSpace,
    repeat: usize,
    workers: Option<usize>,
    filter: Option<FilterFn>,
}

impl SweepRunner {
    pub fn new(space: SweepSpace) -> Self {
        Self {
            space,
            repeat: 1,
            workers: None,
            filter: None,
        }
    }

    /// Number of independent enumeration rounds (default 1).
    pub fn with_repeat(mut self, repeat: usize) -> Self {
        self.repeat = repeat;
        self
    }

    /// Pool size for [`run_parallel`](Self::run_parallel); defaults to
    /// available parallelism.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Install a predicate applied to every configuration before dispatch.
    pub fn with_filter(
        mut self,
        filter: impl Fn(&ConcreteConfig) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Shorthand for installing a [`ShardFilter`] as the predicate.
    pub fn with_shard(self, shard: ShardFilter) -> Self {
        self.with_filter(move |config| shard.accepts(config))
    }

    fn passes(&self, config: &ConcreteConfig) -> bool {
        self.filter.as_ref().map_or(true, |f| f(config))
    }

    /// Run the sweep one configuration at a time, in enumeration order.
    ///
    /// The first error from `run_fn` propagates immediately; remaining
    /// configurations are never attempted.
    pub fn run_serial<F>(&self, mut run_fn: F) -> SweepResult<SweepReport>
    where
        F: FnMut(&ConcreteConfig) -> SweepResult<()>,
    {
        let sweeper = Sweeper::new(&self.space, self.repeat);
        let mut dispatched = 0usize;
        let mut skipped = 0usize;

        for config in sweeper.iter() {
            if !self.passes(&config) {
                skipped += 1;
                continue;
            }
            debug!(index = dispatched, "dispatching configuration");
            run_fn(&config)?;
            dispatched += 1;
        }

        info!(dispatched, skipped, "sweep complete");
        Ok(SweepReport {
            dispatched,
            skipped,
            workers: 1,
        })
    }

    /// Run the sweep on a fixed-size worker pool.
    ///
    /// The filtered work list is materialized up front, shuffled once to
    /// balance heterogeneous job durations, and dispatched across the
    /// pool. Before each invocation the worker seeds its process RNG with
    /// the job's pre-shuffle enumeration index, so the seed-to-
    /// configuration mapping is reproducible regardless of the shuffle.
    ///
    /// Every dispatched job runs to completion; the first observed failure
    /// is returned once the pool drains.
    pub fn run_parallel<F>(&self, run_fn: F) -> SweepResult<SweepReport>
    where
        F: Fn(&ConcreteConfig) -> SweepResult<()> + Send + Sync,
    {
        let sweeper = Sweeper::new(&self.space, self.repeat);
        let mut skipped = 0usize;
        let mut jobs: Vec<(usize, ConcreteConfig)> = Vec::new();
        for config in sweeper.iter() {
            if self.passes(&config) {
                jobs.push((jobs.len(), config));
            } else {
                skipped += 1;
            }
        }

        let workers = self
            .workers
            .unwrap_or_else(default_worker_count)
            .max(1);
        info!(
            experiments = jobs.len(),
            workers, "launching sweep on worker pool"
        );

        seeding::with_rng(|rng| jobs.shuffle(rng));

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| SweepError::Pool(e.to_string()))?;

        let dispatched = jobs.len();
        let failures: Vec<SweepError> = pool.install(|| {
            jobs.par_iter()
                .filter_map(|(index, config)| {
                    seeding::set_seed(*index as u64);
                    run_fn(config).err()
                })
                .collect()
        });

        if let Some(first) = failures.into_iter().next() {
            return Err(first);
        }

        Ok(SweepReport {
            dispatched,
            skipped,
            workers,
        })
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
