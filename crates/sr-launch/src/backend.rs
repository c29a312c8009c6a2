//! Deferred-call packaging and submission.
//!
//! Instead of invoking the run function in-process, delegated mode wraps
//! each configuration in a serializable [`DeferredCall`] and hands it to a
//! [`LaunchBackend`]. The backend (a container launcher, a cluster
//! scheduler) is an external collaborator; the core only guarantees one
//! submission per configuration, in enumeration order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use sr_sweep::Sweeper;
use sr_types::{ConcreteConfig, SweepResult, SweepSpace};

use crate::mount::Mount;

/// One bound configuration packaged for delegated execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeferredCall {
    /// Unique id for this submission.
    pub call_id: Uuid,

    /// Human-readable sweep name, for log and output directories.
    pub sweep_name: String,

    /// Position in enumeration order (0-indexed, counts repeats).
    pub call_number: usize,

    /// The fully resolved configuration to run.
    pub config: ConcreteConfig,

    /// Filesystem mounts the backend should provide.
    pub mounts: Vec<Mount>,

    pub created_at: DateTime<Utc>,
}

/// Destination for deferred calls.
pub trait LaunchBackend {
    /// Human-readable backend name.
    fn name(&self) -> &str;

    /// Submit one deferred call. An error aborts the remaining sweep.
    fn submit(&self, call: DeferredCall) -> SweepResult<()>;
}

/// Options for [`run_sweep_launch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchOptions {
    /// Number of independent enumeration rounds.
    pub repeat: usize,

    /// Submit only the first call and stop, as a smoke test.
    pub test_one: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            repeat: 1,
            test_one: false,
        }
    }
}

/// Counts from a completed submission pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchReport {
    pub submitted: usize,
}

/// Package every configuration of `space` as a deferred call and submit
/// it, in the same enumeration order as serial dispatch.
pub fn run_sweep_launch<B>(
    backend: &B,
    sweep_name: &str,
    space: &SweepSpace,
    mounts: &[Mount],
    options: LaunchOptions,
) -> SweepResult<LaunchReport>
where
    B: LaunchBackend + ?Sized,
{
    let sweeper = Sweeper::new(space, options.repeat);
    let mut submitted = 0usize;

    for config in sweeper.iter() {
        let call = DeferredCall {
            call_id: Uuid::new_v4(),
            sweep_name: sweep_name.to_string(),
            call_number: submitted,
            config,
            mounts: mounts.to_vec(),
            created_at: Utc::now(),
        };
        debug!(
            call_number = call.call_number,
            backend = backend.name(),
            "submitting deferred call"
        );
        backend.submit(call)?;
        submitted += 1;

        if options.test_one {
            break;
        }
    }

    info!(submitted, backend = backend.name(), "sweep submitted");
    Ok(LaunchReport { submitted })
}
