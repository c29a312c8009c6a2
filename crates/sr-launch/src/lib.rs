//! # sr-launch
//!
//! Delegated execution for Sweeprig sweeps.
//!
//! Packages each configuration as a serializable [`DeferredCall`] with a
//! declared set of filesystem [`Mount`]s and submits it to a
//! [`LaunchBackend`]. Concrete backends live outside this workspace; the
//! contract here is one submission per configuration, in enumeration
//! order.

mod backend;
mod mount;

pub use backend::{run_sweep_launch, DeferredCall, LaunchBackend, LaunchOptions, LaunchReport};
pub use mount::Mount;
