//! Filesystem mount declarations.
//!
//! A [`Mount`] names a local directory a launch backend should make
//! visible to the launched process. The core never interprets mount
//! contents; the triples pass through to the backend opaquely.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One (local dir, remote mount point, output flag) declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mount {
    /// Directory on the submitting machine.
    pub local_dir: PathBuf,

    /// Where the directory appears to the launched process. `None` lets
    /// the backend choose (typical for code mounts).
    pub mount_point: Option<String>,

    /// Whether the launched process writes results here; read-only
    /// otherwise.
    pub output: bool,
}

impl Mount {
    /// A read-only code mount; the backend picks the mount point.
    pub fn code(local_dir: impl Into<PathBuf>) -> Self {
        Self {
            local_dir: local_dir.into(),
            mount_point: None,
            output: false,
        }
    }

    /// A read-only data mount at a fixed remote location.
    pub fn data(local_dir: impl Into<PathBuf>, mount_point: impl Into<String>) -> Self {
        Self {
            local_dir: local_dir.into(),
            mount_point: Some(mount_point.into()),
            output: false,
        }
    }

    /// A writable output mount at a fixed remote location.
    pub fn output(local_dir: impl Into<PathBuf>, mount_point: impl Into<String>) -> Self {
        Self {
            local_dir: local_dir.into(),
            mount_point: Some(mount_point.into()),
            output: true,
        }
    }
}
