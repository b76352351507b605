//! Typed error enum for the service layer.

use std::time::Duration;

use jobdedup_core::{ConfigError, IllegalTransition, PlanError};
use jobdedup_storage::StorageError;
use thiserror::Error;

/// Service-layer error unifying storage, planning and run-lifecycle failures.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage operation failed (connectivity, constraint, missing group, ...).
    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    /// A loaded group could not be planned.
    #[error("plan: {0}")]
    Plan(#[from] PlanError),

    /// The group did not finish within the per-group ceiling.
    #[error("timed out after {}s consolidating hash {hash}", after.as_secs())]
    Timeout { hash: String, after: Duration },

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    /// The driver tried to move the run somewhere its lifecycle forbids.
    #[error("run lifecycle: {0}")]
    InvalidState(#[from] IllegalTransition),
}

impl ServiceError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Storage(e) => e.is_transient(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Whether this error represents a not-found condition.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Storage(StorageError::NotFound { .. }) | Self::Plan(PlanError::EmptyGroup(_))
        )
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_connectivity())
    }
}
