//! Storage trait abstraction
//!
//! The batch driver only depends on these seams, so it can run against PostgreSQL in
//! production and against in-memory fakes in tests.

use async_trait::async_trait;
use jobdedup_core::{ConsolidationReport, DuplicateHash, JobRecord};

use crate::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;

/// Read-only discovery of duplicate groups.
#[async_trait]
pub trait DuplicateStore: Send + Sync {
    /// Every non-null hash shared by more than one job, most duplicated first.
    async fn find_duplicate_hashes(&self) -> Result<Vec<DuplicateHash>>;

    /// Load a group's members without locking them.
    async fn load_group(&self, hash: &str) -> Result<Vec<JobRecord>>;
}

/// Atomic consolidation of one duplicate group.
#[async_trait]
pub trait ConsolidationStore: Send + Sync {
    /// Keep the oldest job for `hash`, move every distinct location and URL onto it and
    /// delete the other members, all in one transaction.
    async fn consolidate_hash(&self, hash: &str) -> Result<ConsolidationReport>;
}
