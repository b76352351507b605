use std::sync::Arc;
use std::time::Duration;

use jobdedup_core::{ConsolidationPlan, ConsolidationReport, DuplicateHash};
use jobdedup_storage::{ConsolidationStore, DuplicateStore};

use crate::ServiceError;

/// Operations on individual duplicate groups.
pub struct GroupService<S> {
    store: Arc<S>,
    group_timeout: Duration,
}

impl<S> Clone for GroupService<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), group_timeout: self.group_timeout }
    }
}

impl<S> GroupService<S>
where
    S: DuplicateStore + ConsolidationStore,
{
    #[must_use]
    pub fn new(store: Arc<S>, group_timeout: Duration) -> Self {
        Self { store, group_timeout }
    }

    /// Duplicate groups, most duplicated first, optionally cut to the first `limit`.
    pub async fn find_groups(
        &self,
        limit: Option<usize>,
    ) -> Result<Vec<DuplicateHash>, ServiceError> {
        let mut groups = self.store.find_duplicate_hashes().await?;
        if let Some(limit) = limit {
            groups.truncate(limit);
        }
        tracing::debug!(groups = groups.len(), "Duplicate groups fetched");
        Ok(groups)
    }

    /// Dry run: what consolidating `hash` would do, computed from an unlocked read.
    pub async fn plan(&self, hash: &str) -> Result<ConsolidationPlan, ServiceError> {
        let members = self.store.load_group(hash).await?;
        Ok(ConsolidationPlan::build(hash, &members)?)
    }

    /// Consolidate one group, failing it if the transaction outlives the group timeout.
    ///
    /// On timeout the in-flight transaction is dropped, which rolls it back.
    pub async fn consolidate(&self, hash: &str) -> Result<ConsolidationReport, ServiceError> {
        match tokio::time::timeout(self.group_timeout, self.store.consolidate_hash(hash)).await {
            Ok(result) => Ok(result?),
            Err(_elapsed) => {
                Err(ServiceError::Timeout { hash: hash.to_owned(), after: self.group_timeout })
            },
        }
    }
}
