//! In-memory store for driving the service layer in tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jobdedup_core::{
    ConsolidationPlan, ConsolidationReport, DuplicateHash, JobRecord, LocationTuple,
};
use jobdedup_storage::traits::Result;
use jobdedup_storage::{ConsolidationStore, DuplicateStore, StorageError};
use uuid::Uuid;

#[derive(Default)]
pub(crate) struct FakeStore {
    groups: Vec<DuplicateHash>,
    members: HashMap<String, Vec<JobRecord>>,
    failing: Option<String>,
    stalling: Option<String>,
    broken_finder: bool,
    attempted: Mutex<Vec<String>>,
}

impl FakeStore {
    pub(crate) fn with_groups(groups: &[(&str, u64)]) -> Self {
        Self {
            groups: groups.iter().map(|(hash, count)| DuplicateHash::new(*hash, *count)).collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_members(mut self, hash: &str, members: Vec<JobRecord>) -> Self {
        self.members.insert(hash.to_owned(), members);
        self
    }

    /// Consolidating `hash` fails with a constraint violation.
    pub(crate) fn failing_on(mut self, hash: &str) -> Self {
        self.failing = Some(hash.to_owned());
        self
    }

    /// Consolidating `hash` never finishes.
    pub(crate) fn stalling_on(mut self, hash: &str) -> Self {
        self.stalling = Some(hash.to_owned());
        self
    }

    pub(crate) fn with_broken_finder(mut self) -> Self {
        self.broken_finder = true;
        self
    }

    /// Hashes `consolidate_hash` was called with, in call order.
    pub(crate) fn attempted(&self) -> Vec<String> {
        self.attempted.lock().unwrap().clone()
    }
}

pub(crate) fn member(hash: &str, offset_secs: i64, city: &str) -> JobRecord {
    JobRecord {
        id: Uuid::new_v4(),
        hash: Some(hash.to_owned()),
        date_inserted: Utc.timestamp_opt(1_760_000_000 + offset_secs, 0).unwrap(),
        url: None,
        location: LocationTuple {
            generated_city: Some(city.to_owned()),
            generated_state: Some("TX".to_owned()),
            generated_country: Some("US".to_owned()),
            ..LocationTuple::default()
        },
    }
}

#[async_trait]
impl DuplicateStore for FakeStore {
    async fn find_duplicate_hashes(&self) -> Result<Vec<DuplicateHash>> {
        if self.broken_finder {
            return Err(StorageError::Unavailable(sqlx::Error::PoolClosed));
        }
        Ok(self.groups.clone())
    }

    async fn load_group(&self, hash: &str) -> Result<Vec<JobRecord>> {
        Ok(self.members.get(hash).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ConsolidationStore for FakeStore {
    async fn consolidate_hash(&self, hash: &str) -> Result<ConsolidationReport> {
        self.attempted.lock().unwrap().push(hash.to_owned());

        if self.stalling.as_deref() == Some(hash) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.as_deref() == Some(hash) {
            return Err(StorageError::Constraint {
                code: "23505".into(),
                message: "duplicate key value violates unique constraint".into(),
            });
        }

        if let Some(members) = self.members.get(hash) {
            let plan = ConsolidationPlan::build(hash, members)?;
            return Ok(ConsolidationReport {
                hash: plan.hash,
                keeper_id: plan.keeper_id,
                member_count: plan.member_count,
                locations_created: plan.locations.len(),
                urls_created: plan.url_links.len(),
                jobs_deleted: plan.losers.len() as u64,
            });
        }

        let count = self
            .groups
            .iter()
            .find(|g| g.hash == hash)
            .map(|g| g.count)
            .ok_or_else(|| StorageError::NotFound { entity: "duplicate group", id: hash.into() })?;
        Ok(ConsolidationReport {
            hash: hash.to_owned(),
            keeper_id: Uuid::new_v4(),
            member_count: usize::try_from(count).unwrap(),
            locations_created: 1,
            urls_created: 0,
            jobs_deleted: count - 1,
        })
    }
}
