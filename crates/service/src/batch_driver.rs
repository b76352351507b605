//! Fail-fast driver over every duplicate group.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jobdedup_core::{RunSettings, RunState};
use jobdedup_storage::{ConsolidationStore, DuplicateStore};
use serde::Serialize;

use crate::{GroupService, LogProgress, ProgressSink, ServiceError};

/// The group that stopped a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupFailure {
    pub hash: String,
    pub error: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Groups selected for this run (after `limit`).
    pub total: usize,
    /// Groups consolidated and committed. The group that halted the run is counted in
    /// `failed`, not here, so `processed + failed` groups were attempted.
    pub processed: usize,
    /// 0, or 1 once a group failed and halted the run.
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Terminal lifecycle state: `completed` or `halted`.
    pub state: RunState,
    pub failure: Option<GroupFailure>,
}

impl RunSummary {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.state == RunState::Completed
    }
}

pub struct BatchDriver<S> {
    groups: GroupService<S>,
    settings: RunSettings,
    sink: Arc<dyn ProgressSink>,
}

impl<S> BatchDriver<S>
where
    S: DuplicateStore + ConsolidationStore,
{
    #[must_use]
    pub fn new(store: Arc<S>, settings: RunSettings) -> Self {
        Self {
            groups: GroupService::new(store, settings.group_timeout),
            settings,
            sink: Arc::new(LogProgress),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Consolidate every duplicate group in finder order, stopping at the first failure.
    ///
    /// A failed group leaves the run `Halted` and is reported in the summary; `Err` is
    /// reserved for failures before any group runs (the finder query) or a broken
    /// lifecycle.
    pub async fn run(&self) -> Result<RunSummary, ServiceError> {
        let started_at = Utc::now();
        let mut state = RunState::default();

        state.start_fetching()?;
        let groups = self.groups.find_groups(self.settings.limit).await?;
        let total = groups.len();
        self.sink.fetched(total);

        let progress_every = self.settings.progress_every.max(1);
        let mut processed: usize = 0;
        let mut failure = None;

        for (index, group) in groups.iter().enumerate() {
            state.begin_group(index, total)?;
            match self.groups.consolidate(&group.hash).await {
                Ok(report) => {
                    processed = processed.saturating_add(1);
                    self.sink.group_succeeded(index, total, group, &report);
                    if processed % progress_every == 0 {
                        self.sink.checkpoint(processed, total);
                    }
                },
                Err(err) => {
                    self.sink.group_failed(index, &group.hash, &err);
                    state.halt(&group.hash)?;
                    failure =
                        Some(GroupFailure { hash: group.hash.clone(), error: err.to_string() });
                    break;
                },
            }
        }

        if failure.is_none() {
            state.complete()?;
        }

        let summary = RunSummary {
            total,
            processed,
            failed: usize::from(failure.is_some()),
            started_at,
            finished_at: Utc::now(),
            state,
            failure,
        };
        self.sink.finished(&summary);
        Ok(summary)
    }
}
