//! Where the batch driver reports what it is doing.

use jobdedup_core::{ConsolidationReport, DuplicateHash};

use crate::{RunSummary, ServiceError};

/// Receives batch progress. The default implementation is [`LogProgress`].
pub trait ProgressSink: Send + Sync {
    /// The group list has been fetched.
    fn fetched(&self, total: usize);

    fn group_succeeded(
        &self,
        index: usize,
        total: usize,
        group: &DuplicateHash,
        report: &ConsolidationReport,
    );

    fn group_failed(&self, index: usize, hash: &str, error: &ServiceError);

    /// Fired every `progress_every` processed groups.
    fn checkpoint(&self, processed: usize, total: usize);

    fn finished(&self, summary: &RunSummary);
}

/// Reports progress through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn fetched(&self, total: usize) {
        tracing::info!(groups = total, "Found duplicate groups");
    }

    fn group_succeeded(
        &self,
        index: usize,
        total: usize,
        group: &DuplicateHash,
        report: &ConsolidationReport,
    ) {
        tracing::info!(
            hash = %group.hash,
            count = group.count,
            keeper = %report.keeper_id,
            deleted = report.jobs_deleted,
            "{}",
            success_line(index, total, group)
        );
    }

    fn group_failed(&self, index: usize, hash: &str, error: &ServiceError) {
        tracing::error!(index, hash, error = %error, "Group consolidation failed");
    }

    fn checkpoint(&self, processed: usize, total: usize) {
        tracing::info!(processed, total, "Progress: {processed}/{total} groups consolidated");
    }

    fn finished(&self, summary: &RunSummary) {
        match &summary.failure {
            None => tracing::info!(
                processed = summary.processed,
                total = summary.total,
                "All duplicate groups consolidated"
            ),
            Some(failure) => tracing::error!(
                hash = %failure.hash,
                processed = summary.processed,
                failed = summary.failed,
                total = summary.total,
                "Run halted on first failed group"
            ),
        }
    }
}

/// `[3/120] SUCCESS: <hash> (count: 4)`, with a one-based position.
fn success_line(index: usize, total: usize, group: &DuplicateHash) -> String {
    let position = index.saturating_add(1);
    format!("[{position}/{total}] SUCCESS: {} (count: {})", group.hash, group.count)
}
