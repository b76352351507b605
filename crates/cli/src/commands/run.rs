//! Batch consolidation over every duplicate group.

use jobdedup_core::RunSettings;
use jobdedup_service::BatchDriver;

use super::{RunOverrides, connect};

pub(crate) async fn run(overrides: RunOverrides) -> anyhow::Result<()> {
    let settings = overrides.apply(RunSettings::from_env());
    let storage = connect().await?;

    tracing::info!(
        progress_every = settings.progress_every,
        group_timeout_secs = settings.group_timeout.as_secs(),
        limit = ?settings.limit,
        "Starting consolidation run"
    );
    let summary = BatchDriver::new(storage, settings).run().await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);

    if let Some(failure) = &summary.failure {
        anyhow::bail!(
            "run halted on hash {}: {} (processed {}, failed {})",
            failure.hash,
            failure.error,
            summary.processed,
            summary.failed
        );
    }
    Ok(())
}
