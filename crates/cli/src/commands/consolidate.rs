use anyhow::Result;

use super::{RunOverrides, group_service};

pub(crate) async fn run(hash: &str, group_timeout_secs: Option<u64>) -> Result<()> {
    let service =
        group_service(RunOverrides { group_timeout_secs, ..RunOverrides::default() }).await?;
    let report = service.consolidate(hash).await?;
    tracing::info!(
        hash = %report.hash,
        keeper = %report.keeper_id,
        deleted = report.jobs_deleted,
        "Group consolidated"
    );
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
