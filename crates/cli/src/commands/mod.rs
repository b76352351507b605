pub(crate) mod consolidate;
pub(crate) mod find;
pub(crate) mod plan;
pub(crate) mod run;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use jobdedup_core::{ConnectionSettings, RunSettings};
use jobdedup_service::GroupService;
use jobdedup_storage::PgStorage;

/// Command-line values that take precedence over `JOBDEDUP_*` variables.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RunOverrides {
    pub(crate) progress_every: Option<usize>,
    pub(crate) group_timeout_secs: Option<u64>,
    pub(crate) limit: Option<usize>,
}

impl RunOverrides {
    pub(crate) fn apply(self, mut settings: RunSettings) -> RunSettings {
        if let Some(every) = self.progress_every {
            settings.progress_every = every.max(1);
        }
        if let Some(secs) = self.group_timeout_secs {
            settings.group_timeout = Duration::from_secs(secs.max(1));
        }
        if self.limit.is_some() {
            settings.limit = self.limit;
        }
        settings
    }
}

/// Validate connection settings and open the store. Fails before any work is done.
pub(crate) async fn connect() -> Result<Arc<PgStorage>> {
    let settings = ConnectionSettings::from_env()?;
    let storage = PgStorage::connect(&settings).await?;
    Ok(Arc::new(storage))
}

pub(crate) async fn group_service(overrides: RunOverrides) -> Result<GroupService<PgStorage>> {
    let settings = overrides.apply(RunSettings::from_env());
    Ok(GroupService::new(connect().await?, settings.group_timeout))
}
