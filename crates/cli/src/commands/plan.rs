use anyhow::Result;

use super::{RunOverrides, group_service};

pub(crate) async fn run(hash: &str) -> Result<()> {
    let service = group_service(RunOverrides::default()).await?;
    let plan = service.plan(hash).await?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
