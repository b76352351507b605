use anyhow::Result;

use super::{RunOverrides, group_service};

pub(crate) async fn run(limit: Option<usize>) -> Result<()> {
    let service = group_service(RunOverrides::default()).await?;
    let groups = service.find_groups(limit).await?;
    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}
