//! DuplicateStore implementation for PgStorage.

use async_trait::async_trait;
use jobdedup_core::{DuplicateHash, JobRecord};
use sqlx::Row;

use super::{PgStorage, job_columns, row_to_job_record};
use crate::traits::{DuplicateStore, Result};

const SELECT_GROUP: &str = concat!(
    "SELECT ",
    job_columns!(),
    " FROM jobs WHERE job_description_hash = $1 ORDER BY date_inserted ASC, id ASC"
);

#[async_trait]
impl DuplicateStore for PgStorage {
    async fn find_duplicate_hashes(&self) -> Result<Vec<DuplicateHash>> {
        let rows = sqlx::query(
            r#"SELECT job_description_hash, COUNT(*) AS occurrences
               FROM jobs
               WHERE job_description_hash IS NOT NULL
               GROUP BY job_description_hash
               HAVING COUNT(*) > 1
               ORDER BY COUNT(*) DESC, job_description_hash ASC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<DuplicateHash> {
                let hash: String = row.try_get("job_description_hash")?;
                let occurrences: i64 = row.try_get("occurrences")?;
                Ok(DuplicateHash::new(hash, u64::try_from(occurrences).unwrap_or(0)))
            })
            .collect()
    }

    async fn load_group(&self, hash: &str) -> Result<Vec<JobRecord>> {
        let rows = sqlx::query(SELECT_GROUP).bind(hash).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_job_record).collect()
    }
}
