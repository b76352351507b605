//! ConsolidationStore implementation for PgStorage.

use async_trait::async_trait;
use jobdedup_core::{ConsolidationPlan, ConsolidationReport};
use uuid::Uuid;

use super::{PgStorage, job_columns, row_to_job_record};
use crate::error::StorageError;
use crate::traits::{ConsolidationStore, Result};

const LOCK_GROUP: &str = concat!(
    "SELECT ",
    job_columns!(),
    " FROM jobs WHERE job_description_hash = $1 ORDER BY date_inserted ASC, id ASC FOR UPDATE"
);

const INSERT_LOCATION: &str = r#"INSERT INTO job_locations
       (id, job_id, location, country, region, locality, postcode,
        latitude, longitude, generated_city, generated_state, generated_country,
        llm_location_retry_count)
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8::numeric, $9::numeric, $10, $11, $12, $13)"#;

const INSERT_LOCATION_URL: &str =
    "INSERT INTO job_location_urls (id, job_location_id, url) VALUES ($1, $2, $3)";

const DELETE_LOSERS: &str = "DELETE FROM jobs WHERE id = ANY($1)";

#[async_trait]
impl ConsolidationStore for PgStorage {
    async fn consolidate_hash(&self, hash: &str) -> Result<ConsolidationReport> {
        // Dropping `tx` on any early return rolls the whole group back.
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(LOCK_GROUP).bind(hash).fetch_all(&mut *tx).await?;
        let members = rows.iter().map(row_to_job_record).collect::<Result<Vec<_>>>()?;
        if members.is_empty() {
            return Err(StorageError::NotFound { entity: "duplicate group", id: hash.to_owned() });
        }

        let plan = ConsolidationPlan::build(hash, &members)?;

        let mut location_ids = Vec::with_capacity(plan.locations.len());
        for location in &plan.locations {
            let id = Uuid::new_v4();
            sqlx::query(INSERT_LOCATION)
                .bind(id)
                .bind(plan.keeper_id)
                .bind(&location.location)
                .bind(&location.country)
                .bind(&location.region)
                .bind(&location.locality)
                .bind(&location.postcode)
                .bind(&location.latitude)
                .bind(&location.longitude)
                .bind(&location.generated_city)
                .bind(&location.generated_state)
                .bind(&location.generated_country)
                .bind(location.llm_location_retry_count)
                .execute(&mut *tx)
                .await?;
            location_ids.push(id);
        }

        for link in &plan.url_links {
            let location_id = location_ids.get(link.location_index).copied().ok_or_else(|| {
                StorageError::NotFound {
                    entity: "planned job location",
                    id: link.location_index.to_string(),
                }
            })?;
            sqlx::query(INSERT_LOCATION_URL)
                .bind(Uuid::new_v4())
                .bind(location_id)
                .bind(&link.url)
                .execute(&mut *tx)
                .await?;
        }

        let jobs_deleted = if plan.losers.is_empty() {
            0
        } else {
            sqlx::query(DELETE_LOSERS)
                .bind(plan.losers.as_slice())
                .execute(&mut *tx)
                .await?
                .rows_affected()
        };
        if jobs_deleted != plan.losers.len() as u64 {
            return Err(StorageError::NotFound {
                entity: "locked duplicate job",
                id: format!("{hash} (deleted {jobs_deleted} of {})", plan.losers.len()),
            });
        }

        tx.commit().await?;

        let report = ConsolidationReport {
            hash: plan.hash,
            keeper_id: plan.keeper_id,
            member_count: plan.member_count,
            locations_created: location_ids.len(),
            urls_created: plan.url_links.len(),
            jobs_deleted,
        };
        tracing::debug!(
            hash = %report.hash,
            keeper = %report.keeper_id,
            locations = report.locations_created,
            urls = report.urls_created,
            deleted = report.jobs_deleted,
            "Group consolidated"
        );
        Ok(report)
    }
}
