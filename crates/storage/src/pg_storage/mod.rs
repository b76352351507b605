//! PostgreSQL storage backend using sqlx.
//!
//! Split into modular files by concern: discovery of duplicate hashes and the
//! per-hash consolidation transaction.

mod consolidate;
mod duplicates;

use std::str::FromStr;
use std::time::Duration;

use jobdedup_core::{
    ConnectionSettings, JobRecord, LocationTuple, PG_POOL_ACQUIRE_TIMEOUT_SECS,
    PG_POOL_MAX_CONNECTIONS,
};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use sqlx::{PgPool, Row};

use crate::error::StorageError;

/// Columns of `jobs` that consolidation reads. Coordinates come back as text so they
/// round-trip exactly.
macro_rules! job_columns {
    () => {
        "id, job_description_hash, date_inserted, job_url,
         generated_city, generated_state, generated_country,
         location, country, region, locality, postcode,
         latitude::text AS latitude, longitude::text AS longitude,
         llm_location_retry_count"
    };
}
pub(crate) use job_columns;

#[derive(Clone, Debug)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    /// Open the single connection the run works through.
    ///
    /// Any failure here means the store is unreachable and is reported as
    /// [`StorageError::Unavailable`].
    pub async fn connect(settings: &ConnectionSettings) -> Result<Self, StorageError> {
        let options = connect_options(settings)?;
        let pool = PgPoolOptions::new()
            .max_connections(PG_POOL_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(PG_POOL_ACQUIRE_TIMEOUT_SECS))
            .test_before_acquire(true)
            .connect_with(options)
            .await
            .map_err(StorageError::Unavailable)?;
        tracing::info!(target_db = %settings.describe(), "PgStorage connected");
        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, embedding in a larger service).
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn connect_options(settings: &ConnectionSettings) -> Result<PgConnectOptions, StorageError> {
    match settings {
        ConnectionSettings::Url(url) => {
            PgConnectOptions::from_str(url).map_err(StorageError::Unavailable)
        },
        ConnectionSettings::Params { host, port, database, user, password, ssl_mode } => {
            let mut options = PgConnectOptions::new()
                .host(host)
                .port(*port)
                .database(database)
                .username(user);
            if let Some(password) = password {
                options = options.password(password);
            }
            if let Some(mode) = ssl_mode {
                options = options
                    .ssl_mode(PgSslMode::from_str(mode).map_err(StorageError::Unavailable)?);
            }
            Ok(options)
        },
    }
}

pub(crate) fn row_to_job_record(row: &sqlx::postgres::PgRow) -> Result<JobRecord, StorageError> {
    Ok(JobRecord {
        id: row.try_get("id")?,
        hash: row.try_get("job_description_hash")?,
        date_inserted: row.try_get("date_inserted")?,
        url: row.try_get("job_url")?,
        location: LocationTuple {
            generated_city: row.try_get("generated_city")?,
            generated_state: row.try_get("generated_state")?,
            generated_country: row.try_get("generated_country")?,
            location: row.try_get("location")?,
            country: row.try_get("country")?,
            region: row.try_get("region")?,
            locality: row.try_get("locality")?,
            postcode: row.try_get("postcode")?,
            latitude: row.try_get("latitude")?,
            longitude: row.try_get("longitude")?,
            llm_location_retry_count: row.try_get("llm_location_retry_count")?,
        },
    })
}
