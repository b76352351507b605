//! Shared constants for jobdedup.
//!
//! Centralizes the numbers the storage, service and CLI crates agree on.

/// PostgreSQL connection pool: maximum connections.
///
/// The whole run owns exactly one connection; groups are never processed in parallel.
pub const PG_POOL_MAX_CONNECTIONS: u32 = 1;

/// PostgreSQL connection pool: acquire timeout in seconds.
pub const PG_POOL_ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Default PostgreSQL port when `PGPORT` is unset.
pub const DEFAULT_PG_PORT: u16 = 5432;

/// Emit a progress checkpoint after this many processed groups.
pub const DEFAULT_PROGRESS_EVERY: usize = 100;

/// Upper bound on the wall-clock time a single group's transaction may take.
pub const DEFAULT_GROUP_TIMEOUT_SECS: u64 = 300;

/// Environment variable overriding [`DEFAULT_PROGRESS_EVERY`].
pub const PROGRESS_EVERY_ENV: &str = "JOBDEDUP_PROGRESS_EVERY";

/// Environment variable overriding [`DEFAULT_GROUP_TIMEOUT_SECS`].
pub const GROUP_TIMEOUT_ENV: &str = "JOBDEDUP_GROUP_TIMEOUT_SECS";
