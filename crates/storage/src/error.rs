//! Typed error enum for the storage layer.
//!
//! Lets the batch driver tell a lost connection apart from a constraint violation or a
//! group that vanished between discovery and consolidation.

use jobdedup_core::PlanError;
use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store cannot be reached or the connection dropped.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    /// Expected rows are missing.
    #[error("not found: {entity} {id}")]
    NotFound { entity: &'static str, id: String },

    /// Integrity constraint violation (SQLSTATE class 23).
    #[error("constraint violation [{code}]: {message}")]
    Constraint { code: String, message: String },

    /// Any other SQL failure.
    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    /// Row data could not be decoded into a domain type.
    #[error("data corruption: {context}")]
    DataCorruption {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The loaded group could not be planned.
    #[error("invalid group: {0}")]
    Plan(#[from] PlanError),
}

impl StorageError {
    /// Whether this error is likely transient (worth retrying).
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Whether the store itself is unreachable.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Whether this error is an integrity constraint violation.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint { .. })
    }
}

/// Custom `From<sqlx::Error>` instead of a blanket `#[from]`.
///
/// - I/O, TLS and pool exhaustion → `Unavailable`
/// - `RowNotFound` → `NotFound` (generic; callers remap with entity context)
/// - SQLSTATE 23xxx → `Constraint`
/// - column decode failures → `DataCorruption`
/// - Everything else → `Database`
impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed => Self::Unavailable(err),
            sqlx::Error::RowNotFound => Self::NotFound { entity: "row", id: "unknown".into() },
            sqlx::Error::Database(db_err)
                if db_err.code().is_some_and(|c| c.starts_with("23")) =>
            {
                Self::Constraint {
                    code: db_err.code().map(|c| c.into_owned()).unwrap_or_default(),
                    message: db_err.message().to_owned(),
                }
            },
            sqlx::Error::ColumnDecode { index, .. } => {
                let context = format!("decoding column {index}");
                Self::DataCorruption { context, source: Box::new(err) }
            },
            _ => Self::Database(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_timeout_is_connectivity() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);
        assert!(err.is_connectivity());
        assert!(err.is_transient());
        assert!(!err.is_constraint());
    }

    #[test]
    fn io_error_is_connectivity() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = StorageError::from(sqlx::Error::Io(io));
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn protocol_errors_are_generic_database_errors() {
        let err = StorageError::from(sqlx::Error::Protocol("bad frame".into()));
        assert!(matches!(err, StorageError::Database(_)));
        assert!(err.to_string().contains("bad frame"));
    }

    #[test]
    fn plan_errors_convert() {
        let err = StorageError::from(PlanError::EmptyGroup("h9".into()));
        assert_eq!(err.to_string(), "invalid group: no job records found for hash h9");
    }
}
