//! Storage layer for jobdedup
//!
//! PostgreSQL access for finding duplicate job hashes and consolidating each group
//! inside its own transaction.

mod error;
mod pg_storage;
pub mod traits;

pub use error::StorageError;
pub use pg_storage::PgStorage;
pub use traits::{ConsolidationStore, DuplicateStore};
