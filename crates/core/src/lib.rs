//! Core types for jobdedup
//!
//! Domain model for duplicate job groups, the pure consolidation planner, run lifecycle
//! and startup configuration shared by the storage, service and CLI crates.

mod config;
mod consolidation;
mod constants;
mod env_config;
mod error;
mod job;
mod run_state;

pub use config::*;
pub use consolidation::*;
pub use constants::*;
pub use env_config::*;
pub use error::*;
pub use job::*;
pub use run_state::*;
