//! Service layer for jobdedup
//!
//! Sits between the CLI and storage: single-group operations with a per-group timeout,
//! and the fail-fast batch driver over every duplicate group.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod batch_driver;
mod error;
mod group_service;
mod progress;

#[cfg(test)]
mod fake_store;

pub use batch_driver::{BatchDriver, GroupFailure, RunSummary};
pub use error::ServiceError;
pub use group_service::GroupService;
pub use progress::{LogProgress, ProgressSink};
