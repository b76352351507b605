use thiserror::Error;

/// Invalid or incomplete startup configuration.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required setting: {0} (or set DATABASE_URL)")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// A duplicate group that cannot be turned into a consolidation plan.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("no job records found for hash {0}")]
    EmptyGroup(String),

    #[error("job {id} does not carry hash {expected}")]
    ForeignMember { id: uuid::Uuid, expected: String },
}
