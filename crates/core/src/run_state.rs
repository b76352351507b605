//! Lifecycle of a batch consolidation run.

use serde::{Deserialize, Serialize};

/// `Idle → Fetching → Processing(i) → {Processing(i+1) | Halted | Completed}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Fetching,
    /// Working on the group at `index` (zero-based) of `total`.
    Processing { index: usize, total: usize },
    /// Stopped on the first failed group; later groups were left untouched.
    Halted { hash: String, index: usize },
    Completed,
}

/// Attempted a transition the run lifecycle does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal run state transition: {from:?} -> {to}")]
pub struct IllegalTransition {
    pub from: RunState,
    pub to: &'static str,
}

impl RunState {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Halted { .. } | Self::Completed)
    }

    pub fn start_fetching(&mut self) -> Result<(), IllegalTransition> {
        match self {
            Self::Idle => {
                *self = Self::Fetching;
                Ok(())
            },
            _ => Err(self.illegal("fetching")),
        }
    }

    /// Move to the group at `index`. From `Fetching` only index 0 is allowed; afterwards
    /// groups must be visited strictly in order.
    pub fn begin_group(&mut self, index: usize, total: usize) -> Result<(), IllegalTransition> {
        let allowed = match self {
            Self::Fetching => index == 0,
            Self::Processing { index: current, .. } => index == current.saturating_add(1),
            _ => false,
        };
        if !allowed || index >= total {
            return Err(self.illegal("processing"));
        }
        *self = Self::Processing { index, total };
        Ok(())
    }

    pub fn halt(&mut self, hash: &str) -> Result<(), IllegalTransition> {
        match self {
            Self::Processing { index, .. } => {
                let index = *index;
                *self = Self::Halted { hash: hash.to_owned(), index };
                Ok(())
            },
            _ => Err(self.illegal("halted")),
        }
    }

    /// Finish the run. Allowed once the last group is done, or straight from `Fetching`
    /// when there was nothing to process.
    pub fn complete(&mut self) -> Result<(), IllegalTransition> {
        let allowed = match self {
            Self::Fetching => true,
            Self::Processing { index, total } => index.saturating_add(1) == *total,
            _ => false,
        };
        if !allowed {
            return Err(self.illegal("completed"));
        }
        *self = Self::Completed;
        Ok(())
    }

    fn illegal(&self, to: &'static str) -> IllegalTransition {
        IllegalTransition { from: self.clone(), to }
    }
}
