//! Recording errors.

use goaltrack_core::{GoalId, GoalType, ModelError, OwnerKey};
use goaltrack_storage::StorageError;
use crate::deviation::DeviationError;

/// User-correctable problems with the raw input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Quantitative goals need a finite number
    #[error("a numeric value is required")]
    MissingValue,

    /// Time-based goals need `H:MM` or `HH:MM` style input
    #[error("time must be entered as {expected}")]
    InvalidTimeFormat {
        /// Format hint for the goal's subtype
        expected: &'static str,
    },

    /// The goal's own target cannot be compared against (strict mode only)
    #[error("goal target time is unusable: {0}")]
    InvalidTargetTime(#[from] DeviationError),

    /// Progress cannot be recorded for this kind of goal
    #[error("progress cannot be recorded for {0} goals")]
    UnsupportedGoalType(GoalType),
}

/// Failure of a record operation. Nothing is written when one is returned.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// Invalid input
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The built record does not fit the goal
    #[error(transparent)]
    Model(#[from] ModelError),

    /// No owner record under this key
    #[error("owner not found: {0}")]
    OwnerNotFound(OwnerKey),

    /// The owner has no goal with this id
    #[error("goal not found: {0}")]
    GoalNotFound(GoalId),

    /// Storage collaborator failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
