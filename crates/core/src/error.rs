//! Model invariant errors.

use crate::goal::GoalType;
use crate::id::{GoalId, ProgressId};

/// A progress record that cannot belong to the goal it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// Record references a different goal
    #[error("progress {progress} belongs to goal {found}, not {expected}")]
    ForeignProgress {
        /// Offending record
        progress: ProgressId,
        /// Goal the record was applied to
        expected: GoalId,
        /// Goal the record references
        found: GoalId,
    },

    /// Record payload does not match the goal type
    #[error("progress {progress} is {found}, goal {goal} is {expected}")]
    TypeMismatch {
        /// Offending record
        progress: ProgressId,
        /// Goal the record was applied to
        goal: GoalId,
        /// The goal's type
        expected: GoalType,
        /// The record's type
        found: GoalType,
    },
}
