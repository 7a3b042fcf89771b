//! Progress record model - one reported event against a goal.

use serde::{Deserialize, Serialize};
use crate::goal::GoalType;
use crate::id::{GoalId, ProgressId};
use crate::Time;

/// One immutable progress report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// Unique identifier, ordered by creation
    pub id: ProgressId,

    /// Owning goal (lookup only)
    pub goal_id: GoalId,

    /// When the event happened
    pub date: Time,

    /// When the record was created
    pub created_at: Time,

    /// Free-text notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Type-specific payload
    #[serde(flatten)]
    pub payload: ProgressPayload,
}

/// Type-specific part of a progress record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressPayload {
    /// Completion of a binary goal.
    Binary {
        /// Whether the goal was completed
        completed: bool,
    },

    /// Measured quantity at this event.
    Quantitative {
        /// The measured value
        value: f64,
    },

    /// Reported time against a time-based goal.
    #[serde(rename_all = "camelCase")]
    TimeBased {
        /// Reported time, same format family as the goal's target
        actual_time: String,
        /// Absolute difference to the target (minutes or seconds)
        deviation: u64,
        /// Whether the deviation was within tolerance
        success: bool,
    },
}

impl ProgressPayload {
    /// Goal type this payload belongs to.
    pub fn goal_type(&self) -> GoalType {
        match self {
            ProgressPayload::Binary { .. } => GoalType::Binary,
            ProgressPayload::Quantitative { .. } => GoalType::Quantitative,
            ProgressPayload::TimeBased { .. } => GoalType::TimeBased,
        }
    }

    /// The measured value of a quantitative record.
    pub fn quantity(&self) -> Option<f64> {
        match self {
            ProgressPayload::Quantitative { value } => Some(*value),
            _ => None,
        }
    }
}

impl Progress {
    /// Create a record with a fresh id, stamping both `date` and `created_at` with `now`.
    pub fn new(goal_id: GoalId, payload: ProgressPayload, now: Time, notes: Option<String>) -> Self {
        Self {
            id: ProgressId::new(),
            goal_id,
            date: now,
            created_at: now,
            notes,
            payload,
        }
    }

    /// Goal type of this record.
    pub fn goal_type(&self) -> GoalType {
        self.payload.goal_type()
    }
}
