//! Goal model - a user-owned target with an append-only progress log.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::error::ModelError;
use crate::id::GoalId;
use crate::lenient;
use crate::progress::Progress;

/// Tolerance applied to time-based goals that do not set `allowedDeviation`.
pub const DEFAULT_ALLOWED_DEVIATION: u32 = 15;

/// A goal the owner tracks progress against.
///
/// Fields the model does not know about are kept in `extra` and written back
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredGoal")]
pub struct Goal {
    /// Unique identifier
    pub id: GoalId,

    /// Goal title
    pub title: String,

    /// Detailed description
    pub description: String,

    /// Measurement kind and its type-specific fields
    #[serde(flatten)]
    pub kind: GoalKind,

    /// Category the goal is filed under
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,

    /// Optional due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,

    /// Optional priority
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// Recorded progress, in insertion order
    pub progress_history: Vec<Progress>,

    /// Unmodeled fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Goal as read from storage.
///
/// Unset metadata may be stored as `""`. The flattened catch-all also sees
/// the kind's own keys, which are removed again on conversion.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredGoal {
    id: GoalId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(flatten)]
    kind: GoalKind,
    #[serde(default, deserialize_with = "lenient::category_id")]
    category_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::date")]
    deadline: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::blank_as_none")]
    priority: Option<Priority>,
    #[serde(default)]
    progress_history: Vec<Progress>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<StoredGoal> for Goal {
    fn from(stored: StoredGoal) -> Self {
        let mut extra = stored.extra;
        for key in stored.kind.wire_fields() {
            extra.remove(*key);
        }

        Self {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            kind: stored.kind,
            category_id: stored.category_id,
            deadline: stored.deadline,
            priority: stored.priority,
            progress_history: stored.progress_history,
            extra,
        }
    }
}

/// Goal priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Low
    Low,
    /// Medium
    Medium,
    /// High
    High,
}

/// Measurement kind of a goal.
///
/// Serialized inline with the goal under the `type` discriminant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalKind {
    /// Done / not done.
    Binary,

    /// A measured quantity.
    #[serde(rename_all = "camelCase")]
    Quantitative {
        /// Display unit of the measured value
        #[serde(default)]
        value_unit: String,
        /// Value of the most recent record
        #[serde(default, skip_serializing_if = "Option::is_none")]
        current_value: Option<f64>,
    },

    /// A clock time or an interval to hit within a tolerance.
    #[serde(rename_all = "camelCase")]
    TimeBased {
        /// `HH:MM` or `MM:SS`, depending on the subtype
        target_time: String,
        /// Which format the target uses
        #[serde(default)]
        subtype: TimeSubtype,
        /// Tolerance in minutes (clock time) or seconds (interval)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        allowed_deviation: Option<u32>,
    },

    /// Habit goals only appear in listings.
    Habit,
}

impl GoalKind {
    /// The field-less discriminant of this kind.
    pub fn goal_type(&self) -> GoalType {
        match self {
            GoalKind::Binary => GoalType::Binary,
            GoalKind::Quantitative { .. } => GoalType::Quantitative,
            GoalKind::TimeBased { .. } => GoalType::TimeBased,
            GoalKind::Habit => GoalType::Habit,
        }
    }

    /// JSON keys this kind serializes into the goal record.
    fn wire_fields(&self) -> &'static [&'static str] {
        match self {
            GoalKind::Binary | GoalKind::Habit => &["type"],
            GoalKind::Quantitative { .. } => &["type", "valueUnit", "currentValue"],
            GoalKind::TimeBased { .. } => &["type", "targetTime", "subtype", "allowedDeviation"],
        }
    }
}

/// Goal type discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    /// Done / not done
    Binary,
    /// Measured quantity
    Quantitative,
    /// Clock time or interval
    TimeBased,
    /// Listing-only habit
    Habit,
}

impl GoalType {
    /// Wire name of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalType::Binary => "BINARY",
            GoalType::Quantitative => "QUANTITATIVE",
            GoalType::TimeBased => "TIME_BASED",
            GoalType::Habit => "HABIT",
        }
    }

    /// Human readable label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            GoalType::Binary => "Binary",
            GoalType::Quantitative => "Quantitative",
            GoalType::TimeBased => "Time-based",
            GoalType::Habit => "Habit",
        }
    }
}

impl std::fmt::Display for GoalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format of a time-based goal's target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeSubtype {
    /// Time of day, `HH:MM`, deviation in minutes
    #[default]
    ClockTime,
    /// Duration, `MM:SS`, deviation in seconds
    TimeInterval,
}

impl TimeSubtype {
    /// Input format hint shown to the user.
    pub fn placeholder(&self) -> &'static str {
        match self {
            TimeSubtype::ClockTime => "HH:MM",
            TimeSubtype::TimeInterval => "MM:SS",
        }
    }
}

impl Goal {
    fn with_kind(title: impl Into<String>, description: impl Into<String>, kind: GoalKind) -> Self {
        Self {
            id: GoalId::new(),
            title: title.into(),
            description: description.into(),
            kind,
            category_id: None,
            deadline: None,
            priority: None,
            progress_history: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Create a binary goal with an empty history.
    pub fn binary(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_kind(title, description, GoalKind::Binary)
    }

    /// Create a quantitative goal measured in `value_unit`.
    pub fn quantitative(
        title: impl Into<String>,
        description: impl Into<String>,
        value_unit: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            title,
            description,
            GoalKind::Quantitative {
                value_unit: value_unit.into(),
                current_value: None,
            },
        )
    }

    /// Create a time-based goal. `allowed_deviation` of `None` means the default tolerance.
    pub fn time_based(
        title: impl Into<String>,
        description: impl Into<String>,
        target_time: impl Into<String>,
        subtype: TimeSubtype,
        allowed_deviation: Option<u32>,
    ) -> Self {
        Self::with_kind(
            title,
            description,
            GoalKind::TimeBased {
                target_time: target_time.into(),
                subtype,
                allowed_deviation,
            },
        )
    }

    /// Goal type discriminant.
    pub fn goal_type(&self) -> GoalType {
        self.kind.goal_type()
    }

    /// Latest recorded value of a quantitative goal.
    pub fn current_value(&self) -> Option<f64> {
        match &self.kind {
            GoalKind::Quantitative { current_value, .. } => *current_value,
            _ => None,
        }
    }

    /// Append a record to the history, updating derived fields.
    ///
    /// The record must reference this goal and carry the goal's type.
    pub fn append_progress(&mut self, progress: Progress) -> Result<(), ModelError> {
        self.check_record(&progress)?;

        if let (GoalKind::Quantitative { current_value, .. }, Some(value)) =
            (&mut self.kind, progress.payload.quantity())
        {
            *current_value = Some(value);
        }

        self.progress_history.push(progress);
        Ok(())
    }

    /// Verify every history entry belongs to this goal and matches its type.
    pub fn check_history(&self) -> Result<(), ModelError> {
        self.progress_history
            .iter()
            .try_for_each(|record| self.check_record(record))
    }

    fn check_record(&self, record: &Progress) -> Result<(), ModelError> {
        if record.goal_id != self.id {
            return Err(ModelError::ForeignProgress {
                progress: record.id.clone(),
                expected: self.id.clone(),
                found: record.goal_id.clone(),
            });
        }

        let found = record.goal_type();
        if found != self.goal_type() {
            return Err(ModelError::TypeMismatch {
                progress: record.id.clone(),
                goal: self.id.clone(),
                expected: self.goal_type(),
                found,
            });
        }

        Ok(())
    }
}
