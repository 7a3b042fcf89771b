//! Progress recording - validates raw input and appends it to a goal.

use std::sync::{Arc, OnceLock};
use chrono::Utc;
use goaltrack_core::{
    Goal, GoalId, GoalKind, GoalType, OwnerKey, Progress, ProgressPayload, Time,
    DEFAULT_ALLOWED_DEVIATION,
};
use goaltrack_storage::OwnerStore;
use regex::Regex;
use tracing::{info, warn};
use crate::deviation::{calculate_deviation, try_deviation};
use crate::error::{RecordError, ValidationError};

/// Raw user input for one progress report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressInput {
    /// Reported value (number or time), if the goal type needs one
    pub value: Option<String>,
    /// Free-text notes
    pub notes: Option<String>,
}

impl ProgressInput {
    /// Input with no value and no notes (enough for binary goals).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reported value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Configuration for the recorder.
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Tolerance for time-based goals without `allowedDeviation`
    pub default_allowed_deviation: u32,
    /// Fail instead of recording a zero deviation when the goal's target is malformed
    pub strict_deviation: bool,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            default_allowed_deviation: DEFAULT_ALLOWED_DEVIATION,
            strict_deviation: false,
        }
    }
}

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}$").expect("time pattern is valid"))
}

/// Build the record `input` describes for `goal`, stamped with `now`.
///
/// Pure: the goal is not modified.
pub fn build_progress(
    goal: &Goal,
    input: &ProgressInput,
    now: Time,
    config: &RecorderConfig,
) -> Result<Progress, ValidationError> {
    let payload = match &goal.kind {
        GoalKind::Binary => ProgressPayload::Binary { completed: true },

        GoalKind::Quantitative { .. } => ProgressPayload::Quantitative {
            value: parse_quantity(input.value.as_deref())?,
        },

        GoalKind::TimeBased { target_time, subtype, allowed_deviation } => {
            let actual = input.value.as_deref().unwrap_or_default();
            if !time_pattern().is_match(actual) {
                return Err(ValidationError::InvalidTimeFormat {
                    expected: subtype.placeholder(),
                });
            }

            let deviation = if config.strict_deviation {
                try_deviation(target_time, actual)?.amount
            } else {
                calculate_deviation(target_time, actual)
            };
            let tolerance = allowed_deviation.unwrap_or(config.default_allowed_deviation);

            ProgressPayload::TimeBased {
                actual_time: actual.to_string(),
                deviation,
                success: deviation <= u64::from(tolerance),
            }
        }

        GoalKind::Habit => return Err(ValidationError::UnsupportedGoalType(GoalType::Habit)),
    };

    Ok(Progress::new(goal.id.clone(), payload, now, clean_notes(input.notes.as_deref())))
}

fn parse_quantity(value: Option<&str>) -> Result<f64, ValidationError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::MissingValue)
}

fn clean_notes(notes: Option<&str>) -> Option<String> {
    notes
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// Records progress against goals held by an [`OwnerStore`].
#[derive(Clone)]
pub struct ProgressRecorder {
    storage: Arc<dyn OwnerStore>,
    config: RecorderConfig,
}

impl ProgressRecorder {
    /// Create a recorder with the default configuration.
    pub fn new(storage: Arc<dyn OwnerStore>) -> Self {
        Self {
            storage,
            config: RecorderConfig::default(),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: RecorderConfig) -> Self {
        self.config = config;
        self
    }

    /// Validate `input`, append the resulting record to the goal and persist
    /// the owner record.
    ///
    /// Returns the appended record. On error the stored record is unchanged.
    pub async fn record_progress(
        &self,
        owner: &OwnerKey,
        goal_id: &GoalId,
        input: &ProgressInput,
    ) -> Result<Progress, RecordError> {
        let Some(mut record) = self.storage.load_owner(owner).await? else {
            warn!("Cannot record progress: owner {} not found", owner);
            return Err(RecordError::OwnerNotFound(owner.clone()));
        };

        let Some(goal) = record.goal_mut(goal_id) else {
            warn!("Cannot record progress: goal {} not found for owner {}", goal_id, owner);
            return Err(RecordError::GoalNotFound(goal_id.clone()));
        };

        let progress = build_progress(goal, input, Utc::now(), &self.config)?;
        goal.append_progress(progress.clone())?;
        let history_len = goal.progress_history.len();

        self.storage.save_owner(owner, &record).await?;

        info!(
            "Recorded {} progress {} on goal {} for {} ({} records)",
            progress.goal_type(),
            progress.id,
            goal_id,
            owner,
            history_len
        );
        Ok(progress)
    }
}
