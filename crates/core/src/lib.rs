//! Goaltrack core data models.
//!
//! Goals, their progress records and the owner record that groups them.

#![warn(missing_docs)]

mod id;
mod goal;
mod progress;
mod owner;
mod error;
mod lenient;

pub use id::{EmptyIdError, GoalId, ProgressId, OwnerKey};
pub use goal::{Goal, GoalKind, GoalType, Priority, TimeSubtype, DEFAULT_ALLOWED_DEVIATION};
pub use progress::{Progress, ProgressPayload};
pub use owner::OwnerRecord;
pub use error::ModelError;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
