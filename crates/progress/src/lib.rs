//! Goal progress recording and history.
//!
//! Deviation scoring for time-based goals, the recorder that turns raw input
//! into progress records, and read-only history views.

#![warn(missing_docs)]

pub mod deviation;
pub mod error;
pub mod recorder;
pub mod history;

pub use deviation::{
    calculate_deviation, try_deviation, Deviation, DeviationError, DeviationUnit, TimeFormat,
};
pub use error::{RecordError, ValidationError};
pub use recorder::{build_progress, ProgressInput, ProgressRecorder, RecorderConfig};
pub use history::{
    render_history, render_value, summarize, HistoryAggregator, HistoryEntry, HistorySummary,
};
