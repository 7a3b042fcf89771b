//! Deviation between a target time and a reported time.
//!
//! Targets of exactly five characters containing a colon are clock times
//! (`HH:MM`, deviation in minutes); shorter targets containing a colon are
//! intervals (`MM:SS`, deviation in seconds). Both sides are split on `:` and
//! folded into `major * 60 + minor`.

use serde::Serialize;

/// Format family of a time string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeFormat {
    /// `HH:MM`
    Clock,
    /// `MM:SS` or `M:SS`
    Interval,
}

impl TimeFormat {
    /// Detect the format of a target string, `None` if it has no colon or is
    /// longer than five characters.
    pub fn detect(value: &str) -> Option<Self> {
        if !value.contains(':') {
            return None;
        }
        match value.chars().count() {
            5 => Some(TimeFormat::Clock),
            n if n < 5 => Some(TimeFormat::Interval),
            _ => None,
        }
    }

    /// Unit a deviation in this format is expressed in.
    pub fn unit(&self) -> DeviationUnit {
        match self {
            TimeFormat::Clock => DeviationUnit::Minutes,
            TimeFormat::Interval => DeviationUnit::Seconds,
        }
    }
}

/// Unit of a deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationUnit {
    /// Clock-time deviations
    Minutes,
    /// Interval deviations
    Seconds,
}

impl DeviationUnit {
    /// Short suffix for display.
    pub fn suffix(&self) -> &'static str {
        match self {
            DeviationUnit::Minutes => "min",
            DeviationUnit::Seconds => "s",
        }
    }
}

/// A computed deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deviation {
    /// Absolute difference
    pub amount: u64,
    /// Unit of `amount`
    pub unit: DeviationUnit,
}

/// Why a deviation could not be computed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviationError {
    /// Target or actual is empty
    #[error("target and actual time are both required")]
    Empty,

    /// Target is neither a clock time nor an interval
    #[error("unrecognized time format: {0:?}")]
    UnrecognizedFormat(String),

    /// A component is not an unsigned number
    #[error("invalid time value: {0:?}")]
    InvalidComponent(String),
}

/// Strict deviation: every malformed input is reported.
pub fn try_deviation(target: &str, actual: &str) -> Result<Deviation, DeviationError> {
    if target.is_empty() || actual.is_empty() {
        return Err(DeviationError::Empty);
    }

    let format = TimeFormat::detect(target)
        .ok_or_else(|| DeviationError::UnrecognizedFormat(target.to_string()))?;

    let target_total = total_units(target)?;
    let actual_total = total_units(actual)?;

    Ok(Deviation {
        amount: target_total.abs_diff(actual_total),
        unit: format.unit(),
    })
}

/// Lenient deviation: malformed or missing input yields `0`.
///
/// A zero result therefore does not by itself mean "on target".
pub fn calculate_deviation(target: &str, actual: &str) -> u64 {
    match try_deviation(target, actual) {
        Ok(deviation) => deviation.amount,
        Err(e) => {
            tracing::debug!("Deviation of {:?} against {:?} degraded to 0: {}", actual, target, e);
            0
        }
    }
}

fn total_units(value: &str) -> Result<u64, DeviationError> {
    let invalid = || DeviationError::InvalidComponent(value.to_string());

    let mut parts = value.split(':');
    let major = parse_component(parts.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
    let minor = parse_component(parts.next().ok_or_else(invalid)?).ok_or_else(invalid)?;

    major
        .checked_mul(60)
        .and_then(|m| m.checked_add(minor))
        .ok_or_else(invalid)
}

// Empty components count as zero.
fn parse_component(part: &str) -> Option<u64> {
    let part = part.trim();
    if part.is_empty() {
        return Some(0);
    }
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}
