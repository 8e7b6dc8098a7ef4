//! Error types for study-core.

use chrono::NaiveDate;
use thiserror::Error;

/// Deployment or programming faults: a bad interval ladder, or a stage that
/// does not fit the ladder it is scheduled against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("interval ladder is empty")]
    EmptyLadder,

    #[error("interval at position {index} must be positive")]
    NonPositiveInterval { index: usize },

    #[error("interval at position {index} ({days} days) must be greater than the previous one ({previous} days)")]
    NonIncreasing {
        index: usize,
        previous: u32,
        days: u32,
    },

    #[error("invalid interval at position {index}: {value:?}")]
    InvalidInterval { index: usize, value: String },

    #[error("stage {stage} is out of range for a ladder of {len} intervals")]
    StageOutOfRange { stage: u32, len: usize },

    #[error("due date {days} days after {today} is out of range")]
    DueDateOutOfRange { today: NaiveDate, days: u32 },
}

/// Caller supplied invalid input. Never corrupts stored state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be blank")]
    BlankField(&'static str),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}
