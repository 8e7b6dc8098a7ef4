//! Core library for the study tracker.
//!
//! Provides:
//! - Leitner-style spaced repetition scheduler over a fixed interval ladder
//! - Shared types (Card, Tags, ReviewOutcome, LastResult)
//! - Journal records (study sessions, Feynman notes, weekly reflections)
//! - Analytics over those records (streak, minutes per day/topic, stage counts)
//!
//! Nothing in here performs I/O or reads the wall clock; "today" is always an
//! argument.

pub mod error;
pub mod journal;
pub mod scheduler;
pub mod stats;
pub mod types;

pub use error::{ConfigurationError, ValidationError};
pub use journal::{Activities, FeynmanNote, Reflection, SessionPeriod, StudySession};
pub use scheduler::{advance, IntervalLadder, Scheduler, SchedulingResult};
pub use stats::{
    minutes_per_day, minutes_per_topic, stage_histogram, streak, week_start, DayMinutes,
    StageCount, Summary, TopicMinutes,
};
pub use types::{Card, CardId, LastResult, ReviewOutcome, Tags};
