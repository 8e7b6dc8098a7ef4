//! Leitner-style spaced repetition scheduler.
//!
//! A card climbs one rung of the interval ladder for every successful recall
//! and falls back to the bottom rung on any lapse. The top rung is sticky.

pub mod ladder;

pub use ladder::IntervalLadder;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::types::{LastResult, ReviewOutcome};

/// Scheduling fields of a card after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingResult {
    pub stage: u32,
    pub next_due: NaiveDate,
    pub last_result: LastResult,
}

/// Compute the next scheduling state for a card at `stage`.
///
/// Fails only when `stage` is off the ladder, which is a caller bug rather
/// than a data problem.
pub fn advance(
    stage: u32,
    ladder: &IntervalLadder,
    outcome: ReviewOutcome,
    today: NaiveDate,
) -> Result<SchedulingResult, ConfigurationError> {
    if ladder.days(stage).is_none() {
        return Err(ConfigurationError::StageOutOfRange {
            stage,
            len: ladder.len(),
        });
    }

    let new_stage = match outcome {
        ReviewOutcome::Remembered => (stage + 1).min(ladder.last_stage()),
        ReviewOutcome::Forgotten => 0,
    };
    let days = ladder
        .days(new_stage)
        .ok_or(ConfigurationError::StageOutOfRange {
            stage: new_stage,
            len: ladder.len(),
        })?;
    let next_due = today
        .checked_add_days(Days::new(u64::from(days)))
        .ok_or(ConfigurationError::DueDateOutOfRange { today, days })?;

    Ok(SchedulingResult {
        stage: new_stage,
        next_due,
        last_result: outcome.into(),
    })
}

/// Scheduler bound to the ladder it was configured with.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    ladder: IntervalLadder,
}

impl Scheduler {
    pub fn new(ladder: IntervalLadder) -> Self {
        Self { ladder }
    }

    pub fn ladder(&self) -> &IntervalLadder {
        &self.ladder
    }

    pub fn advance(
        &self,
        stage: u32,
        outcome: ReviewOutcome,
        today: NaiveDate,
    ) -> Result<SchedulingResult, ConfigurationError> {
        advance(stage, &self.ladder, outcome, today)
    }

    /// Reject a stored stage that no longer fits this ladder.
    pub fn check_stage(&self, stage: u32) -> Result<(), ConfigurationError> {
        match self.ladder.days(stage) {
            Some(_) => Ok(()),
            None => Err(ConfigurationError::StageOutOfRange {
                stage,
                len: self.ladder.len(),
            }),
        }
    }
}
