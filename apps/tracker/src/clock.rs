//! Source of "today" for the HTTP layer.
//!
//! The store and scheduler never read the wall clock themselves; handlers
//! ask the injected clock and pass the date down.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Timelike};

pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date, honouring a daily reset hour.
///
/// Before `daily_reset_hour` the study day is still "yesterday", so late-night
/// reviews count towards the day they started on.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock {
    pub daily_reset_hour: u32,
}

impl SystemClock {
    /// The study day that local time `now` falls in.
    pub fn study_day(&self, now: NaiveDateTime) -> NaiveDate {
        if now.hour() < self.daily_reset_hour {
            (now - Duration::days(1)).date()
        } else {
            now.date()
        }
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        self.study_day(Local::now().naive_local())
    }
}

/// Always returns the same date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
