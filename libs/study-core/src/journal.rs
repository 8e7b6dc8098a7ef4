//! Journal records kept alongside the cards: study sessions, Feynman notes
//! and weekly reflections.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest session the journal accepts, in minutes.
pub const MAX_SESSION_MINUTES: u32 = 240;

/// Feynman clarity is self-rated on a 1-5 scale.
pub const CLARITY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Part of the day a session happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPeriod {
    Morning,
    Afternoon,
}

impl SessionPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "morning" => Some(Self::Morning),
            "afternoon" => Some(Self::Afternoon),
            _ => None,
        }
    }
}

/// Which techniques a session covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Activities {
    pub recall: bool,
    pub new_material: bool,
    pub practice: bool,
    pub review: bool,
    pub feynman: bool,
}

/// One logged study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudySession {
    pub date: NaiveDate,
    pub period: SessionPeriod,
    pub topic: String,
    #[serde(default)]
    pub activities: Activities,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub notes: String,
}

impl StudySession {
    /// Trim text fields and check the session is loggable.
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.topic = self.topic.trim().to_string();
        self.notes = self.notes.trim().to_string();
        if self.topic.is_empty() {
            return Err(ValidationError::BlankField("topic"));
        }
        if self.minutes > MAX_SESSION_MINUTES {
            return Err(ValidationError::OutOfRange {
                field: "minutes",
                value: i64::from(self.minutes),
                min: 0,
                max: i64::from(MAX_SESSION_MINUTES),
            });
        }
        Ok(self)
    }
}

/// A concept explained in plain words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeynmanNote {
    pub date: NaiveDate,
    pub concept: String,
    pub explanation: String,
    #[serde(default)]
    pub analogy: String,
    pub clarity: u8,
}

impl FeynmanNote {
    pub fn validated(mut self) -> Result<Self, ValidationError> {
        self.concept = self.concept.trim().to_string();
        self.explanation = self.explanation.trim().to_string();
        self.analogy = self.analogy.trim().to_string();
        if self.concept.is_empty() {
            return Err(ValidationError::BlankField("concept"));
        }
        if self.explanation.is_empty() {
            return Err(ValidationError::BlankField("explanation"));
        }
        if !CLARITY_RANGE.contains(&self.clarity) {
            return Err(ValidationError::OutOfRange {
                field: "clarity",
                value: i64::from(self.clarity),
                min: i64::from(*CLARITY_RANGE.start()),
                max: i64::from(*CLARITY_RANGE.end()),
            });
        }
        Ok(self)
    }
}

/// End-of-week reflection. Every text field may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reflection {
    pub week_start: NaiveDate,
    #[serde(default)]
    pub understood: String,
    #[serde(default)]
    pub confused: String,
    #[serde(default)]
    pub next_plan: String,
    pub created_at: NaiveDate,
}

impl Reflection {
    pub fn trimmed(self) -> Self {
        Self {
            understood: self.understood.trim().to_string(),
            confused: self.confused.trim().to_string(),
            next_plan: self.next_plan.trim().to_string(),
            ..self
        }
    }
}
