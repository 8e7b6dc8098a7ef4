//! Request and response bodies for the HTTP API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use study_core::{Activities, IntervalLadder, ReviewOutcome, SessionPeriod, Tags};

/// Tags arrive either as a list or as comma-separated text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Text(String),
}

impl Default for TagsInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<TagsInput> for Tags {
    fn from(input: TagsInput) -> Self {
        match input {
            TagsInput::List(list) => list.into(),
            TagsInput::Text(text) => Tags::parse(&text),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub tags: TagsInput,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub outcome: ReviewOutcome,
}

/// `?as_of=YYYY-MM-DD`, defaulting to today.
#[derive(Debug, Deserialize)]
pub struct AsOfQuery {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SchedulerResponse {
    pub ladder: IntervalLadder,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImportResponse {
    pub imported: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub date: Option<NaiveDate>,
    pub period: SessionPeriod,
    pub topic: String,
    #[serde(default)]
    pub activities: Activities,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateFeynmanRequest {
    pub date: Option<NaiveDate>,
    pub concept: String,
    pub explanation: String,
    #[serde(default)]
    pub analogy: String,
    pub clarity: u8,
}

#[derive(Debug, Deserialize)]
pub struct CreateReflectionRequest {
    pub week_start: Option<NaiveDate>,
    #[serde(default)]
    pub understood: String,
    #[serde(default)]
    pub confused: String,
    #[serde(default)]
    pub next_plan: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_accept_list_or_text() {
        let list: CreateCardRequest =
            serde_json::from_str(r#"{"question":"Q","tags":["b","a","b"]}"#).unwrap();
        assert_eq!(Tags::from(list.tags), Tags::parse("a,b"));

        let text: CreateCardRequest =
            serde_json::from_str(r#"{"question":"Q","tags":"net, os"}"#).unwrap();
        assert_eq!(Tags::from(text.tags), Tags::parse("os,net"));

        let none: CreateCardRequest = serde_json::from_str(r#"{"question":"Q"}"#).unwrap();
        assert!(Tags::from(none.tags).is_empty());
    }

    #[test]
    fn review_outcome_names() {
        let req: ReviewRequest = serde_json::from_str(r#"{"outcome":"forgotten"}"#).unwrap();
        assert_eq!(req.outcome, ReviewOutcome::Forgotten);
        assert!(serde_json::from_str::<ReviewRequest>(r#"{"outcome":"ingat"}"#).is_err());
    }
}
