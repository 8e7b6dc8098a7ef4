//! Core types for the study tracker.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::scheduler::SchedulingResult;

/// Opaque card identifier, assigned once at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(Uuid);

impl CardId {
    /// Fresh random id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CardId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for CardId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// Outcome of a single review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewOutcome {
    Remembered,
    Forgotten,
}

/// Outcome of the most recent review, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LastResult {
    #[default]
    None,
    Remembered,
    Forgotten,
}

impl LastResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Remembered => "remembered",
            Self::Forgotten => "forgotten",
        }
    }

    /// Parse the stored name.
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "remembered" => Some(Self::Remembered),
            "forgotten" => Some(Self::Forgotten),
            _ => None,
        }
    }
}

impl From<ReviewOutcome> for LastResult {
    fn from(outcome: ReviewOutcome) -> Self {
        match outcome {
            ReviewOutcome::Remembered => Self::Remembered,
            ReviewOutcome::Forgotten => Self::Forgotten,
        }
    }
}

/// Free-form labels. Order and duplicates are insignificant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Tags(BTreeSet<String>);

impl Tags {
    /// Split comma-delimited text into a tag set, dropping blanks.
    pub fn parse(text: &str) -> Self {
        std::iter::once(text).collect()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Each item may itself hold several comma-separated labels. A label never
/// contains a comma, so the delimited form always parses back to the same set.
impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tags = BTreeSet::new();
        for item in iter {
            tags.extend(
                item.as_ref()
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
            );
        }
        Self(tags)
    }
}

impl From<Vec<String>> for Tags {
    fn from(tags: Vec<String>) -> Self {
        tags.into_iter().collect()
    }
}

impl From<Tags> for Vec<String> {
    fn from(tags: Tags) -> Self {
        tags.0.into_iter().collect()
    }
}

/// Delimited form used for storage: `"a, b, c"`.
impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = self.iter().collect();
        f.write_str(&parts.join(", "))
    }
}

/// A recall prompt under spaced repetition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub tags: Tags,
    pub created_at: NaiveDate,
    pub stage: u32,
    pub next_due: NaiveDate,
    pub last_result: LastResult,
}

impl Card {
    /// Build a new card due today at stage 0.
    pub fn new(
        id: CardId,
        question: &str,
        answer: Option<&str>,
        tags: Tags,
        today: NaiveDate,
    ) -> Result<Self, ValidationError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::BlankField("question"));
        }
        let answer = answer
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string);

        Ok(Self {
            id,
            question: question.to_string(),
            answer,
            tags,
            created_at: today,
            stage: 0,
            next_due: today,
            last_result: LastResult::None,
        })
    }

    /// Overwrite the scheduling fields with a scheduler result.
    pub fn apply(&mut self, result: SchedulingResult) {
        self.stage = result.stage;
        self.next_due = result.next_due;
        self.last_result = result.last_result;
    }

    pub fn is_due(&self, as_of: NaiveDate) -> bool {
        self.next_due <= as_of
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn new_card_starts_due_today() {
        let card = Card::new(
            CardId::new(),
            "  What is a primary key? ",
            Some("  "),
            Tags::parse("db"),
            today(),
        )
        .unwrap();
        assert_eq!(card.question, "What is a primary key?");
        assert_eq!(card.answer, None);
        assert_eq!(card.stage, 0);
        assert_eq!(card.created_at, today());
        assert_eq!(card.next_due, today());
        assert_eq!(card.last_result, LastResult::None);
        assert!(card.is_due(today()));
    }

    #[test]
    fn blank_question_rejected() {
        let err = Card::new(CardId::new(), " \n\t", None, Tags::default(), today()).unwrap_err();
        assert_eq!(err, ValidationError::BlankField("question"));
    }

    #[test]
    fn tags_are_a_set() {
        let tags = Tags::parse("net, db,net , ,  os");
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["db", "net", "os"]);
        assert_eq!(tags.to_string(), "db, net, os");
        assert_eq!(Tags::parse(&tags.to_string()), tags);
        assert!(Tags::parse("").is_empty());
    }

    #[test]
    fn list_items_are_split_on_commas() {
        let tags = Tags::from(vec!["sql, joins".to_string(), "db".to_string()]);
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec!["db", "joins", "sql"]);
        assert_eq!(Tags::parse(&tags.to_string()), tags);
    }

    #[test]
    fn last_result_names() {
        for result in [LastResult::None, LastResult::Remembered, LastResult::Forgotten] {
            assert_eq!(LastResult::from_name(result.as_str()), Some(result));
        }
        assert_eq!(LastResult::from_name("ingat"), None);
    }

    #[test]
    fn card_id_text_round_trip() {
        let id = CardId::new();
        assert_eq!(id.to_string().parse::<CardId>().unwrap(), id);
        assert!("not-a-uuid".parse::<CardId>().is_err());
    }

    #[test]
    fn card_id_order_matches_text_order() {
        let mut ids: Vec<CardId> = (0..32).map(|_| CardId::new()).collect();
        let mut by_text = ids.clone();
        ids.sort();
        by_text.sort_by_key(|id| id.to_string());
        assert_eq!(ids, by_text);
    }

    #[test]
    fn card_json_shape() {
        let card = Card::new(CardId::new(), "Q", Some("A"), Tags::parse("b,a"), today()).unwrap();
        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(value["last_result"], "none");
        assert_eq!(value["next_due"], "2024-03-04");
    }
}
