//! CSV import/export in the dashboard's file layouts:
//!
//! - `cards.csv`: `id,question,answer,tags,created_at,stage,next_due,last_result`
//! - `sessions.csv`: `date,session,topic,recall_done,new_study_done,practice_done,review_done,feynman_done,minutes,notes`
//! - `feynman_notes.csv`: `date,concept,explanation,analogy,clarity_rating`
//! - `reflections.csv`: `week_start,understand,confused,next_plan,created_at`
//!
//! Older exports wrote `last_result` as `ingat` (remembered), `lupa`
//! (forgotten) or an empty cell, the session period as `Pagi`/`Sore`,
//! booleans as `True`/`False`, and sometimes numbers as floats.

use std::io::{Read, Write};

use chrono::NaiveDate;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use study_core::{
    Activities, Card, CardId, FeynmanNote, LastResult, Reflection, SessionPeriod, StudySession,
    Tags,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("record {record}: {reason}")]
    Record { record: usize, reason: String },
}

type Result<T> = std::result::Result<T, ImportError>;

/// One `cards.csv` row, as text.
#[derive(Debug, Serialize, Deserialize)]
struct CardRecord {
    id: String,
    question: String,
    #[serde(default)]
    answer: String,
    #[serde(default)]
    tags: String,
    created_at: String,
    stage: String,
    next_due: String,
    #[serde(default)]
    last_result: String,
}

impl CardRecord {
    fn into_card(self, record: usize) -> Result<Card> {
        let fail = |reason: String| ImportError::Record { record, reason };

        let id: CardId = self
            .id
            .parse()
            .map_err(|e| fail(format!("invalid id {:?}: {e}", self.id)))?;
        let question = self.question.trim();
        if question.is_empty() {
            return Err(fail("question must not be blank".to_string()));
        }
        let answer = Some(self.answer.trim()).filter(|a| !a.is_empty());

        Ok(Card {
            id,
            question: question.to_string(),
            answer: answer.map(str::to_string),
            tags: Tags::parse(&self.tags),
            created_at: parse_date("created_at", &self.created_at).map_err(fail)?,
            stage: parse_count("stage", &self.stage).map_err(fail)?,
            next_due: parse_date("next_due", &self.next_due).map_err(fail)?,
            last_result: parse_last_result(&self.last_result).map_err(fail)?,
        })
    }

    fn from_card(card: &Card) -> Self {
        Self {
            id: card.id.to_string(),
            question: card.question.clone(),
            answer: card.answer.clone().unwrap_or_default(),
            tags: card.tags.to_string(),
            created_at: date_text(card.created_at),
            stage: card.stage.to_string(),
            next_due: date_text(card.next_due),
            last_result: card.last_result.as_str().to_string(),
        }
    }
}

/// One `sessions.csv` row, as text.
#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    date: String,
    session: String,
    topic: String,
    #[serde(default)]
    recall_done: String,
    #[serde(default)]
    new_study_done: String,
    #[serde(default)]
    practice_done: String,
    #[serde(default)]
    review_done: String,
    #[serde(default)]
    feynman_done: String,
    #[serde(default)]
    minutes: String,
    #[serde(default)]
    notes: String,
}

impl SessionRecord {
    fn into_session(self, record: usize) -> Result<StudySession> {
        let fail = |reason: String| ImportError::Record { record, reason };

        let minutes = if self.minutes.trim().is_empty() {
            0
        } else {
            parse_count("minutes", &self.minutes).map_err(fail)?
        };

        Ok(StudySession {
            date: parse_date("date", &self.date).map_err(fail)?,
            period: parse_period(&self.session).map_err(fail)?,
            topic: self.topic,
            activities: Activities {
                recall: parse_flag("recall_done", &self.recall_done).map_err(fail)?,
                new_material: parse_flag("new_study_done", &self.new_study_done).map_err(fail)?,
                practice: parse_flag("practice_done", &self.practice_done).map_err(fail)?,
                review: parse_flag("review_done", &self.review_done).map_err(fail)?,
                feynman: parse_flag("feynman_done", &self.feynman_done).map_err(fail)?,
            },
            minutes,
            notes: self.notes,
        })
    }

    fn from_session(session: &StudySession) -> Self {
        let a = &session.activities;
        Self {
            date: date_text(session.date),
            session: session.period.as_str().to_string(),
            topic: session.topic.clone(),
            recall_done: a.recall.to_string(),
            new_study_done: a.new_material.to_string(),
            practice_done: a.practice.to_string(),
            review_done: a.review.to_string(),
            feynman_done: a.feynman.to_string(),
            minutes: session.minutes.to_string(),
            notes: session.notes.clone(),
        }
    }
}

/// One `feynman_notes.csv` row, as text.
#[derive(Debug, Serialize, Deserialize)]
struct FeynmanRecord {
    date: String,
    concept: String,
    explanation: String,
    #[serde(default)]
    analogy: String,
    clarity_rating: String,
}

impl FeynmanRecord {
    fn into_note(self, record: usize) -> Result<FeynmanNote> {
        let fail = |reason: String| ImportError::Record { record, reason };

        let clarity = parse_count("clarity_rating", &self.clarity_rating).map_err(fail)?;
        let clarity = u8::try_from(clarity)
            .map_err(|_| fail(format!("invalid clarity_rating {:?}", self.clarity_rating)))?;

        Ok(FeynmanNote {
            date: parse_date("date", &self.date).map_err(fail)?,
            concept: self.concept,
            explanation: self.explanation,
            analogy: self.analogy,
            clarity,
        })
    }

    fn from_note(note: &FeynmanNote) -> Self {
        Self {
            date: date_text(note.date),
            concept: note.concept.clone(),
            explanation: note.explanation.clone(),
            analogy: note.analogy.clone(),
            clarity_rating: note.clarity.to_string(),
        }
    }
}

/// One `reflections.csv` row, as text.
#[derive(Debug, Serialize, Deserialize)]
struct ReflectionRecord {
    week_start: String,
    #[serde(default)]
    understand: String,
    #[serde(default)]
    confused: String,
    #[serde(default)]
    next_plan: String,
    created_at: String,
}

impl ReflectionRecord {
    fn into_reflection(self, record: usize) -> Result<Reflection> {
        let fail = |reason: String| ImportError::Record { record, reason };

        Ok(Reflection {
            week_start: parse_date("week_start", &self.week_start).map_err(fail)?,
            understood: self.understand,
            confused: self.confused,
            next_plan: self.next_plan,
            created_at: parse_date("created_at", &self.created_at).map_err(fail)?,
        })
    }

    fn from_reflection(reflection: &Reflection) -> Self {
        Self {
            week_start: date_text(reflection.week_start),
            understand: reflection.understood.clone(),
            confused: reflection.confused.clone(),
            next_plan: reflection.next_plan.clone(),
            created_at: date_text(reflection.created_at),
        }
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(field: &str, text: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid {field} {text:?}: {e}"))
}

/// Non-negative whole number, also accepting the `2.0` form.
fn parse_count(field: &str, text: &str) -> std::result::Result<u32, String> {
    let text = text.trim();
    if let Ok(n) = text.parse::<u32>() {
        return Ok(n);
    }
    match text.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(f as u32),
        _ => Err(format!("invalid {field} {text:?}")),
    }
}

fn parse_flag(field: &str, text: &str) -> std::result::Result<bool, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" => Ok(true),
        other => Err(format!("invalid {field} {other:?}")),
    }
}

fn parse_period(text: &str) -> std::result::Result<SessionPeriod, String> {
    match text.trim().to_ascii_lowercase().as_str() {
        "pagi" => Ok(SessionPeriod::Morning),
        "sore" => Ok(SessionPeriod::Afternoon),
        other => SessionPeriod::from_name(other).ok_or_else(|| format!("unknown session {other:?}")),
    }
}

fn parse_last_result(text: &str) -> std::result::Result<LastResult, String> {
    match text.trim() {
        "" | "none" => Ok(LastResult::None),
        "ingat" => Ok(LastResult::Remembered),
        "lupa" => Ok(LastResult::Forgotten),
        other => LastResult::from_name(other).ok_or_else(|| format!("unknown last_result {other:?}")),
    }
}

/// Parse every row; the first bad row fails the whole read.
fn read_records<R, T, U>(reader: R, convert: impl Fn(T, usize) -> Result<U>) -> Result<Vec<U>>
where
    R: Read,
    T: DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    reader
        .deserialize::<T>()
        .enumerate()
        .map(|(i, row)| convert(row?, i + 1))
        .collect()
}

fn write_records<W: Write, T: Serialize>(
    writer: W,
    records: impl IntoIterator<Item = T>,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn read_cards<R: Read>(reader: R) -> Result<Vec<Card>> {
    read_records(reader, CardRecord::into_card)
}

pub fn write_cards<W: Write>(writer: W, cards: &[Card]) -> Result<()> {
    write_records(writer, cards.iter().map(CardRecord::from_card))
}

pub fn read_sessions<R: Read>(reader: R) -> Result<Vec<StudySession>> {
    read_records(reader, SessionRecord::into_session)
}

pub fn write_sessions<W: Write>(writer: W, sessions: &[StudySession]) -> Result<()> {
    write_records(writer, sessions.iter().map(SessionRecord::from_session))
}

pub fn read_feynman_notes<R: Read>(reader: R) -> Result<Vec<FeynmanNote>> {
    read_records(reader, FeynmanRecord::into_note)
}

pub fn write_feynman_notes<W: Write>(writer: W, notes: &[FeynmanNote]) -> Result<()> {
    write_records(writer, notes.iter().map(FeynmanRecord::from_note))
}

pub fn read_reflections<R: Read>(reader: R) -> Result<Vec<Reflection>> {
    read_records(reader, ReflectionRecord::into_reflection)
}

pub fn write_reflections<W: Write>(writer: W, reflections: &[Reflection]) -> Result<()> {
    write_records(writer, reflections.iter().map(ReflectionRecord::from_reflection))
}
