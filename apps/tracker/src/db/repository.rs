//! Repository pattern for database access.

use std::path::Path;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use rusqlite::types::Value;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};
use study_core::{
    Activities, Card, CardId, FeynmanNote, LastResult, Reflection, SessionPeriod, StudySession,
    Tags,
};

use crate::db::error::StoreError;

type Result<T> = std::result::Result<T, StoreError>;

/// Repository for card records.
pub trait CardRepository {
    fn insert_card(&self, card: &Card) -> Result<()>;
    fn get_card(&self, id: CardId) -> Result<Option<Card>>;
    fn update_schedule(&self, card: &Card) -> Result<()>;
    fn card_exists(&self, id: CardId) -> Result<bool>;
    /// Every card, in insertion order.
    fn all_cards(&self) -> Result<Vec<Card>>;
    /// Cards with `next_due <= as_of`, by due date then id.
    fn due_cards(&self, as_of: NaiveDate) -> Result<Vec<Card>>;
}

/// Repository for journal records.
pub trait JournalRepository {
    fn insert_session(&self, session: &StudySession) -> Result<i64>;
    fn sessions(&self) -> Result<Vec<StudySession>>;
    fn insert_feynman_note(&self, note: &FeynmanNote) -> Result<i64>;
    /// Newest first, at most `limit` when given.
    fn feynman_notes(&self, limit: Option<usize>) -> Result<Vec<FeynmanNote>>;
    fn insert_reflection(&self, reflection: &Reflection) -> Result<i64>;
    fn reflections(&self) -> Result<Vec<Reflection>>;
}

/// SQLite implementation of repositories.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Open database at path, creating if necessary.
    ///
    /// `busy_timeout` bounds how long a statement waits on another
    /// connection's write lock before failing with `SQLITE_BUSY`.
    pub fn open<P: AsRef<Path>>(path: P, busy_timeout: Duration) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(busy_timeout)?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let repo = Self { conn };
        repo.initialize()?;
        Ok(repo)
    }

    fn initialize(&self) -> Result<()> {
        self.conn.execute_batch(super::schema::SCHEMA)?;
        self.conn.execute_batch(super::schema::INIT_SCHEMA_VERSION)?;
        Ok(())
    }

    /// Run `f` inside an immediate write transaction.
    ///
    /// Commits only if `f` succeeds; any error rolls every statement back.
    pub fn write<T>(&self, f: impl FnOnce(&Self) -> Result<T>) -> Result<T> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<CardRow> {
        Ok(CardRow {
            id: row.get(0)?,
            question: row.get(1)?,
            answer: row.get(2)?,
            tags: row.get(3)?,
            created_at: row.get(4)?,
            stage: row.get(5)?,
            next_due: row.get(6)?,
            last_result: row.get(7)?,
        })
    }

    fn query_cards(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Card>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, Self::row_to_card)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(Card::try_from).collect()
    }
}

const CARD_COLUMNS: &str =
    "id, question, answer, tags, created_at, stage, next_due, last_result";

/// Card columns as stored, before validation.
struct CardRow {
    id: String,
    question: String,
    answer: Option<String>,
    tags: String,
    created_at: Value,
    stage: i64,
    next_due: Value,
    last_result: String,
}

impl TryFrom<CardRow> for Card {
    type Error = StoreError;

    fn try_from(row: CardRow) -> Result<Self> {
        let malformed = |reason: String| StoreError::MalformedRecord {
            table: "cards",
            key: row.id.clone(),
            reason,
        };

        let id: CardId = row
            .id
            .parse()
            .map_err(|e| malformed(format!("invalid id: {e}")))?;
        if row.question.trim().is_empty() {
            return Err(malformed("blank question".to_string()));
        }
        let stage = u32::try_from(row.stage)
            .map_err(|_| malformed(format!("invalid stage {}", row.stage)))?;
        let last_result = LastResult::from_name(&row.last_result)
            .ok_or_else(|| malformed(format!("unknown last_result {:?}", row.last_result)))?;

        Ok(Card {
            id,
            question: row.question.clone(),
            answer: row.answer.clone().filter(|a| !a.is_empty()),
            tags: Tags::parse(&row.tags),
            created_at: parse_date(&row.created_at).map_err(|r| malformed(format!("created_at: {r}")))?,
            stage,
            next_due: parse_date(&row.next_due).map_err(|r| malformed(format!("next_due: {r}")))?,
            last_result,
        })
    }
}

/// Stored form of a date: day count from the common era, 0001-01-01 being day 1.
fn day_number(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce())
}

fn parse_date(value: &Value) -> std::result::Result<NaiveDate, String> {
    match value {
        Value::Integer(n) => i32::try_from(*n)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .ok_or_else(|| format!("day number {n} out of range")),
        other => Err(format!("expected a day number, found {other:?}")),
    }
}

fn journal_date(table: &'static str, key: i64, value: &Value) -> Result<NaiveDate> {
    parse_date(value).map_err(|reason| StoreError::MalformedRecord {
        table,
        key: key.to_string(),
        reason,
    })
}

impl CardRepository for SqliteRepository {
    fn insert_card(&self, card: &Card) -> Result<()> {
        self.conn.execute(
            "INSERT INTO cards (id, question, answer, tags, created_at, stage, next_due, last_result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                card.id.to_string(),
                card.question,
                card.answer,
                card.tags.to_string(),
                day_number(card.created_at),
                card.stage,
                day_number(card.next_due),
                card.last_result.as_str(),
            ],
        )?;
        Ok(())
    }

    fn get_card(&self, id: CardId) -> Result<Option<Card>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = ?1"),
                params![id.to_string()],
                Self::row_to_card,
            )
            .optional()?;
        row.map(Card::try_from).transpose()
    }

    fn update_schedule(&self, card: &Card) -> Result<()> {
        let updated = self.conn.execute(
            "UPDATE cards SET stage = ?1, next_due = ?2, last_result = ?3 WHERE id = ?4",
            params![
                card.stage,
                day_number(card.next_due),
                card.last_result.as_str(),
                card.id.to_string(),
            ],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(card.id));
        }
        Ok(())
    }

    fn card_exists(&self, id: CardId) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM cards WHERE id = ?1",
                params![id.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn all_cards(&self) -> Result<Vec<Card>> {
        self.query_cards(&format!("SELECT {CARD_COLUMNS} FROM cards ORDER BY seq"), [])
    }

    fn due_cards(&self, as_of: NaiveDate) -> Result<Vec<Card>> {
        self.query_cards(
            &format!(
                "SELECT {CARD_COLUMNS} FROM cards WHERE next_due <= ?1 ORDER BY next_due, id"
            ),
            params![day_number(as_of)],
        )
    }
}

impl JournalRepository for SqliteRepository {
    fn insert_session(&self, session: &StudySession) -> Result<i64> {
        let a = &session.activities;
        self.conn.execute(
            "INSERT INTO study_sessions (date, period, topic, recall, new_material, practice, review, feynman, minutes, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                day_number(session.date),
                session.period.as_str(),
                session.topic,
                a.recall,
                a.new_material,
                a.practice,
                a.review,
                a.feynman,
                session.minutes,
                session.notes,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn sessions(&self) -> Result<Vec<StudySession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, date, period, topic, recall, new_material, practice, review, feynman, minutes, notes
             FROM study_sessions ORDER BY date, id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Value>(1)?,
                    row.get::<_, String>(2)?,
                    StudySession {
                        // Placeholders until date and period are validated below.
                        date: NaiveDate::MIN,
                        period: SessionPeriod::Morning,
                        topic: row.get(3)?,
                        activities: Activities {
                            recall: row.get(4)?,
                            new_material: row.get(5)?,
                            practice: row.get(6)?,
                            review: row.get(7)?,
                            feynman: row.get(8)?,
                        },
                        minutes: row.get(9)?,
                        notes: row.get(10)?,
                    },
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, date, period, session)| {
                let period = SessionPeriod::from_name(&period).ok_or_else(|| {
                    StoreError::MalformedRecord {
                        table: "study_sessions",
                        key: id.to_string(),
                        reason: format!("unknown period {period:?}"),
                    }
                })?;
                Ok(StudySession {
                    date: journal_date("study_sessions", id, &date)?,
                    period,
                    ..session
                })
            })
            .collect()
    }

    fn insert_feynman_note(&self, note: &FeynmanNote) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO feynman_notes (date, concept, explanation, analogy, clarity)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                day_number(note.date),
                note.concept,
                note.explanation,
                note.analogy,
                note.clarity,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn feynman_notes(&self, limit: Option<usize>) -> Result<Vec<FeynmanNote>> {
        // A negative LIMIT means no limit in SQLite.
        let limit = limit.map_or(-1, |n| i64::try_from(n).unwrap_or(i64::MAX));
        let mut stmt = self.conn.prepare(
            "SELECT id, date, concept, explanation, analogy, clarity
             FROM feynman_notes ORDER BY date DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Value>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u8>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, date, concept, explanation, analogy, clarity)| {
                Ok(FeynmanNote {
                    date: journal_date("feynman_notes", id, &date)?,
                    concept,
                    explanation,
                    analogy,
                    clarity,
                })
            })
            .collect()
    }

    fn insert_reflection(&self, reflection: &Reflection) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO reflections (week_start, understood, confused, next_plan, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                day_number(reflection.week_start),
                reflection.understood,
                reflection.confused,
                reflection.next_plan,
                day_number(reflection.created_at),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn reflections(&self) -> Result<Vec<Reflection>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, week_start, understood, confused, next_plan, created_at
             FROM reflections ORDER BY week_start DESC, id DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, Value>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, Value>(5)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, week_start, understood, confused, next_plan, created_at)| {
                Ok(Reflection {
                    week_start: journal_date("reflections", id, &week_start)?,
                    understood,
                    confused,
                    next_plan,
                    created_at: journal_date("reflections", id, &created_at)?,
                })
            })
            .collect()
    }
}
