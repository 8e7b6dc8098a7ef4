//! Test fixtures and factory functions for request bodies.

use chrono::{Days, NaiveDate};
use serde_json::json;

/// `day(0)` is a Monday.
pub fn day(n: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Days::new(n)
}

pub fn date_str(n: u64) -> String {
    day(n).format("%Y-%m-%d").to_string()
}

pub fn create_card_request(question: &str) -> serde_json::Value {
    json!({ "question": question, "answer": "answer", "tags": "db, sql" })
}

pub fn review_request(outcome: &str) -> serde_json::Value {
    json!({ "outcome": outcome })
}

pub fn session_request(topic: &str, minutes: u32, date: Option<u64>) -> serde_json::Value {
    json!({
        "date": date.map(date_str),
        "period": "morning",
        "topic": topic,
        "activities": { "recall": true, "review": true },
        "minutes": minutes,
        "notes": "",
    })
}

pub fn feynman_request(concept: &str, clarity: u8) -> serde_json::Value {
    json!({
        "concept": concept,
        "explanation": "Explained like to a twelve year old.",
        "analogy": "A student number at school",
        "clarity": clarity,
    })
}

/// Legacy `cards.csv` with the given `(question, next_due day, stage)` rows.
pub fn cards_csv(rows: &[(&str, u64, u32)]) -> String {
    let mut csv = String::from("id,question,answer,tags,created_at,stage,next_due,last_result\n");
    for (question, due, stage) in rows {
        csv.push_str(&format!(
            "{},{},,,{},{},{},\n",
            uuid::Uuid::new_v4(),
            question,
            date_str(0),
            stage,
            date_str(*due),
        ));
    }
    csv
}
