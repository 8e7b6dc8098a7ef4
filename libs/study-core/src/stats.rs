//! Analytics over cards and journal records.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::journal::StudySession;
use crate::types::Card;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total_sessions: usize,
    pub total_cards: usize,
    pub due_today: usize,
    pub streak_days: usize,
}

impl Summary {
    pub fn compute(sessions: &[StudySession], cards: &[Card], today: NaiveDate) -> Self {
        Self {
            total_sessions: sessions.len(),
            total_cards: cards.len(),
            due_today: cards.iter().filter(|c| c.is_due(today)).count(),
            streak_days: streak(sessions.iter().map(|s| s.date), today),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayMinutes {
    pub date: NaiveDate,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicMinutes {
    pub topic: String,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageCount {
    pub stage: u32,
    pub cards: usize,
}

/// Consecutive days ending at `today` with at least one session.
///
/// A day without a session today means no streak.
pub fn streak<I>(session_dates: I, today: NaiveDate) -> usize
where
    I: IntoIterator<Item = NaiveDate>,
{
    let days: HashSet<NaiveDate> = session_dates.into_iter().collect();
    let mut count = 0;
    let mut day = Some(today);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        count += 1;
        day = d.pred_opt();
    }
    count
}

/// Total minutes per day, oldest first.
pub fn minutes_per_day(sessions: &[StudySession]) -> Vec<DayMinutes> {
    let mut by_day: BTreeMap<NaiveDate, u32> = BTreeMap::new();
    for s in sessions {
        *by_day.entry(s.date).or_default() += s.minutes;
    }
    by_day
        .into_iter()
        .map(|(date, minutes)| DayMinutes { date, minutes })
        .collect()
}

/// Total minutes per topic, largest first.
pub fn minutes_per_topic(sessions: &[StudySession]) -> Vec<TopicMinutes> {
    let mut by_topic: HashMap<&str, u32> = HashMap::new();
    for s in sessions {
        *by_topic.entry(s.topic.as_str()).or_default() += s.minutes;
    }
    let mut topics: Vec<TopicMinutes> = by_topic
        .into_iter()
        .map(|(topic, minutes)| TopicMinutes {
            topic: topic.to_string(),
            minutes,
        })
        .collect();
    topics.sort_by(|a, b| b.minutes.cmp(&a.minutes).then_with(|| a.topic.cmp(&b.topic)));
    topics
}

/// Number of cards sitting at each stage, lowest stage first.
pub fn stage_histogram(cards: &[Card]) -> Vec<StageCount> {
    let mut by_stage: BTreeMap<u32, usize> = BTreeMap::new();
    for c in cards {
        *by_stage.entry(c.stage).or_default() += 1;
    }
    by_stage
        .into_iter()
        .map(|(stage, cards)| StageCount { stage, cards })
        .collect()
}

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}
