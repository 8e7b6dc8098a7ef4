//! Card store: owns the card collection and applies scheduler results.
//!
//! Every operation takes the store lock under a bounded wait, and every
//! mutation runs in a single write transaction, so a caller sees either the
//! state before a call or the state after it.

use std::collections::HashSet;
use std::time::Duration;

use chrono::NaiveDate;
use study_core::{Card, CardId, ReviewOutcome, Scheduler, Tags, ValidationError};
use tokio::sync::{Mutex, MutexGuard};

use crate::db::{CardRepository, SqliteRepository, StoreError};

type Result<T> = std::result::Result<T, StoreError>;

pub struct CardStore {
    repo: Mutex<SqliteRepository>,
    scheduler: Scheduler,
    lock_timeout: Duration,
}

impl CardStore {
    /// Wrap a repository, checking every stored card against the ladder.
    ///
    /// Fails with a configuration error when the ladder has shrunk below a
    /// stage some card already reached, and with `MalformedRecord` when a
    /// stored card does not parse.
    pub fn open(repo: SqliteRepository, scheduler: Scheduler, lock_timeout: Duration) -> Result<Self> {
        for card in repo.all_cards()? {
            scheduler.check_stage(card.stage)?;
        }
        Ok(Self {
            repo: Mutex::new(repo),
            scheduler,
            lock_timeout,
        })
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    async fn lock(&self) -> Result<MutexGuard<'_, SqliteRepository>> {
        tokio::time::timeout(self.lock_timeout, self.repo.lock())
            .await
            .map_err(|_| {
                StoreError::Concurrency(format!(
                    "card store lock not acquired within {:?}",
                    self.lock_timeout
                ))
            })
    }

    /// Add a card due today at stage 0.
    pub async fn create(
        &self,
        question: &str,
        answer: Option<&str>,
        tags: Tags,
        today: NaiveDate,
    ) -> Result<Card> {
        let card = Card::new(CardId::new(), question, answer, tags, today)?;
        let repo = self.lock().await?;
        repo.write(|r| r.insert_card(&card))?;
        Ok(card)
    }

    pub async fn get(&self, id: CardId) -> Result<Card> {
        let repo = self.lock().await?;
        repo.get_card(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Record a review outcome and reschedule the card.
    pub async fn review(&self, id: CardId, outcome: ReviewOutcome, today: NaiveDate) -> Result<Card> {
        let repo = self.lock().await?;
        repo.write(|r| {
            let mut card = r.get_card(id)?.ok_or(StoreError::NotFound(id))?;
            let result = self.scheduler.advance(card.stage, outcome, today)?;
            card.apply(result);
            r.update_schedule(&card)?;
            Ok(card)
        })
    }

    /// Cards due on or before `as_of`, earliest first, ties by id.
    pub async fn due_as_of(&self, as_of: NaiveDate) -> Result<Vec<Card>> {
        let repo = self.lock().await?;
        repo.due_cards(as_of)
    }

    /// The card a study session should show next.
    pub async fn next_due(&self, as_of: NaiveDate) -> Result<Option<Card>> {
        Ok(self.due_as_of(as_of).await?.into_iter().next())
    }

    /// Every card, in insertion order.
    pub async fn all(&self) -> Result<Vec<Card>> {
        let repo = self.lock().await?;
        repo.all_cards()
    }

    /// Insert a batch of existing cards. All or nothing.
    pub async fn import(&self, cards: Vec<Card>) -> Result<usize> {
        let mut seen = HashSet::with_capacity(cards.len());
        let last_stage = self.scheduler.ladder().last_stage();
        for card in &cards {
            if card.stage > last_stage {
                return Err(ValidationError::OutOfRange {
                    field: "stage",
                    value: i64::from(card.stage),
                    min: 0,
                    max: i64::from(last_stage),
                }
                .into());
            }
            if !seen.insert(card.id) {
                return Err(StoreError::DuplicateCard(card.id));
            }
        }

        let repo = self.lock().await?;
        repo.write(|r| {
            for card in &cards {
                if r.card_exists(card.id)? {
                    return Err(StoreError::DuplicateCard(card.id));
                }
                r.insert_card(card)?;
            }
            Ok(cards.len())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use pretty_assertions::assert_eq;
    use study_core::{IntervalLadder, LastResult};

    fn day(n: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap() + Days::new(n)
    }

    fn store() -> CardStore {
        CardStore::open(
            SqliteRepository::open_in_memory().unwrap(),
            Scheduler::default(),
            Duration::from_millis(200),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_round_trip() {
        let store = store();
        let card = store
            .create("What is TCP?", Some("A transport protocol"), Tags::parse("net"), day(0))
            .await
            .unwrap();
        assert_eq!(card.stage, 0);
        assert_eq!(card.next_due, day(0));
        assert_eq!(card.last_result, LastResult::None);
        assert_eq!(store.get(card.id).await.unwrap(), card);
    }

    #[tokio::test]
    async fn blank_question_leaves_store_unchanged() {
        let store = store();
        store.create("Q", None, Tags::default(), day(0)).await.unwrap();
        let err = store.create("", None, Tags::default(), day(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn review_scenario_remembered_then_forgotten() {
        let store = store();
        let card = store.create("Q", None, Tags::default(), day(0)).await.unwrap();

        let card = store.review(card.id, ReviewOutcome::Remembered, day(0)).await.unwrap();
        assert_eq!((card.stage, card.next_due), (1, day(3)));
        assert_eq!(card.last_result, LastResult::Remembered);

        let card = store.review(card.id, ReviewOutcome::Forgotten, day(3)).await.unwrap();
        assert_eq!((card.stage, card.next_due), (0, day(4)));
        assert_eq!(card.last_result, LastResult::Forgotten);

        assert_eq!(store.get(card.id).await.unwrap(), card);
    }

    #[tokio::test]
    async fn review_unknown_card_is_not_found() {
        let store = store();
        store.create("Q", None, Tags::default(), day(0)).await.unwrap();
        let before = store.all().await.unwrap();

        let missing = CardId::new();
        let err = store
            .review(missing, ReviewOutcome::Remembered, day(0))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == missing));
        assert_eq!(store.all().await.unwrap(), before);
    }

    #[tokio::test]
    async fn due_as_of_filters_and_orders() {
        let store = store();
        let mut cards = Vec::new();
        for (question, due) in [("later", day(3)), ("yesterday", day(0)), ("today", day(1))] {
            let mut card = Card::new(CardId::new(), question, None, Tags::default(), day(0)).unwrap();
            card.next_due = due;
            cards.push(card);
        }
        store.import(cards).await.unwrap();

        let due = store.due_as_of(day(1)).await.unwrap();
        let questions: Vec<&str> = due.iter().map(|c| c.question.as_str()).collect();
        assert_eq!(questions, vec!["yesterday", "today"]);
        assert_eq!(store.due_as_of(day(1)).await.unwrap(), due);
        assert_eq!(
            store.next_due(day(1)).await.unwrap().map(|c| c.question),
            Some("yesterday".to_string())
        );
        assert_eq!(store.next_due(day(0) - Days::new(1)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn far_future_card_is_not_due_today() {
        let store = store();
        let mut future = Card::new(CardId::new(), "future", None, Tags::default(), day(0)).unwrap();
        future.next_due = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap();
        let normal = Card::new(CardId::new(), "normal", None, Tags::default(), day(0)).unwrap();
        store.import(vec![future.clone(), normal.clone()]).await.unwrap();

        assert_eq!(store.due_as_of(day(0)).await.unwrap(), vec![normal.clone()]);
        assert_eq!(
            store.due_as_of(future.next_due).await.unwrap(),
            vec![normal, future]
        );
    }

    #[tokio::test]
    async fn list_tag_with_comma_survives_round_trip() {
        let store = store();
        let created = store
            .create("Q", None, Tags::from(vec!["sql, joins".to_string()]), day(0))
            .await
            .unwrap();
        assert_eq!(created.tags, Tags::parse("joins,sql"));
        assert_eq!(store.get(created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn import_is_all_or_nothing() {
        let store = store();
        let existing = store.create("Q", None, Tags::default(), day(0)).await.unwrap();
        let fresh = Card::new(CardId::new(), "fresh", None, Tags::default(), day(0)).unwrap();

        let err = store.import(vec![fresh.clone(), existing.clone()]).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCard(id) if id == existing.id));
        assert_eq!(store.all().await.unwrap(), vec![existing.clone()]);

        let err = store.import(vec![fresh.clone(), fresh.clone()]).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateCard(_)));

        let mut too_high = fresh.clone();
        too_high.stage = 9;
        let err = store.import(vec![too_high]).await.unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        assert_eq!(store.import(vec![fresh]).await.unwrap(), 1);
        assert_eq!(store.all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn open_rejects_stage_beyond_ladder() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        let mut card = Card::new(CardId::new(), "Q", None, Tags::default(), day(0)).unwrap();
        card.stage = 4;
        repo.insert_card(&card).unwrap();

        let short = Scheduler::new(IntervalLadder::new(vec![1, 2]).unwrap());
        let err = CardStore::open(repo, short, Duration::from_millis(50)).err().unwrap();
        assert!(matches!(err, StoreError::Configuration(_)));
    }

    #[tokio::test]
    async fn held_lock_times_out_with_concurrency_error() {
        let store = CardStore::open(
            SqliteRepository::open_in_memory().unwrap(),
            Scheduler::default(),
            Duration::from_millis(20),
        )
        .unwrap();
        let _guard = store.repo.lock().await;
        let err = store.create("Q", None, Tags::default(), day(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));
    }

    #[tokio::test]
    async fn other_writer_on_same_file_yields_concurrency_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracker.db");
        let store = CardStore::open(
            SqliteRepository::open(&path, Duration::from_millis(20)).unwrap(),
            Scheduler::default(),
            Duration::from_millis(200),
        )
        .unwrap();

        let other = rusqlite::Connection::open(&path).unwrap();
        other.execute_batch("BEGIN IMMEDIATE").unwrap();

        let err = store.create("Q", None, Tags::default(), day(0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Concurrency(_)));

        other.execute_batch("ROLLBACK").unwrap();
        store.create("Q", None, Tags::default(), day(0)).await.unwrap();
        assert_eq!(store.all().await.unwrap().len(), 1);
    }
}
