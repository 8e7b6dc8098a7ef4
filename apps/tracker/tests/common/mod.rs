//! Common test utilities for integration tests.
//!
//! Every context runs against fresh in-memory databases and a settable clock,
//! so tests need no external services.

#![allow(dead_code)]

pub mod fixtures;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum_test::TestServer;
use chrono::NaiveDate;
use study_core::{IntervalLadder, Scheduler};

use study_tracker::clock::Clock;
use study_tracker::db::SqliteRepository;
use study_tracker::journal::Journal;
use study_tracker::store::CardStore;
use study_tracker::{app, AppState};

/// Clock the test can move forward.
#[derive(Clone)]
pub struct TestClock(Arc<Mutex<NaiveDate>>);

impl TestClock {
    pub fn set(&self, date: NaiveDate) {
        *self.0.lock().unwrap() = date;
    }
}

impl Clock for TestClock {
    fn today(&self) -> NaiveDate {
        *self.0.lock().unwrap()
    }
}

pub struct TestContext {
    pub clock: TestClock,
    app: Router,
}

impl TestContext {
    /// Context with the default ladder, starting on [`fixtures::day`]`(0)`.
    pub fn new() -> Self {
        Self::with_ladder(IntervalLadder::default())
    }

    pub fn with_ladder(ladder: IntervalLadder) -> Self {
        let clock = TestClock(Arc::new(Mutex::new(fixtures::day(0))));
        let store = CardStore::open(
            SqliteRepository::open_in_memory().expect("open card database"),
            Scheduler::new(ladder),
            Duration::from_millis(500),
        )
        .expect("open card store");
        let journal = Journal::new(
            SqliteRepository::open_in_memory().expect("open journal database"),
            Duration::from_millis(500),
        );

        let state = AppState {
            store: Arc::new(store),
            journal: Arc::new(journal),
            clock: Arc::new(clock.clone()),
        };

        Self {
            clock,
            app: app(state),
        }
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.app.clone()).expect("build test server")
    }
}
