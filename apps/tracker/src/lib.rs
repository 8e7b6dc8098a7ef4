pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod import;
pub mod journal;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use study_core::Scheduler;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::SqliteRepository;
use crate::journal::Journal;
use crate::store::CardStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CardStore>,
    pub journal: Arc<Journal>,
    pub clock: Arc<dyn Clock>,
}

/// Build the router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/scheduler", get(routes::cards::scheduler))
        // Card routes
        .route(
            "/api/cards",
            get(routes::cards::list).post(routes::cards::create),
        )
        .route("/api/cards/due", get(routes::cards::due))
        .route("/api/cards/next", get(routes::cards::next))
        .route("/api/cards/import", post(routes::cards::import_csv))
        .route("/api/cards/export", get(routes::cards::export_csv))
        .route("/api/cards/:id", get(routes::cards::get))
        .route("/api/cards/:id/review", post(routes::cards::review))
        // Journal routes
        .route(
            "/api/sessions",
            get(routes::journal::sessions).post(routes::journal::log_session),
        )
        .route("/api/sessions/import", post(routes::journal::import_sessions))
        .route("/api/sessions/export", get(routes::journal::export_sessions))
        .route(
            "/api/feynman",
            get(routes::journal::feynman_notes).post(routes::journal::add_feynman),
        )
        .route("/api/feynman/import", post(routes::journal::import_feynman))
        .route("/api/feynman/export", get(routes::journal::export_feynman))
        .route(
            "/api/reflections",
            get(routes::journal::reflections).post(routes::journal::add_reflection),
        )
        .route("/api/reflections/import", post(routes::journal::import_reflections))
        .route("/api/reflections/export", get(routes::journal::export_reflections))
        // Stats routes
        .route("/api/stats/summary", get(routes::stats::summary))
        .route("/api/stats/minutes-per-day", get(routes::stats::minutes_by_day))
        .route("/api/stats/minutes-per-topic", get(routes::stats::minutes_by_topic))
        .route("/api/stats/stages", get(routes::stats::stages))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Ensure data directory exists
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    tracing::info!(path = %config.database_path.display(), ladder = %config.ladder, "Opening database...");
    let store = CardStore::open(
        SqliteRepository::open(&config.database_path, config.lock_timeout)?,
        Scheduler::new(config.ladder.clone()),
        config.lock_timeout,
    )?;
    let journal = Journal::new(
        SqliteRepository::open(&config.database_path, config.lock_timeout)?,
        config.lock_timeout,
    );

    let state = AppState {
        store: Arc::new(store),
        journal: Arc::new(journal),
        clock: Arc::new(SystemClock {
            daily_reset_hour: config.daily_reset_hour,
        }),
    };

    let app = app(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
