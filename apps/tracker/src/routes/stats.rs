//! Statistics endpoints

use axum::{extract::State, Json};
use study_core::{
    minutes_per_day, minutes_per_topic, stage_histogram, DayMinutes, StageCount, Summary,
    TopicMinutes,
};

use crate::error::Result;
use crate::AppState;

/// GET /api/stats/summary
pub async fn summary(State(state): State<AppState>) -> Result<Json<Summary>> {
    let sessions = state.journal.sessions().await?;
    let cards = state.store.all().await?;
    Ok(Json(Summary::compute(&sessions, &cards, state.clock.today())))
}

/// GET /api/stats/minutes-per-day
pub async fn minutes_by_day(State(state): State<AppState>) -> Result<Json<Vec<DayMinutes>>> {
    let sessions = state.journal.sessions().await?;
    Ok(Json(minutes_per_day(&sessions)))
}

/// GET /api/stats/minutes-per-topic
pub async fn minutes_by_topic(State(state): State<AppState>) -> Result<Json<Vec<TopicMinutes>>> {
    let sessions = state.journal.sessions().await?;
    Ok(Json(minutes_per_topic(&sessions)))
}

/// GET /api/stats/stages
pub async fn stages(State(state): State<AppState>) -> Result<Json<Vec<StageCount>>> {
    let cards = state.store.all().await?;
    Ok(Json(stage_histogram(&cards)))
}
