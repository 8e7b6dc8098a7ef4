//! Card endpoints

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use study_core::{Card, CardId};

use crate::error::{ApiError, Result};
use crate::import;
use crate::models::*;
use crate::AppState;

fn parse_id(raw: &str) -> Result<CardId> {
    raw.parse()
        .map_err(|e| ApiError::BadRequest(format!("invalid card id {raw:?}: {e}")))
}

/// GET /api/scheduler
pub async fn scheduler(State(state): State<AppState>) -> Json<SchedulerResponse> {
    Json(SchedulerResponse {
        ladder: state.store.scheduler().ladder().clone(),
    })
}

/// POST /api/cards
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateCardRequest>,
) -> Result<(StatusCode, Json<Card>)> {
    let today = state.clock.today();
    let card = state
        .store
        .create(
            &payload.question,
            payload.answer.as_deref(),
            payload.tags.into(),
            today,
        )
        .await?;

    tracing::info!(card_id = %card.id, "card created");
    Ok((StatusCode::CREATED, Json(card)))
}

/// GET /api/cards
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Card>>> {
    Ok(Json(state.store.all().await?))
}

/// GET /api/cards/:id
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Card>> {
    let id = parse_id(&id)?;
    Ok(Json(state.store.get(id).await?))
}

/// POST /api/cards/:id/review
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<Card>> {
    let id = parse_id(&id)?;
    let today = state.clock.today();
    let card = state.store.review(id, payload.outcome, today).await?;

    tracing::info!(
        card_id = %card.id,
        outcome = ?payload.outcome,
        stage = card.stage,
        next_due = %card.next_due,
        "card reviewed"
    );
    Ok(Json(card))
}

/// GET /api/cards/due
pub async fn due(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Vec<Card>>> {
    let as_of = query.as_of.unwrap_or_else(|| state.clock.today());
    Ok(Json(state.store.due_as_of(as_of).await?))
}

/// GET /api/cards/next
pub async fn next(
    State(state): State<AppState>,
    Query(query): Query<AsOfQuery>,
) -> Result<Json<Option<Card>>> {
    let as_of = query.as_of.unwrap_or_else(|| state.clock.today());
    Ok(Json(state.store.next_due(as_of).await?))
}

/// POST /api/cards/import
///
/// Body is a `cards.csv` export.
pub async fn import_csv(State(state): State<AppState>, body: String) -> Result<Json<ImportResponse>> {
    let cards = import::read_cards(body.as_bytes())?;
    let imported = state.store.import(cards).await?;

    tracing::info!(imported, "cards imported");
    Ok(Json(ImportResponse { imported }))
}

/// GET /api/cards/export
pub async fn export_csv(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let cards = state.store.all().await?;
    let mut out = Vec::new();
    import::write_cards(&mut out, &cards)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv_body(out)?))
}

/// Export bytes as a response body. Invalid UTF-8 is a server fault.
pub(crate) fn csv_body(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| ApiError::Internal(format!("export is not valid UTF-8: {e}")))
}
