//! Journal endpoints: study sessions, Feynman notes, weekly reflections

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use study_core::{week_start, FeynmanNote, Reflection, StudySession};

use crate::error::Result;
use crate::import;
use crate::models::*;
use crate::routes::cards::csv_body;
use crate::AppState;

const DEFAULT_FEYNMAN_LIMIT: usize = 20;

/// POST /api/sessions
pub async fn log_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<StudySession>)> {
    let session = StudySession {
        date: payload.date.unwrap_or_else(|| state.clock.today()),
        period: payload.period,
        topic: payload.topic,
        activities: payload.activities,
        minutes: payload.minutes,
        notes: payload.notes,
    };
    let session = state.journal.log_session(session).await?;

    tracing::info!(topic = %session.topic, minutes = session.minutes, "session logged");
    Ok((StatusCode::CREATED, Json(session)))
}

/// GET /api/sessions
pub async fn sessions(State(state): State<AppState>) -> Result<Json<Vec<StudySession>>> {
    Ok(Json(state.journal.sessions().await?))
}

/// POST /api/feynman
pub async fn add_feynman(
    State(state): State<AppState>,
    Json(payload): Json<CreateFeynmanRequest>,
) -> Result<(StatusCode, Json<FeynmanNote>)> {
    let note = FeynmanNote {
        date: payload.date.unwrap_or_else(|| state.clock.today()),
        concept: payload.concept,
        explanation: payload.explanation,
        analogy: payload.analogy,
        clarity: payload.clarity,
    };
    let note = state.journal.add_feynman(note).await?;

    tracing::info!(concept = %note.concept, clarity = note.clarity, "feynman note saved");
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/feynman?limit=
pub async fn feynman_notes(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<FeynmanNote>>> {
    let limit = query.limit.unwrap_or(DEFAULT_FEYNMAN_LIMIT);
    Ok(Json(state.journal.feynman_notes(limit).await?))
}

/// POST /api/reflections
pub async fn add_reflection(
    State(state): State<AppState>,
    Json(payload): Json<CreateReflectionRequest>,
) -> Result<(StatusCode, Json<Reflection>)> {
    let today = state.clock.today();
    let reflection = Reflection {
        week_start: payload.week_start.unwrap_or_else(|| week_start(today)),
        understood: payload.understood,
        confused: payload.confused,
        next_plan: payload.next_plan,
        created_at: today,
    };
    let reflection = state.journal.add_reflection(reflection).await?;

    tracing::info!(week_start = %reflection.week_start, "reflection saved");
    Ok((StatusCode::CREATED, Json(reflection)))
}

/// GET /api/reflections
pub async fn reflections(State(state): State<AppState>) -> Result<Json<Vec<Reflection>>> {
    Ok(Json(state.journal.reflections().await?))
}

/// POST /api/sessions/import
///
/// Body is a `sessions.csv` export.
pub async fn import_sessions(State(state): State<AppState>, body: String) -> Result<Json<ImportResponse>> {
    let sessions = import::read_sessions(body.as_bytes())?;
    let imported = state.journal.import_sessions(sessions).await?;

    tracing::info!(imported, "sessions imported");
    Ok(Json(ImportResponse { imported }))
}

/// GET /api/sessions/export
pub async fn export_sessions(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let sessions = state.journal.sessions().await?;
    let mut out = Vec::new();
    import::write_sessions(&mut out, &sessions)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv_body(out)?))
}

/// POST /api/feynman/import
///
/// Body is a `feynman_notes.csv` export.
pub async fn import_feynman(State(state): State<AppState>, body: String) -> Result<Json<ImportResponse>> {
    let notes = import::read_feynman_notes(body.as_bytes())?;
    let imported = state.journal.import_feynman_notes(notes).await?;

    tracing::info!(imported, "feynman notes imported");
    Ok(Json(ImportResponse { imported }))
}

/// GET /api/feynman/export
pub async fn export_feynman(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut notes = state.journal.all_feynman_notes().await?;
    notes.reverse();
    let mut out = Vec::new();
    import::write_feynman_notes(&mut out, &notes)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv_body(out)?))
}

/// POST /api/reflections/import
///
/// Body is a `reflections.csv` export.
pub async fn import_reflections(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<ImportResponse>> {
    let reflections = import::read_reflections(body.as_bytes())?;
    let imported = state.journal.import_reflections(reflections).await?;

    tracing::info!(imported, "reflections imported");
    Ok(Json(ImportResponse { imported }))
}

/// GET /api/reflections/export
pub async fn export_reflections(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut reflections = state.journal.reflections().await?;
    reflections.reverse();
    let mut out = Vec::new();
    import::write_reflections(&mut out, &reflections)?;
    Ok(([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], csv_body(out)?))
}
