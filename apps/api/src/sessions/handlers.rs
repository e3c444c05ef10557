//! Axum route handlers for session lifecycle and the dashboard view.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::SessionRow;
use crate::state::AppState;
use crate::store;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub profession: String,
    pub level: Option<i32>,
}

/// POST /api/v1/sessions
/// Starts a playthrough: a fresh graduate in the given profession, already
/// on the job market.
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let profession = req.profession.trim();
    if profession.is_empty() {
        return Err(AppError::Validation("profession must not be empty".into()));
    }
    let level = req.level.unwrap_or(1).clamp(1, 10);

    let session = store::sessions::create(&state.db, profession, level).await?;
    tracing::info!(session_id = %session.id, profession, level, "session created");
    Ok((StatusCode::CREATED, Json(session.to_snapshot())))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let session = load_session(&state, session_id).await?;
    Ok(Json(session.to_snapshot()))
}

/// GET /api/v1/sessions/:id/dashboard
/// The employed player's board: open tasks, active meetings, and progress.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let session = load_session(&state, session_id).await?;

    let tasks = store::tasks::list_open(&state.db, session_id).await?;
    let meetings = store::meetings::list_active(&state.db, session_id).await?;

    Ok(Json(json!({
        "session": session.to_snapshot(),
        "active_tasks": tasks.iter().map(|t| t.to_public()).collect::<Vec<_>>(),
        "active_meetings": meetings.iter().map(|m| m.to_public()).collect::<Vec<_>>(),
    })))
}

/// Shared session lookup with a uniform 404.
pub async fn load_session(state: &AppState, session_id: Uuid) -> Result<SessionRow, AppError> {
    store::sessions::get(&state.db, session_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("session {session_id} not found")))
}
