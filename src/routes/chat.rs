use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, CreateSessionRequest, TranscriptResponse},
    services::metrics_manager::MetricsData,
    state::SharedState,
};

pub async fn create_session_handler(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<TranscriptResponse>), AppError> {
    let name = payload.display_name.trim();
    if name.is_empty() {
        return Err(AppError::BadRequest("display_name cannot be empty".to_string()));
    }

    let session_id = state.sessions.create_session(name).await;
    let transcript = state
        .sessions
        .transcript(session_id)
        .await
        .ok_or(AppError::SessionNotFound(session_id))?;
    Ok((
        StatusCode::CREATED,
        Json(TranscriptResponse::new(session_id, &transcript)),
    ))
}

// Blank messages are accepted and ignored; the reply lands after the typing delay.
pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let session_id = payload.session_id;
    let submission = state
        .sessions
        .submit(session_id, &payload.message)
        .await
        .ok_or(AppError::SessionNotFound(session_id))?;

    Ok(Json(ChatResponse {
        session_id,
        accepted: submission.accepted,
        composing: submission.composing,
    }))
}

pub async fn transcript_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = state
        .sessions
        .transcript(session_id)
        .await
        .ok_or(AppError::SessionNotFound(session_id))?;
    Ok(Json(TranscriptResponse::new(session_id, &transcript)))
}

pub async fn reset_session_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<TranscriptResponse>, AppError> {
    let transcript = state
        .sessions
        .reset_session(session_id)
        .await
        .ok_or(AppError::SessionNotFound(session_id))?;
    Ok(Json(TranscriptResponse::new(session_id, &transcript)))
}

pub async fn delete_session_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove_session(session_id).await {
        info!(session_id = %session_id, "session ended by client");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::SessionNotFound(session_id))
    }
}

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<MetricsData> {
    let mut data = state.metrics.get_metrics().await;
    data.active_sessions = state.sessions.len().await;
    Json(data)
}
