// src/routes/mod.rs
pub mod chat;

use crate::{error::AppError, state::SharedState};
use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use chat::{
    chat_handler, create_session_handler, delete_session_handler, get_metrics_handler,
    reset_session_handler, transcript_handler,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(state: SharedState) -> Router {
    let admin_routes = Router::new()
        .route("/metrics", get(get_metrics_handler))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/sessions", post(create_session_handler))
        .route("/sessions/{id}", delete(delete_session_handler))
        .route("/sessions/{id}/messages", get(transcript_handler))
        .route("/sessions/{id}/reset", post(reset_session_handler))
        .route("/chat", post(chat_handler))
        .nest("/admin", admin_routes)
        .route("/health", get(|| async { "OK" }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn auth_middleware(
    State(state): State<SharedState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let presented = req.headers().get("x-admin-key").and_then(|v| v.to_str().ok());
    match (state.admin_key.as_deref(), presented) {
        (Some(expected), Some(key)) if key == expected => Ok(next.run(req).await),
        _ => Err(AppError::Unauthorized),
    }
}
