//! Chat dispatch: `POST /chat`.
//!
//! Looks up the session's agent and forwards the prompt. Unknown session
//! ids are a 404; any agent/model failure is caught and surfaced as a 500
//! with the underlying message. A failed call never invalidates the
//! session, so the client can simply retry.

use axum::{extract::State, routing::post, Form, Json, Router};
use tracing::info;

use crate::models::{AppState, ChatForm, ChatResponse};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_with_agent))
        .with_state(state)
}

async fn chat_with_agent(
    State(state): State<AppState>,
    Form(form): Form<ChatForm>,
) -> AppResult<Json<ChatResponse>> {
    info!(session_id = %form.session_id, "received chat request");

    let session = state.sessions.get(&form.session_id).await.ok_or_else(|| {
        AppError::NotFound("Session not found. Please upload a file first.".to_string())
    })?;

    let response = session
        .agent
        .answer(&form.prompt)
        .await
        .map_err(|e| AppError::Processing(format!("Failed to process prompt: {e}")))?;

    Ok(Json(ChatResponse { response }))
}
