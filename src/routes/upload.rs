//! File intake: `POST /upload`.
//!
//! Accepts a multipart form with a `file` field (filename must end in
//! `.csv`) and an optional numeric `temperature` field. On success the
//! payload is written to `<upload_dir>/<session_id>.csv`, parsed, seeded
//! into a fresh agent, and registered; the client gets the session id.

use std::path::Path;
use std::sync::Arc;

use axum::{extract::Multipart, extract::State, routing::post, Json, Router};
use tracing::{debug, info};
use uuid::Uuid;

use crate::agents::TabularAgent;
use crate::dataframe::DataFrame;
use crate::models::{AppState, UploadResponse};
use crate::session_registry::SessionRecord;
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_file))
        .with_state(state)
}

async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut filename: Option<String> = None;
    let mut payload: Option<Vec<u8>> = None;
    let mut temperature: f32 = 0.0;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                filename = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read file field: {e}"))
                })?;
                payload = Some(bytes.to_vec());
            }
            Some("temperature") => {
                let text = field.text().await.map_err(|e| {
                    AppError::InvalidRequest(format!("Failed to read temperature field: {e}"))
                })?;
                temperature = text.trim().parse().unwrap_or(0.0);
            }
            _ => {}
        }
    }

    let filename =
        filename.ok_or_else(|| AppError::InvalidRequest("Missing file field.".to_string()))?;
    info!(%filename, "file received");
    // Accepted for contract compatibility; the agent pins temperature 0
    debug!(temperature, "upload options");

    if !filename.ends_with(".csv") {
        return Err(AppError::InvalidRequest(
            "Only CSV files are supported.".to_string(),
        ));
    }

    let payload = payload
        .ok_or_else(|| AppError::InvalidRequest("Empty file field.".to_string()))?;

    let session_id = Uuid::new_v4().to_string();
    let file_path = Path::new(&state.config.storage.upload_dir).join(format!("{session_id}.csv"));

    tokio::fs::write(&file_path, &payload).await?;

    let frame = DataFrame::from_path(&file_path)
        .map_err(|e| AppError::Processing(format!("Failed to process file: {e}")))?;

    let agent = TabularAgent::new(&frame, state.llm.clone(), state.config.llm.model.clone());

    state
        .sessions
        .insert(SessionRecord {
            session_id: session_id.clone(),
            file_path,
            columns: frame.headers().to_vec(),
            row_count: frame.row_count(),
            agent: Arc::new(agent),
        })
        .await;

    info!(%session_id, "agent created for session");

    Ok(Json(UploadResponse { session_id }))
}
