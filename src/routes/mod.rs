//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `POST /upload` - CSV upload, creates a chat session
//! - `POST /chat` - Ask the session's agent a question
//! - `GET /health` - Health check

pub mod chat;
pub mod health;
pub mod upload;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(upload::router(state.clone()))
        .merge(chat::router(state.clone()))
        .merge(health::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
