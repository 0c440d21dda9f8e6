use std::sync::Arc;

use crate::config::Config;
use crate::llm::LLM;
use crate::session_registry::SessionRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<LLM>,
    pub sessions: SessionRegistry,
}

// API Request/Response types

#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub session_id: String,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatForm {
    pub session_id: String,
    pub prompt: String,
}

#[derive(Debug, serde::Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub sessions: usize,
}
