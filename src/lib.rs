// Tabletalk - conversational CSV analysis backend

pub mod agents;
pub mod config;
pub mod dataframe;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod session_registry;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
