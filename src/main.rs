use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tabletalk::llm::{LLMProviderConfig, LLM};
use tabletalk::{config::Config, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabletalk=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded: {:?}", config.server);

    // Ensure the upload directory exists
    tokio::fs::create_dir_all(&config.storage.upload_dir).await?;

    // Bind the LLM provider
    let llm = LLM::new(LLMProviderConfig {
        name: config.llm.provider.clone(),
        api_key: config.llm.google_api_key.clone(),
    })
    .map_err(|e| anyhow::anyhow!("Failed to initialize LLM provider: {e}"))?;
    info!("LLM provider ready: {}", llm.provider_name());

    // Create shared state
    let state = AppState {
        config: config.clone(),
        llm: Arc::new(llm),
        sessions: Default::default(),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
