use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use shelfmate_api::api::{create_router, AppState};
use shelfmate_api::catalog::Catalog;
use shelfmate_api::config::Config;
use shelfmate_api::services::providers::gemini::GeminiProvider;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; chat requests will fail until it is");
    }

    let provider = Arc::new(GeminiProvider::new(&config));
    let state = AppState::new(Catalog::builtin(), provider);

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "server running");
    axum::serve(listener, app).await?;

    Ok(())
}
