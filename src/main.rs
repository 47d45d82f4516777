use anyhow::Result;
use object_viewer::{config::Config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored when variables come from the environment)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("object_viewer=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Starting object viewer (API: {}, default language: {})",
        config.api_base_url, config.default_language
    );

    server::serve(config).await
}
