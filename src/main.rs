mod asr;
mod audio;
mod config_manager;
mod handlers;
mod routes;
mod state;
mod transcription;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config_manager::utils::load_first_config;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("speech_to_text=debug,tower_http=debug")),
        )
        .init();

    // Load configuration - first file that exists wins, defaults otherwise
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.yml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (config, loaded_path) = load_first_config(&config_paths)?;
    match loaded_path {
        Some(path) => info!("Loaded configuration from: {}", path),
        None => info!("No configuration file found (tried {:?}), using defaults", config_paths),
    }

    let addr = config
        .system_config
        .socket_addr()
        .map_err(|e| anyhow::anyhow!("Invalid system_config: {}", e))?;
    let app_state = AppState::new(config)?;
    info!("Using ASR provider: {}", app_state.asr.name());

    let app = routes::build_app(app_state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
