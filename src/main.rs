use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod ssml;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use ssml::TagRegistry;
use tts::{ElevenLabsClient, PodcastService};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid address");

    tracing::info!("SSML Studio v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", addr);
    tracing::info!("Static files: {}", config.static_dir);
    if config.provider.api_key.is_empty() {
        tracing::warn!("ELEVENLABS_API_KEY is not set; speech requests will be rejected");
    }

    // One client serves both speech and the voice catalogue
    let client = Arc::new(ElevenLabsClient::new(&config.provider));

    let state = Arc::new(AppState {
        registry: TagRegistry::standard(),
        podcast: PodcastService::new(client.clone(), config.voice_settings),
        voices: client,
        config,
    });

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
