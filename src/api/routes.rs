use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use super::handlers;
use crate::config::Config;
use crate::ssml::TagRegistry;
use crate::tts::{PodcastService, VoiceDirectory};

pub struct AppState {
    pub registry: &'static TagRegistry,
    pub podcast: PodcastService,
    pub voices: Arc<dyn VoiceDirectory>,
    pub config: Config,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/tags", get(handlers::list_tags))
        .route("/transcript/parse", post(handlers::parse_transcript))
        .route("/ssml/parse", post(handlers::parse_ssml))
        .route("/ssml/export", post(handlers::export_ssml))
        .route("/ssml/edit", post(handlers::edit_utterance))
        .route("/ssml/span", post(handlers::find_span))
        .route("/ssml/select", post(handlers::select_text))
        .route("/ssml/highlight", post(handlers::highlight))
        .route("/voices", get(handlers::list_voices))
        .route("/generate-podcast", post(handlers::generate_podcast))
        .route("/tts", post(handlers::speak));

    let static_files =
        ServeDir::new(&state.config.static_dir).append_index_html_on_directories(true);

    Router::new()
        .nest("/api", api_routes)
        .fallback_service(static_files)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
