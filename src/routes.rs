use axum::{
    extract::DefaultBodyLimit,
    routing::post,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::speech_to_text;
use crate::state::AppState;

pub fn create_routes(state: &AppState) -> Router<AppState> {
    // Audio uploads routinely exceed axum's 2 MiB default.
    let upload_limit = state.config.system_config.max_upload_bytes();

    Router::new().route(
        "/speech-to-text",
        post(speech_to_text).layer(DefaultBodyLimit::max(upload_limit)),
    )
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(create_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
