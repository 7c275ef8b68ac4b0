//! HTTP surface: `/api/v1/games/...` for the game bank and
//! `/api/v1/navigation/...` for resolution.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::state::AppState;

pub mod http;

fn game_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(http::http_list_games).post(http::http_post_game))
        .route("/validate", post(http::http_validate_game))
        .route("/:id", get(http::http_get_game))
}

fn navigation_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/resolve", post(http::http_post_resolve))
        .route("/round", post(http::http_post_round_navigation))
        .route("/slide", post(http::http_post_slide_navigation))
}

/// The full application router. CORS is wide open since the authoring
/// frontend lives on another origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/api/v1/health", get(http::http_health))
        .nest("/api/v1/games", game_routes())
        .nest("/api/v1/navigation", navigation_routes())
        .with_state(state)
        .layer(cors)
        .layer(trace)
}
