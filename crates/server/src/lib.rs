pub mod clients;
pub mod config;
pub mod engine;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Extension, Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::clients::chess_com::ChessComClient;
use crate::config::Config;
use crate::engine::{EngineSettings, Evaluator};

/// Build the full application from configuration.
pub fn app(config: &Config) -> anyhow::Result<Router> {
    let chess_com = ChessComClient::new(&config.chess_com_api_url, config.upstream_timeout())?;
    let evaluator = Evaluator::new(EngineSettings::from_config(config));
    Ok(router(Arc::new(chess_com), Arc::new(evaluator)))
}

pub fn router(chess_com: Arc<ChessComClient>, evaluator: Arc<Evaluator>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health_check))
        // Archive proxy
        .route("/games", get(routes::games::get_latest_games))
        .route("/game", get(routes::games::get_game))
        // Paths used by earlier clients
        .route("/chesscom-games", get(routes::games::get_latest_games))
        .route("/chesscom-game", get(routes::games::get_game))
        // Engine
        .route("/analyze-move", post(routes::analysis::analyze_move))
        .layer(Extension(chess_com))
        .layer(Extension(evaluator))
        // Archive data changes between requests; never let anything cache it.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
}
