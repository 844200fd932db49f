#![allow(dead_code)]

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Extension, Json, Router,
};
use reqwest::Client;
use serde_json::{json, Value};
use server::config::Config;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// UCI engine stand-in: answers the handshake and always recommends e2e4.
pub const ANSWERING_ENGINE: &str = r#"while read -r line; do
  case "$line" in
    uci) echo "id name Scripted"; echo "uciok" ;;
    isready) echo "readyok" ;;
    go*) echo "info depth 1 score cp 30 pv e2e4 e7e5"; echo "bestmove e2e4 ponder e7e5" ;;
    quit) exit 0 ;;
  esac
done"#;

/// Engine that completes the handshake but never finishes a search.
pub const HANGING_ENGINE: &str = r#"while read -r line; do
  case "$line" in
    uci) echo "uciok" ;;
    isready) echo "readyok" ;;
  esac
done"#;

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn game(white: &str, black: &str, white_result: &str, black_result: &str, pgn: &str) -> Value {
    json!({
        "url": format!("https://www.chess.com/game/live/{white}-{black}"),
        "pgn": pgn,
        "time_class": "blitz",
        "rules": "chess",
        "white": { "username": white, "rating": 1500, "result": white_result },
        "black": { "username": black, "rating": 1480, "result": black_result },
    })
}

async fn fake_archives(
    Extension(base): Extension<String>,
    Path(username): Path<String>,
) -> Response {
    match username.as_str() {
        "threegames" => Json(json!({
            "archives": [
                format!("{base}/player/threegames/games/2024/01"),
                format!("{base}/player/threegames/games/2024/02"),
            ]
        }))
        .into_response(),
        "noarchives" => Json(json!({ "archives": [] })).into_response(),
        "quietmonth" => Json(json!({
            "archives": [format!("{base}/player/quietmonth/games/2024/03")]
        }))
        .into_response(),
        "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": 0, "message": "User not found" })),
        )
            .into_response(),
    }
}

async fn fake_month(Path((username, year, month)): Path<(String, String, String)>) -> Response {
    match (username.as_str(), year.as_str(), month.as_str()) {
        ("threegames", "2024", "02") => Json(json!({
            "games": [
                game("threegames", "alice", "win", "resigned", "1. e4 e5 2. Nf3 Nc6 1-0"),
                game("bob", "threegames", "win", "checkmated",
                     "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# 1-0"),
                game("threegames", "carol", "agreed", "agreed", "1. d4 d5 1/2-1/2"),
            ]
        }))
        .into_response(),
        ("threegames", "2024", "01") => Json(json!({
            "games": [game("threegames", "dave", "win", "timeout", "1. c4 1-0")]
        }))
        .into_response(),
        ("quietmonth", "2024", "03") => Json(json!({ "games": [] })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve a fake Chess.com public API and return its base URL.
pub async fn spawn_fake_chess_com() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind fake Chess.com");
    let base = format!("http://{}", listener.local_addr().unwrap());

    let router = Router::new()
        .route("/player/{username}/games/archives", get(fake_archives))
        .route("/player/{username}/games/{year}/{month}", get(fake_month))
        .layer(Extension(base.clone()));
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    base
}

pub fn test_config(chess_com_api_url: &str, engine_script: &str, engine_timeout_ms: u64) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        chess_com_api_url: chess_com_api_url.into(),
        upstream_timeout_secs: 5,
        stockfish_path: "sh".into(),
        stockfish_args: vec!["-c".into(), engine_script.into()],
        engine_depth: 5,
        engine_timeout_ms,
        engine_max_processes: 2,
    }
}

/// Serve the application against the fake upstream and a scripted engine.
pub async fn spawn_app(engine_script: &str, engine_timeout_ms: u64) -> String {
    let chess_com = spawn_fake_chess_com().await;
    spawn_app_with(test_config(&chess_com, engine_script, engine_timeout_ms)).await
}

pub async fn spawn_app_with(config: Config) -> String {
    let app = server::app(&config).expect("Failed to build app");
    serve(app).await
}
