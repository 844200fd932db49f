use std::sync::{Arc, LazyLock};

use axum::{extract::Query, Extension, Json};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::clients::chess_com::ChessComClient;
use crate::error::AppError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,50}$").unwrap());

#[derive(Deserialize)]
pub struct GamesQuery {
    pub username: Option<String>,
}

#[derive(Deserialize)]
pub struct GameQuery {
    pub username: Option<String>,
    #[serde(rename = "gameIndex")]
    pub game_index: Option<String>,
}

fn require_username(username: Option<&str>) -> Result<&str, AppError> {
    let username = username
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::BadRequest("Username is required".into()))?;

    if !USERNAME_RE.is_match(username) {
        return Err(AppError::BadRequest(format!("Invalid username: {username}")));
    }
    Ok(username)
}

/// GET /games?username=...
/// Games from the player's latest monthly archive, as returned by Chess.com.
pub async fn get_latest_games(
    Extension(client): Extension<Arc<ChessComClient>>,
    Query(q): Query<GamesQuery>,
) -> Result<Json<Vec<JsonValue>>, AppError> {
    let username = require_username(q.username.as_deref())?;
    let games = client.fetch_latest_games(username).await?;
    Ok(Json(games))
}

/// GET /game?username=...&gameIndex=N
/// A single game picked by its position in the latest archive.
pub async fn get_game(
    Extension(client): Extension<Arc<ChessComClient>>,
    Query(q): Query<GameQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let username = require_username(q.username.as_deref())?;
    let raw_index = q
        .game_index
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .ok_or_else(|| AppError::BadRequest("Username and game index are required".into()))?;
    let index: usize = raw_index
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid game index: {raw_index}")))?;

    let mut games = client.fetch_latest_games(username).await?;
    if index >= games.len() {
        return Err(AppError::NotFound("Game not found".into()));
    }
    Ok(Json(games.swap_remove(index)))
}
