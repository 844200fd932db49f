//! HTTP client for the replay server.

use std::time::Duration;

use chess_core::uci::{parse_best_move, BestMove};
use chess_core::Game;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ViewerError;

#[derive(Deserialize)]
struct AnalyzeResponse {
    analysis: String,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Every request, engine analysis included, is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ViewerError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ViewerError::Upstream(format!("HTTP client error: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn error_from(resp: Response) -> ViewerError {
        let status = resp.status();
        let message = resp
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| body["error"].as_str().map(String::from))
            .unwrap_or_else(|| format!("Server returned {status}"));
        ViewerError::from_status(status, message)
    }

    /// Games from the user's latest archive month, in archive order.
    pub async fn latest_games(&self, username: &str) -> Result<Vec<Game>, ViewerError> {
        let resp = self
            .client
            .get(format!("{}/games", self.base_url))
            .query(&[("username", username)])
            .send()
            .await
            .map_err(|e| ViewerError::Upstream(format!("Request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| ViewerError::Upstream(format!("Unexpected game list: {e}")))
    }

    /// One game by its position in the latest archive.
    pub async fn game(&self, username: &str, index: usize) -> Result<Game, ViewerError> {
        let index = index.to_string();
        let resp = self
            .client
            .get(format!("{}/game", self.base_url))
            .query(&[("username", username), ("gameIndex", index.as_str())])
            .send()
            .await
            .map_err(|e| ViewerError::Upstream(format!("Request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }
        resp.json()
            .await
            .map_err(|e| ViewerError::Upstream(format!("Unexpected game: {e}")))
    }

    /// Engine recommendation for `fen`. Every failure is an evaluation error.
    pub async fn analyze(&self, fen: &str) -> Result<BestMove, ViewerError> {
        let resp = self
            .client
            .post(format!("{}/analyze-move", self.base_url))
            .json(&json!({ "fen": fen }))
            .send()
            .await
            .map_err(|e| ViewerError::Evaluation(e.to_string()))?;

        if !resp.status().is_success() {
            let err = Self::error_from(resp).await;
            return Err(ViewerError::Evaluation(err.to_string()));
        }

        let body: AnalyzeResponse = resp
            .json()
            .await
            .map_err(|e| ViewerError::Evaluation(e.to_string()))?;
        parse_best_move(&body.analysis)
            .ok_or_else(|| ViewerError::Evaluation(format!("No move in {:?}", body.analysis)))
    }
}
