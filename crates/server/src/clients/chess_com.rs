use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ChessComError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),
}

/// One monthly archive as listed by the archives endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub url: String,
    /// (year, month) parsed from the URL, when it has the usual shape.
    pub month: Option<(i32, u32)>,
}

impl Archive {
    fn from_url(url: &str) -> Self {
        // URLs look like "https://api.chess.com/pub/player/username/games/2024/03"
        let parts: Vec<&str> = url.trim_end_matches('/').rsplit('/').collect();
        let month = parts
            .first()
            .and_then(|m| m.parse::<u32>().ok())
            .zip(parts.get(1).and_then(|y| y.parse::<i32>().ok()))
            .map(|(month, year)| (year, month));
        Self {
            url: url.to_string(),
            month,
        }
    }
}

pub struct ChessComClient {
    client: Client,
    base_url: String,
}

impl ChessComClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent("ChessReplay/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json(&self, url: &str) -> Result<(StatusCode, Option<Value>), ChessComError> {
        let resp = self
            .client
            .get(url)
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| ChessComError::Upstream(format!("Request error for {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Ok((status, None));
        }

        let data = resp
            .json()
            .await
            .map_err(|e| ChessComError::Upstream(format!("JSON parse error for {url}: {e}")))?;
        Ok((status, Some(data)))
    }

    /// Fetch the list of monthly archives for a player, in the order listed upstream.
    pub async fn fetch_archives(&self, username: &str) -> Result<Vec<Archive>, ChessComError> {
        let url = format!("{}/player/{}/games/archives", self.base_url, username);

        let data = match self.get_json(&url).await? {
            (_, Some(data)) => data,
            (status, None) if status == StatusCode::NOT_FOUND => {
                return Err(ChessComError::NotFound(format!("User {username} not found")))
            }
            (status, None) => {
                return Err(ChessComError::Upstream(format!("Archives HTTP {status}")))
            }
        };

        Ok(data["archives"]
            .as_array()
            .map(|list| {
                list.iter()
                    .filter_map(|v| v.as_str())
                    .map(Archive::from_url)
                    .collect()
            })
            .unwrap_or_default())
    }

    /// Fetch every game of one monthly archive, untouched.
    pub async fn fetch_archive_games(&self, archive: &Archive) -> Result<Vec<Value>, ChessComError> {
        match self.get_json(&archive.url).await? {
            (_, Some(mut data)) => match data.get_mut("games").map(Value::take) {
                Some(Value::Array(games)) => Ok(games),
                _ => Ok(Vec::new()),
            },
            (status, None) => Err(ChessComError::Upstream(format!(
                "Archive {} HTTP {status}",
                archive.url
            ))),
        }
    }

    /// Games from the player's most recent monthly archive.
    pub async fn fetch_latest_games(&self, username: &str) -> Result<Vec<Value>, ChessComError> {
        let archives = self.fetch_archives(username).await?;
        let latest = latest_archive(&archives).ok_or_else(|| {
            ChessComError::NotFound(format!("User {username} not found or has no games"))
        })?;

        tracing::debug!(username, archive = %latest.url, "Fetching latest archive");
        let games = self.fetch_archive_games(latest).await?;
        tracing::info!(username, count = games.len(), "Fetched latest archive");
        Ok(games)
    }
}

/// Newest archive by (year, month); the last listed one when URLs don't parse.
pub fn latest_archive(archives: &[Archive]) -> Option<&Archive> {
    archives
        .iter()
        .filter(|a| a.month.is_some())
        .max_by_key(|a| a.month)
        .or_else(|| archives.last())
}
