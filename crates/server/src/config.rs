use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base of the public Chess.com API, without trailing slash.
    pub chess_com_api_url: String,
    pub upstream_timeout_secs: u64,
    pub stockfish_path: String,
    pub stockfish_args: Vec<String>,
    pub engine_depth: u32,
    pub engine_timeout_ms: u64,
    pub engine_max_processes: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(3000),
            chess_com_api_url: env::var("CHESS_COM_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "https://api.chess.com/pub".to_string()),
            upstream_timeout_secs: parse_var("UPSTREAM_TIMEOUT_SECS").unwrap_or(30),
            stockfish_path: env::var("STOCKFISH_PATH").unwrap_or_else(|_| "stockfish".to_string()),
            stockfish_args: env::var("STOCKFISH_ARGS")
                .map(|v| v.split_whitespace().map(String::from).collect())
                .unwrap_or_default(),
            engine_depth: parse_var("ENGINE_DEPTH").unwrap_or(15),
            engine_timeout_ms: parse_var("ENGINE_TIMEOUT_MS").unwrap_or(10_000),
            engine_max_processes: parse_var("ENGINE_MAX_PROCESSES").unwrap_or(4),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
