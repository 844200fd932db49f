//! Stockfish wrapper using the UCI protocol (async I/O).
//!
//! Every analysis spawns its own engine process, runs one search and tears the
//! process down again. The whole exchange is bounded by a deadline.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use chess_core::uci::{parse_best_move, BestMove};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Failed to spawn engine: {0}")]
    Spawn(String),

    #[error("Engine I/O error: {0}")]
    Io(String),

    #[error("Engine exited without a bestmove line")]
    NoCompletion,

    #[error("Engine returned no usable move: {0}")]
    NoMove(String),

    #[error("Engine did not answer within {0:?}")]
    Timeout(Duration),
}

#[derive(Clone, Debug)]
pub struct EngineSettings {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub depth: u32,
    pub timeout: Duration,
    pub max_processes: usize,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            program: PathBuf::from(&config.stockfish_path),
            args: config.stockfish_args.clone(),
            depth: config.engine_depth,
            timeout: config.engine_timeout(),
            max_processes: config.engine_max_processes.max(1),
        }
    }
}

/// Result of analysing one position.
#[derive(Debug, Clone, Serialize)]
pub struct EngineAnalysis {
    /// The raw `bestmove ...` line.
    pub raw: String,
    pub best_move: String,
    pub ponder: Option<String>,
}

/// Hands out one engine process per request, at most `max_processes` at a time.
pub struct Evaluator {
    settings: EngineSettings,
    permits: Arc<Semaphore>,
}

impl Evaluator {
    pub fn new(settings: EngineSettings) -> Self {
        let permits = Arc::new(Semaphore::new(settings.max_processes));
        Self { settings, permits }
    }

    /// Ask for the best move in `fen`. The process is gone when this returns.
    pub async fn analyze(&self, fen: &str) -> Result<EngineAnalysis, EngineError> {
        let timeout = self.settings.timeout;
        // One deadline covers both the wait for a free slot and the search.
        let deadline = Instant::now() + timeout;
        let _permit = tokio::time::timeout_at(deadline, self.permits.acquire())
            .await
            .map_err(|_| EngineError::Timeout(timeout))?
            .map_err(|_| EngineError::Spawn("engine pool closed".into()))?;

        let mut engine = EngineProcess::spawn(&self.settings)?;
        let outcome =
            tokio::time::timeout_at(deadline, engine.best_move(fen, self.settings.depth)).await;
        engine.shutdown().await;

        match outcome {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout(timeout)),
        }
    }
}

/// A running engine. Killed on drop if `shutdown` was never reached.
struct EngineProcess {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl EngineProcess {
    fn spawn(settings: &EngineSettings) -> Result<Self, EngineError> {
        let mut process = Command::new(&settings.program)
            .args(&settings.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                EngineError::Spawn(format!("{}: {e}", settings.program.display()))
            })?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("stdout not captured".into()))?;

        Ok(Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
        })
    }

    async fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        debug!(cmd, "SF <");
        self.stdin
            .write_all(format!("{cmd}\n").as_bytes())
            .await
            .map_err(|e| EngineError::Io(format!("write failed: {e}")))?;
        self.stdin
            .flush()
            .await
            .map_err(|e| EngineError::Io(format!("flush failed: {e}")))
    }

    /// Next output line, or `None` once the engine closed stdout.
    async fn next_line(&mut self) -> Result<Option<String>, EngineError> {
        let mut line = String::new();
        let read = self
            .stdout
            .read_line(&mut line)
            .await
            .map_err(|e| EngineError::Io(format!("read failed: {e}")))?;
        if read == 0 {
            return Ok(None);
        }
        let trimmed = line.trim().to_string();
        debug!(line = %trimmed, "SF >");
        Ok(Some(trimmed))
    }

    async fn wait_for(&mut self, expected: &str) -> Result<(), EngineError> {
        while let Some(line) = self.next_line().await? {
            if line == expected {
                return Ok(());
            }
        }
        Err(EngineError::NoCompletion)
    }

    async fn best_move(&mut self, fen: &str, depth: u32) -> Result<EngineAnalysis, EngineError> {
        self.send("uci").await?;
        self.wait_for("uciok").await?;
        self.send("isready").await?;
        self.wait_for("readyok").await?;

        self.send(&format!("position fen {fen}")).await?;
        self.send(&format!("go depth {depth}")).await?;

        while let Some(line) = self.next_line().await? {
            if !line.starts_with("bestmove") {
                continue;
            }
            return match parse_best_move(&line) {
                Some(BestMove { mv, ponder }) => Ok(EngineAnalysis {
                    raw: line,
                    best_move: mv,
                    ponder,
                }),
                None => Err(EngineError::NoMove(line)),
            };
        }
        Err(EngineError::NoCompletion)
    }

    /// Ask the engine to quit, then make sure it is dead and reaped.
    async fn shutdown(mut self) {
        let _ = self.send("quit").await;
        let _ = self.process.start_kill();
        let _ = self.process.wait().await;
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        let _ = self.process.start_kill();
    }
}
