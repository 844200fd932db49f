use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use viewer::api::ApiClient;
use viewer::app::{self, Source};

#[derive(Parser)]
#[command(name = "viewer", about = "Step through chess games with engine hints")]
struct Cli {
    /// Base URL of the replay server
    #[arg(long, default_value = "http://localhost:3000")]
    server: String,

    /// Upper bound on any single server request, in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,

    #[command(subcommand)]
    source: SourceArg,
}

#[derive(Subcommand)]
enum SourceArg {
    /// Pick from a Chess.com user's latest games
    User { username: String },
    /// Load a PGN file
    Pgn { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();
    let api = ApiClient::new(&cli.server, Duration::from_secs(cli.timeout_secs))?;

    let source = match cli.source {
        SourceArg::User { username } => Source::User(username.trim().to_string()),
        SourceArg::Pgn { path } => Source::Pgn(
            std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
        ),
    };

    app::run(api, source).await
}
