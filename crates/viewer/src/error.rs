use chess_core::{NavigationError, PgnError};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    /// Missing or malformed user input.
    #[error("{0}")]
    Input(String),

    #[error("{0}")]
    NotFound(String),

    /// The server or the archive behind it failed.
    #[error("{0}")]
    Upstream(String),

    /// No recommendation could be obtained. Never blocks navigation.
    #[error("Recommendation unavailable: {0}")]
    Evaluation(String),

    #[error("Invalid PGN: {0}")]
    Pgn(#[from] PgnError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),
}

impl ViewerError {
    /// Classify an error response from the server.
    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        if status == reqwest::StatusCode::NOT_FOUND {
            ViewerError::NotFound(message)
        } else if status.is_client_error() {
            ViewerError::Input(message)
        } else {
            ViewerError::Upstream(message)
        }
    }
}
