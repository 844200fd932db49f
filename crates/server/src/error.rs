use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::clients::chess_com::ChessComError;
use crate::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Evaluation(String),

    #[error("{0}")]
    EvaluationTimeout(String),
}

impl From<ChessComError> for AppError {
    fn from(e: ChessComError) -> Self {
        match e {
            ChessComError::NotFound(msg) => AppError::NotFound(msg),
            ChessComError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Timeout(_) => AppError::EvaluationTimeout(e.to_string()),
            other => AppError::Evaluation(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch data from Chess.com".to_string(),
                )
            }
            AppError::Evaluation(msg) => {
                tracing::warn!("Evaluation error: {msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
            AppError::EvaluationTimeout(msg) => {
                tracing::warn!("Evaluation timed out: {msg}");
                (StatusCode::GATEWAY_TIMEOUT, msg.clone())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
