use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::engine::Evaluator;
use crate::error::AppError;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    pub fen: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// The engine's completion line, e.g. "bestmove e2e4 ponder e7e5".
    pub analysis: String,
    pub best_move: String,
    pub ponder: Option<String>,
}

/// POST /analyze-move
pub async fn analyze_move(
    Extension(evaluator): Extension<Arc<Evaluator>>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(req) = body.map_err(|e| AppError::BadRequest(format!("Invalid body: {e}")))?;
    let fen = req
        .fen
        .as_deref()
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .ok_or_else(|| AppError::BadRequest("FEN is required".into()))?;

    // A line break would let the caller inject extra UCI commands.
    if fen.chars().any(char::is_control) {
        return Err(AppError::BadRequest("FEN must be a single line".into()));
    }

    let analysis = evaluator.analyze(fen).await?;
    tracing::debug!(fen, best_move = %analysis.best_move, "Analyzed position");

    Ok(Json(AnalyzeResponse {
        analysis: analysis.raw,
        best_move: analysis.best_move,
        ponder: analysis.ponder,
    }))
}
