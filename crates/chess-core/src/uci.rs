//! Helpers for reading engine output and comparing it with played moves.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::pgn::MoveRecord;

static BESTMOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*bestmove\s+([a-h][1-8][a-h][1-8][qrbn]?)(?:\s+ponder\s+([a-h][1-8][a-h][1-8][qrbn]?))?\s*$")
        .unwrap()
});

/// Recommendation extracted from an engine's completion line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BestMove {
    /// Square pair, optionally with a promotion letter, e.g. "e2e4" or "e7e8q".
    pub mv: String,
    pub ponder: Option<String>,
}

/// Find the first `bestmove` line in engine output.
/// `bestmove (none)` and malformed tokens yield `None`.
pub fn parse_best_move(output: &str) -> Option<BestMove> {
    let caps = BESTMOVE_RE.captures(output)?;
    Some(BestMove {
        mv: caps[1].to_string(),
        ponder: caps.get(2).map(|m| m.as_str().to_string()),
    })
}

/// Strip check/mate and annotation decoration, lowercase.
pub fn normalize_move(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| !matches!(c, '+' | '#' | '!' | '?'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether the engine's recommendation is the move that was actually played.
pub fn moves_match(played: &MoveRecord, recommended: &str) -> bool {
    let recommended = normalize_move(recommended);
    if recommended.is_empty() {
        return false;
    }

    recommended == played.uci || recommended == normalize_move(&played.san)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pgn::moves_from_san;

    #[test]
    fn test_parse_best_move_with_ponder() {
        let output = "info depth 12 score cp 31 pv e2e4 e7e5\nbestmove e2e4 ponder e7e5\n";
        let best = parse_best_move(output).unwrap();
        assert_eq!(best.mv, "e2e4");
        assert_eq!(best.ponder.as_deref(), Some("e7e5"));
    }

    #[test]
    fn test_parse_best_move_promotion_without_ponder() {
        let best = parse_best_move("bestmove a7a8q").unwrap();
        assert_eq!(best.mv, "a7a8q");
        assert_eq!(best.ponder, None);
    }

    #[test]
    fn test_parse_best_move_none() {
        assert_eq!(parse_best_move("bestmove (none)"), None);
        assert_eq!(parse_best_move("info depth 1 pv e2e4"), None);
    }

    #[test]
    fn test_san_matches_square_pair() {
        let moves = moves_from_san(&["e4"]).unwrap();
        assert!(moves_match(&moves[0], "e2e4"));
        assert!(moves_match(&moves[0], "E2E4"));
        assert!(!moves_match(&moves[0], "d2d4"));
        assert!(!moves_match(&moves[0], ""));
    }

    #[test]
    fn test_decoration_is_ignored() {
        let moves = moves_from_san(&["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"]).unwrap();
        let mate = moves.last().unwrap();
        assert!(moves_match(mate, "h5f7"));
        assert!(moves_match(mate, "qxf7"));
        assert!(moves_match(mate, "Qxf7+"));
    }

    #[test]
    fn test_promotion_must_agree() {
        let moves = moves_from_san(&[
            "a4", "h5", "a5", "h4", "a6", "h3", "axb7", "hxg2", "bxa8=Q",
        ])
        .unwrap();
        let promo = moves.last().unwrap();
        assert_eq!(promo.uci, "b7a8q");
        assert!(moves_match(promo, "b7a8q"));
        assert!(!moves_match(promo, "b7a8n"));
    }

    #[test]
    fn test_normalize_move() {
        assert_eq!(normalize_move(" Nf3+ "), "nf3");
        assert_eq!(normalize_move("e8=Q#"), "e8=q");
        assert_eq!(normalize_move("Bxe5!?"), "bxe5");
    }
}
