use serde::{Deserialize, Serialize};
use shakmaty::Color;

/// One side of a game as listed in a Chess.com monthly archive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSide {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub result: String, // "win", "checkmated", "resigned", "agreed", ...
}

/// A recorded game. Other archive fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub white: PlayerSide,
    #[serde(default)]
    pub black: PlayerSide,
    #[serde(default)]
    pub pgn: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOutcome {
    Won,
    Lost,
    Drawn,
}

impl Game {
    /// Which colour `username` played and how it went for them.
    pub fn outcome_for(&self, username: &str) -> Option<(Color, UserOutcome)> {
        let (color, own, other) = if self.white.username.eq_ignore_ascii_case(username) {
            (Color::White, &self.white, &self.black)
        } else if self.black.username.eq_ignore_ascii_case(username) {
            (Color::Black, &self.black, &self.white)
        } else {
            return None;
        };

        let outcome = if own.result == "win" {
            UserOutcome::Won
        } else if other.result == "win" {
            UserOutcome::Lost
        } else {
            UserOutcome::Drawn
        };
        Some((color, outcome))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Game {
        serde_json::from_value(serde_json::json!({
            "url": "https://www.chess.com/game/live/1",
            "pgn": "1. e4 e5 *",
            "time_class": "blitz",
            "white": { "username": "Hikaru", "rating": 3200, "result": "win" },
            "black": { "username": "someone", "rating": 1500, "result": "resigned" }
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_ignores_extra_fields() {
        let game = sample();
        assert_eq!(game.white.rating, Some(3200));
        assert_eq!(game.black.result, "resigned");
    }

    #[test]
    fn test_outcome_case_insensitive() {
        let game = sample();
        assert_eq!(game.outcome_for("hikaru"), Some((Color::White, UserOutcome::Won)));
        assert_eq!(game.outcome_for("SOMEONE"), Some((Color::Black, UserOutcome::Lost)));
        assert_eq!(game.outcome_for("nobody"), None);
    }

    #[test]
    fn test_outcome_draw() {
        let mut game = sample();
        game.white.result = "agreed".into();
        game.black.result = "agreed".into();
        assert_eq!(game.outcome_for("hikaru"), Some((Color::White, UserOutcome::Drawn)));
    }
}
