//! Viewer state: the loaded game, the navigation cursor and engine verdicts.
//!
//! Evaluations run asynchronously. Each cursor change bumps a generation
//! counter, and a result is only shown if it was requested under the current
//! generation; anything older is dropped.

use chess_core::uci::{moves_match, BestMove};
use chess_core::{parse_pgn, Game, GameHeaders, GameNavigator, ParsedGame};

use crate::error::ViewerError;

/// How a played move compares to the engine's choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Unchecked,
    Pending,
    Matched,
    Missed,
    Unavailable,
}

/// An evaluation to run for the move just played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub epoch: u64,
    pub generation: u64,
    /// Index of the played move in the sequence.
    pub ply: usize,
    /// Position the move was played from.
    pub fen: String,
}

/// The engine suggestion currently on display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub ply: usize,
    pub best: BestMove,
    pub matched: bool,
}

#[derive(Debug, Default)]
pub struct ViewerSession {
    game: Option<Game>,
    headers: GameHeaders,
    navigator: GameNavigator,
    verdicts: Vec<Verdict>,
    recommendation: Option<Recommendation>,
    /// Bumped on every load.
    epoch: u64,
    /// Bumped on every cursor change.
    generation: u64,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a game picked from an archive. On error the previous game stays.
    pub fn load_game(&mut self, game: Game) -> Result<(), ViewerError> {
        let parsed = parse_pgn(&game.pgn)?;
        self.install(Some(game), parsed);
        Ok(())
    }

    /// Load pasted PGN text. On error the previous game stays.
    pub fn load_pgn(&mut self, pgn: &str) -> Result<(), ViewerError> {
        if pgn.trim().is_empty() {
            return Err(ViewerError::Input("Please enter a username or PGN".into()));
        }
        let parsed = parse_pgn(pgn)?;
        self.install(None, parsed);
        Ok(())
    }

    fn install(&mut self, game: Option<Game>, parsed: ParsedGame) {
        self.verdicts = vec![Verdict::Unchecked; parsed.moves.len()];
        self.navigator.load(parsed.moves);
        self.headers = parsed.headers;
        self.game = game;
        self.recommendation = None;
        self.epoch += 1;
        self.generation += 1;
        tracing::debug!(moves = self.navigator.len(), epoch = self.epoch, "Game loaded");
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn headers(&self) -> &GameHeaders {
        &self.headers
    }

    pub fn navigator(&self) -> &GameNavigator {
        &self.navigator
    }

    pub fn verdicts(&self) -> &[Verdict] {
        &self.verdicts
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.recommendation.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn cursor_moved(&mut self) {
        self.generation += 1;
        self.recommendation = None;
        // Whatever was in flight can no longer land.
        for verdict in &mut self.verdicts {
            if *verdict == Verdict::Pending {
                *verdict = Verdict::Unchecked;
            }
        }
    }

    /// Play the next move and describe the evaluation to run for it.
    /// `None` at the end of the game.
    pub fn advance(&mut self) -> Option<EvaluationRequest> {
        let fen = self.navigator.fen();
        self.navigator.advance()?;
        self.cursor_moved();

        let ply = self.navigator.cursor() - 1;
        self.verdicts[ply] = Verdict::Pending;
        Some(EvaluationRequest {
            epoch: self.epoch,
            generation: self.generation,
            ply,
            fen,
        })
    }

    pub fn retreat(&mut self) -> bool {
        let moved = self.navigator.retreat();
        if moved {
            self.cursor_moved();
        }
        moved
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), ViewerError> {
        self.navigator.jump_to(index)?;
        self.cursor_moved();
        Ok(())
    }

    /// Record the outcome of an evaluation. Returns `false` if it was stale.
    pub fn apply_evaluation(
        &mut self,
        request: &EvaluationRequest,
        result: Result<BestMove, ViewerError>,
    ) -> bool {
        if request.epoch != self.epoch {
            return false;
        }
        if request.generation != self.generation {
            if self.verdicts.get(request.ply) == Some(&Verdict::Pending) {
                self.verdicts[request.ply] = Verdict::Unchecked;
            }
            tracing::debug!(ply = request.ply, "Dropping stale evaluation");
            return false;
        }

        match result {
            Ok(best) => {
                let matched = moves_match(&self.navigator.moves()[request.ply], &best.mv);
                self.verdicts[request.ply] = if matched {
                    Verdict::Matched
                } else {
                    Verdict::Missed
                };
                self.recommendation = Some(Recommendation {
                    ply: request.ply,
                    best,
                    matched,
                });
            }
            Err(e) => {
                tracing::info!("{e}");
                self.verdicts[request.ply] = Verdict::Unavailable;
            }
        }
        true
    }
}
