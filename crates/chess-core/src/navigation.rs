//! Cursor over a game's move sequence.
//!
//! The cursor counts the moves applied so far, from 0 to `len()`. The position
//! held by the navigator is always the one reached by replaying the first
//! `cursor` moves from the standard start position.

use shakmaty::{fen::Fen, Chess, EnPassantMode};

use crate::pgn::MoveRecord;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Move index {index} is out of range (game has {len} moves)")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Default)]
pub struct GameNavigator {
    moves: Vec<MoveRecord>,
    cursor: usize,
    position: Chess,
}

impl GameNavigator {
    pub fn new(moves: Vec<MoveRecord>) -> Self {
        Self {
            moves,
            cursor: 0,
            position: Chess::default(),
        }
    }

    /// Replace the move sequence and go back to the start position.
    pub fn load(&mut self, moves: Vec<MoveRecord>) {
        *self = Self::new(moves);
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        fen_of(&self.position)
    }

    /// The move that produced the current position, if any.
    pub fn current_move(&self) -> Option<&MoveRecord> {
        self.cursor.checked_sub(1).and_then(|i| self.moves.get(i))
    }

    /// Play the next move. Returns `None` at the end of the game.
    pub fn advance(&mut self) -> Option<&MoveRecord> {
        let record = self.moves.get(self.cursor)?;
        record.apply(&mut self.position);
        self.cursor += 1;
        Some(record)
    }

    /// Step back one move. Returns `false` at the start of the game.
    pub fn retreat(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.position = self.replay(self.cursor);
        true
    }

    pub fn jump_to(&mut self, index: usize) -> Result<(), NavigationError> {
        if index > self.moves.len() {
            return Err(NavigationError::OutOfRange {
                index,
                len: self.moves.len(),
            });
        }
        self.position = self.replay(index);
        self.cursor = index;
        Ok(())
    }

    /// Position after the first `index` moves, computed from scratch.
    pub fn position_at(&self, index: usize) -> Option<Chess> {
        (index <= self.moves.len()).then(|| self.replay(index))
    }

    /// FEN of the position the current move was played from.
    pub fn fen_before_current(&self) -> Option<String> {
        let before = self.cursor.checked_sub(1)?;
        self.position_at(before).map(|pos| fen_of(&pos))
    }

    fn replay(&self, index: usize) -> Chess {
        let mut pos = Chess::default();
        for record in &self.moves[..index] {
            record.apply(&mut pos);
        }
        pos
    }
}

pub fn fen_of(pos: &Chess) -> String {
    Fen::from_position(pos, EnPassantMode::Legal).to_string()
}
