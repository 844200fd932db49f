//! PGN decoding into a replayable move sequence.
//!
//! Tokenizing is done by `pgn-reader`, legality and notation by `shakmaty`.
//! Only the main line of the first game in the input is kept.

use std::ops::ControlFlow;

use pgn_reader::{RawTag, Reader, SanPlus, Skip, Visitor};
use serde::Serialize;
use shakmaty::{san::San, CastlingMode, Chess, Move, Position};

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, thiserror::Error)]
pub enum PgnError {
    #[error("No game found in PGN input")]
    Empty,

    #[error("Illegal move at ply {ply}: {san}")]
    IllegalMove { ply: usize, san: String },

    #[error("Games starting from a custom position are not supported")]
    UnsupportedSetup,

    #[error("PGN read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Header values of interest. Everything else is dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GameHeaders {
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>, // "1-0", "0-1", "1/2-1/2", "*"
    pub date: Option<String>,
    pub time_control: Option<String>,
    pub eco: Option<String>,
    pub event: Option<String>,
    pub link: Option<String>,
    pub white_elo: Option<i32>,
    pub black_elo: Option<i32>,
    #[serde(skip)]
    fen: Option<String>,
}

/// A single played move with enough detail to display and replay it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    /// SAN including the `+` / `#` suffix, e.g. "Qxf7#".
    pub san: String,
    /// UCI with standard castling, e.g. "e1g1", "a7a8q".
    pub uci: String,
    pub from: String,
    pub to: String,
    pub piece: char,
    pub captured: Option<char>,
    pub promotion: Option<char>,
    pub is_check: bool,
    pub is_mate: bool,
    #[serde(skip)]
    mv: Move,
}

impl MoveRecord {
    /// Describe `mv` relative to `pos`, then play it on `pos`.
    /// `mv` must be legal in `pos`.
    pub(crate) fn play(pos: &mut Chess, mv: Move) -> Self {
        let san = San::from_move(pos, mv.clone()).to_string();
        let uci = mv.to_uci(CastlingMode::Standard).to_string();
        pos.play_unchecked(mv.clone());

        let is_mate = pos.is_checkmate();
        let is_check = pos.is_check();
        let suffix = if is_mate {
            "#"
        } else if is_check {
            "+"
        } else {
            ""
        };

        Self {
            san: format!("{san}{suffix}"),
            from: uci.get(0..2).unwrap_or_default().to_string(),
            to: uci.get(2..4).unwrap_or_default().to_string(),
            uci,
            piece: mv.role().char(),
            captured: mv.capture().map(|r| r.char()),
            promotion: mv.promotion().map(|r| r.char()),
            is_check,
            is_mate,
            mv,
        }
    }

    /// Apply this move to a position that is in the same state it was recorded from.
    pub fn apply(&self, pos: &mut Chess) {
        pos.play_unchecked(self.mv.clone());
    }
}

#[derive(Debug, Clone)]
pub struct ParsedGame {
    pub headers: GameHeaders,
    pub moves: Vec<MoveRecord>,
}

struct Replay {
    pos: Chess,
    ply: usize,
}

/// Visitor that replays the main line and records every move.
#[derive(Default)]
struct MoveCollector {
    headers: GameHeaders,
    moves: Vec<MoveRecord>,
    saw_tag: bool,
    error: Option<PgnError>,
}

impl Visitor for MoveCollector {
    type Tags = GameHeaders;
    type Movetext = Replay;
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<(), GameHeaders> {
        ControlFlow::Continue(GameHeaders::default())
    }

    fn tag(&mut self, tags: &mut GameHeaders, name: &[u8], value: RawTag<'_>) -> ControlFlow<()> {
        self.saw_tag = true;
        let value = value.decode_utf8_lossy().to_string();
        match name {
            b"White" => tags.white = Some(value),
            b"Black" => tags.black = Some(value),
            b"Result" => tags.result = Some(value),
            b"Date" => tags.date = Some(value),
            b"TimeControl" => tags.time_control = Some(value),
            b"ECO" => tags.eco = Some(value),
            b"Event" => tags.event = Some(value),
            b"Link" => tags.link = Some(value),
            b"WhiteElo" => tags.white_elo = value.parse().ok(),
            b"BlackElo" => tags.black_elo = value.parse().ok(),
            b"FEN" => tags.fen = Some(value),
            _ => {}
        }
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, tags: GameHeaders) -> ControlFlow<(), Replay> {
        let custom_start = tags
            .fen
            .as_deref()
            .is_some_and(|fen| fen.trim() != STANDARD_START_FEN);
        self.headers = tags;

        if custom_start {
            self.error = Some(PgnError::UnsupportedSetup);
            return ControlFlow::Break(());
        }

        ControlFlow::Continue(Replay {
            pos: Chess::default(),
            ply: 0,
        })
    }

    fn san(&mut self, state: &mut Replay, san_plus: SanPlus) -> ControlFlow<()> {
        state.ply += 1;
        match san_plus.san.to_move(&state.pos) {
            Ok(mv) => {
                self.moves.push(MoveRecord::play(&mut state.pos, mv));
                ControlFlow::Continue(())
            }
            Err(_) => {
                self.error = Some(PgnError::IllegalMove {
                    ply: state.ply,
                    san: san_plus.to_string(),
                });
                ControlFlow::Break(())
            }
        }
    }

    // Side lines are never applied to the main-line position.
    fn begin_variation(&mut self, _state: &mut Replay) -> ControlFlow<(), Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn end_game(&mut self, _state: Replay) {}
}

/// Decode the first game of a PGN text.
pub fn parse_pgn(pgn: &str) -> Result<ParsedGame, PgnError> {
    let mut collector = MoveCollector::default();
    let mut reader = Reader::new(pgn.as_bytes());

    if reader.read_game(&mut collector)?.is_none() {
        return Err(PgnError::Empty);
    }
    if let Some(err) = collector.error {
        return Err(err);
    }
    if !collector.saw_tag && collector.moves.is_empty() {
        return Err(PgnError::Empty);
    }

    Ok(ParsedGame {
        headers: collector.headers,
        moves: collector.moves,
    })
}

/// Replay a bare list of SAN moves from the standard start position.
pub fn moves_from_san(sans: &[&str]) -> Result<Vec<MoveRecord>, PgnError> {
    let mut pos = Chess::default();
    let mut moves = Vec::with_capacity(sans.len());

    for (i, text) in sans.iter().enumerate() {
        let illegal = || PgnError::IllegalMove {
            ply: i + 1,
            san: text.to_string(),
        };
        let san: San = text.parse().map_err(|_| illegal())?;
        let mv = san.to_move(&pos).map_err(|_| illegal())?;
        moves.push(MoveRecord::play(&mut pos, mv));
    }

    Ok(moves)
}
