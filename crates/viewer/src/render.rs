//! Text rendering of the board, the move list and the game picker.

use chess_core::shakmaty::{Chess, Color, File, Position, Rank, Square};
use chess_core::{Game, MoveRecord, PlayerSide, UserOutcome};

use crate::session::Verdict;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveListItem {
    /// Full-move number shown before a white move.
    Number(usize),
    Move {
        index: usize,
        san: String,
        current: bool,
        verdict: Verdict,
    },
}

/// Lay out the move list. The move just before `cursor` is the current one.
pub fn move_list(moves: &[MoveRecord], cursor: usize, verdicts: &[Verdict]) -> Vec<MoveListItem> {
    let mut items = Vec::with_capacity(moves.len() * 3 / 2 + 1);
    for (index, record) in moves.iter().enumerate() {
        if index % 2 == 0 {
            items.push(MoveListItem::Number(index / 2 + 1));
        }
        items.push(MoveListItem::Move {
            index,
            san: record.san.clone(),
            current: index + 1 == cursor,
            verdict: verdicts.get(index).copied().unwrap_or_default(),
        });
    }
    items
}

fn verdict_mark(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Matched => "=",
        Verdict::Missed => "~",
        Verdict::Pending => "…",
        Verdict::Unavailable => "?",
        Verdict::Unchecked => "",
    }
}

/// e.g. `1. e4= e5 2. [Nf3]~ Nc6`
pub fn render_move_list(items: &[MoveListItem]) -> String {
    let mut parts = Vec::with_capacity(items.len());
    for item in items {
        match item {
            MoveListItem::Number(n) => parts.push(format!("{n}.")),
            MoveListItem::Move {
                san,
                current,
                verdict,
                ..
            } => {
                let mark = verdict_mark(*verdict);
                if *current {
                    parts.push(format!("[{san}]{mark}"));
                } else {
                    parts.push(format!("{san}{mark}"));
                }
            }
        }
    }
    parts.join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Highlight {
    None,
    Winner,
    Loser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SideLabel {
    pub text: String,
    pub highlight: Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    /// Position of the game in the archive as served.
    pub index: usize,
    pub white: SideLabel,
    pub black: SideLabel,
    pub result: String,
}

/// Picker entries, newest game first. Only the searched user's side is highlighted.
pub fn game_picker(games: &[Game], username: &str) -> Vec<PickerEntry> {
    let outcome = |game: &Game, color: Color| match game.outcome_for(username) {
        Some((c, UserOutcome::Won)) if c == color => Highlight::Winner,
        Some((c, UserOutcome::Lost)) if c == color => Highlight::Loser,
        _ => Highlight::None,
    };
    let label = |side: &PlayerSide| match side.rating {
        Some(rating) => format!("{} ({rating})", side.username),
        None => side.username.clone(),
    };

    games
        .iter()
        .enumerate()
        .rev()
        .map(|(index, game)| PickerEntry {
            index,
            white: SideLabel {
                text: label(&game.white),
                highlight: outcome(game, Color::White),
            },
            black: SideLabel {
                text: label(&game.black),
                highlight: outcome(game, Color::Black),
            },
            result: format!("{} - {}", game.white.result, game.black.result),
        })
        .collect()
}

fn side_text(side: &SideLabel) -> String {
    match side.highlight {
        Highlight::Winner => format!("{} [W]", side.text),
        Highlight::Loser => format!("{} [L]", side.text),
        Highlight::None => side.text.clone(),
    }
}

pub fn render_game_picker(entries: &[PickerEntry]) -> String {
    let mut out = String::from("Choose a game:\n");
    for entry in entries {
        out.push_str(&format!(
            "  [{}] {} vs {}  Result: {}\n",
            entry.index,
            side_text(&entry.white),
            side_text(&entry.black),
            entry.result
        ));
    }
    out
}

/// ASCII board from white's side, rank 8 on top.
pub fn render_board(pos: &Chess) -> String {
    let board = pos.board();
    let mut out = String::new();
    for rank in (0..8u32).rev() {
        out.push_str(&format!("{} ", rank + 1));
        for file in 0..8u32 {
            let sq = Square::from_coords(File::new(file), Rank::new(rank));
            let c = board.piece_at(sq).map(|p| p.char()).unwrap_or('.');
            out.push(' ');
            out.push(c);
        }
        out.push('\n');
    }
    out.push_str("   a b c d e f g h\n");
    out
}
