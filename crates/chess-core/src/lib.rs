pub use shakmaty;

pub mod game_data;
pub mod navigation;
pub mod pgn;
pub mod uci;

pub use game_data::{Game, PlayerSide, UserOutcome};
pub use navigation::{GameNavigator, NavigationError};
pub use pgn::{parse_pgn, GameHeaders, MoveRecord, ParsedGame, PgnError};
