//! Chess rules core: positions, legal moves, move records, terminal states,
//! and the PGN/movetext codec used by the game session and the advisor.
//!
//! Board rules are delegated to shakmaty; this crate adds the record and
//! notation layer the rest of the workspace consumes.

pub mod error;
pub mod game_data;
pub mod moves;
pub mod notation;
pub mod outcome;
pub mod pgn;
pub mod position;

pub use error::ChessError;
pub use game_data::GameMetadata;
pub use moves::{apply_move, apply_san, legal_moves, MoveFlags, MoveRecord, MoveSpec};
pub use outcome::{is_terminal, repetitions, Outcome};
pub use position::{CastlingRights, Position, STANDARD_START_FEN};

pub use shakmaty::{CastlingSide, Color, Role, Square};
