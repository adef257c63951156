//! Immutable chess position. Every move yields a new value; nothing is
//! mutated in place, so a session can keep one snapshot per ply.

use std::fmt;

use shakmaty::fen::Fen;
use shakmaty::{
    CastlingMode, CastlingSide, Chess, Color, EnPassantMode, File, Piece, Position as _, Rank,
    Square,
};

use crate::error::ChessError;
use crate::moves::{self, MoveSpec};

pub const STANDARD_START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Castling availability per color and side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_king_side: bool,
    pub white_queen_side: bool,
    pub black_king_side: bool,
    pub black_queen_side: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Position {
    chess: Chess,
}

impl Position {
    /// The standard initial position.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Load a position from FEN. Positions without exactly one king per
    /// color, or with the side not to move in check, are rejected.
    pub fn from_fen(fen: &str) -> Result<Self, ChessError> {
        let fen = fen.trim();
        let parsed: Fen = fen
            .parse()
            .map_err(|e| ChessError::InvalidFen(format!("'{fen}': {e}")))?;
        let chess: Chess = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| ChessError::InvalidPosition(format!("'{fen}': {e}")))?;
        Ok(Self { chess })
    }

    pub(crate) fn from_chess(chess: Chess) -> Self {
        Self { chess }
    }

    pub(crate) fn chess(&self) -> &Chess {
        &self.chess
    }

    pub fn fen(&self) -> String {
        Fen::from_position(&self.chess, EnPassantMode::Legal).to_string()
    }

    pub fn is_standard_start(&self) -> bool {
        self.fen() == STANDARD_START_FEN
    }

    pub fn turn(&self) -> Color {
        self.chess.turn()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.chess.board().piece_at(square)
    }

    pub fn is_check(&self) -> bool {
        self.chess.is_check()
    }

    pub fn castling_rights(&self) -> CastlingRights {
        let castles = self.chess.castles();
        CastlingRights {
            white_king_side: castles.has(Color::White, CastlingSide::KingSide),
            white_queen_side: castles.has(Color::White, CastlingSide::QueenSide),
            black_king_side: castles.has(Color::Black, CastlingSide::KingSide),
            black_queen_side: castles.has(Color::Black, CastlingSide::QueenSide),
        }
    }

    /// En-passant target square, reported only when a capture onto it is legal.
    pub fn en_passant_target(&self) -> Option<Square> {
        self.chess.ep_square(EnPassantMode::Legal)
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.chess.halfmoves()
    }

    pub fn fullmove_number(&self) -> u32 {
        self.chess.fullmoves().get()
    }

    /// Identity used for repetition counting: board, side to move, castling
    /// rights and en-passant availability. Move counters are excluded.
    pub fn repetition_key(&self) -> String {
        self.fen()
            .split_whitespace()
            .take(4)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn legal_moves(&self) -> Vec<MoveSpec> {
        moves::legal_moves(self)
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.fen() == other.fen()
    }
}

impl Eq for Position {}

/// Plain-text diagram, rank 8 at the top. White pieces are uppercase.
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u32).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u32 {
                let square = Square::from_coords(File::new(file), Rank::new(rank));
                let symbol = self.piece_at(square).map(|p| p.char()).unwrap_or('.');
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
