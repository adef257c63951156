//! Legal move generation, move application and move records.

use std::fmt;
use std::str::FromStr;

use shakmaty::san::{San, SanPlus};
use shakmaty::{CastlingSide, Color, File, Move, Position as _, Role, Square};

use crate::error::ChessError;
use crate::notation;
use crate::position::Position;

/// A move as a user gesture describes it: origin, destination and an
/// optional promotion piece. Castling is the king's two-square step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveSpec {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Role>,
}

impl MoveSpec {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    pub fn with_promotion(mut self, role: Role) -> Self {
        self.promotion = Some(role);
        self
    }
}

/// Coordinate notation: `e2e4`, `e7e8q`.
impl FromStr for MoveSpec {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ChessError::InvalidMoveSpec(s.to_string());

        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(invalid());
        }

        let from: Square = s[0..2].parse().map_err(|_| invalid())?;
        let to: Square = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(Role::from_char(c.to_ascii_lowercase()).ok_or_else(invalid)?),
            None => None,
        };

        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

impl fmt::Display for MoveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(role) = self.promotion {
            write!(f, "{}", role.char())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFlags {
    pub capture: bool,
    pub en_passant: bool,
    pub castle: Option<CastlingSide>,
    pub promotion: bool,
    pub check: bool,
    pub checkmate: bool,
}

/// One applied move. Created by the engine, never edited afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub color: Color,
    pub from: Square,
    pub to: Square,
    pub piece: Role,
    pub captured: Option<Role>,
    pub promotion: Option<Role>,
    /// SAN including the `+`/`#` suffix.
    pub san: String,
    pub flags: MoveFlags,
}

impl MoveRecord {
    pub fn spec(&self) -> MoveSpec {
        MoveSpec {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    pub fn uci(&self) -> String {
        self.spec().to_string()
    }
}

/// All moves for the side to move that do not leave its own king in check.
/// Promotions appear once per promotion piece.
pub fn legal_moves(position: &Position) -> Vec<MoveSpec> {
    position
        .chess()
        .legal_moves()
        .iter()
        .map(spec_of)
        .collect()
}

/// Apply a move given by squares. A pawn reaching the last rank without a
/// promotion choice becomes a queen; a promotion piece on any other move is
/// ignored. Anything not in `legal_moves` is rejected and `position` is
/// left untouched.
pub fn apply_move(
    position: &Position,
    spec: &MoveSpec,
) -> Result<(Position, MoveRecord), ChessError> {
    let legals = position.chess().legal_moves();
    let mv = legals
        .iter()
        .find(|m| matches_spec(m, spec))
        .ok_or_else(|| ChessError::IllegalMove(spec.to_string()))?;

    Ok(play(position, mv))
}

/// Apply a move given in SAN. A check or mate suffix is accepted but not
/// required to match.
pub fn apply_san(position: &Position, text: &str) -> Result<(Position, MoveRecord), ChessError> {
    let text = text.trim();
    if !notation::is_san(text) {
        return Err(ChessError::InvalidNotation(text.to_string()));
    }

    let parsed: SanPlus = text
        .parse()
        .map_err(|_| ChessError::InvalidNotation(text.to_string()))?;
    let mv = parsed
        .san
        .to_move(position.chess())
        .map_err(|e| ChessError::IllegalMove(format!("{text}: {e}")))?;

    Ok(play(position, &mv))
}

fn play(position: &Position, mv: &Move) -> (Position, MoveRecord) {
    let before = position.chess();
    let san = San::from_move(before, *mv);

    let mut after = before.clone();
    after.play_unchecked(*mv);

    let checkmate = after.is_checkmate();
    let check = after.is_check();
    let suffix = if checkmate {
        "#"
    } else if check {
        "+"
    } else {
        ""
    };

    let spec = spec_of(mv);
    let record = MoveRecord {
        color: before.turn(),
        from: spec.from,
        to: spec.to,
        piece: mv.role(),
        captured: mv.capture(),
        promotion: mv.promotion(),
        san: format!("{san}{suffix}"),
        flags: MoveFlags {
            capture: mv.is_capture(),
            en_passant: mv.is_en_passant(),
            castle: castling_side(mv),
            promotion: mv.is_promotion(),
            check,
            checkmate,
        },
    };

    (Position::from_chess(after), record)
}

fn matches_spec(mv: &Move, spec: &MoveSpec) -> bool {
    let candidate = spec_of(mv);
    if candidate.from != spec.from || candidate.to != spec.to {
        return false;
    }
    match candidate.promotion {
        Some(role) => role == spec.promotion.unwrap_or(Role::Queen),
        None => true,
    }
}

fn spec_of(mv: &Move) -> MoveSpec {
    match *mv {
        Move::Normal {
            from,
            to,
            promotion,
            ..
        } => MoveSpec {
            from,
            to,
            promotion,
        },
        Move::EnPassant { from, to } => MoveSpec::new(from, to),
        Move::Castle { king, rook } => MoveSpec::new(king, castle_destination(king, rook)),
        // Drops have no origin square; standard chess never produces them
        Move::Put { to, .. } => MoveSpec::new(to, to),
    }
}

fn castle_destination(king: Square, rook: Square) -> Square {
    let file = if rook.file() > king.file() {
        File::G
    } else {
        File::C
    };
    Square::from_coords(file, king.rank())
}

fn castling_side(mv: &Move) -> Option<CastlingSide> {
    match *mv {
        Move::Castle { king, rook } if rook.file() > king.file() => Some(CastlingSide::KingSide),
        Move::Castle { .. } => Some(CastlingSide::QueenSide),
        _ => None,
    }
}
