//! Terminal-state detection.

use std::fmt;

use shakmaty::{Color, Position as _};

use crate::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Outcome::Checkmate { winner } => Some(*winner),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.winner().is_none()
    }

    /// PGN result token.
    pub fn result(&self) -> &'static str {
        match self.winner() {
            Some(Color::White) => "1-0",
            Some(Color::Black) => "0-1",
            None => "1/2-1/2",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Outcome::Checkmate { .. } => "Checkmate",
            Outcome::Stalemate => "Stalemate",
            Outcome::InsufficientMaterial => "Draw (insufficient material)",
            Outcome::FiftyMoveRule => "Draw (fifty-move rule)",
            Outcome::ThreefoldRepetition => "Threefold Repetition",
        };
        f.write_str(label)
    }
}

/// Classify `position` given the positions that preceded it in the game
/// (oldest first, `position` itself excluded). `None` while play continues.
pub fn is_terminal(position: &Position, history: &[Position]) -> Option<Outcome> {
    let chess = position.chess();

    if chess.legal_moves().is_empty() {
        return Some(if chess.is_check() {
            Outcome::Checkmate {
                winner: !chess.turn(),
            }
        } else {
            Outcome::Stalemate
        });
    }

    if chess.is_insufficient_material() {
        return Some(Outcome::InsufficientMaterial);
    }

    if chess.halfmoves() >= 100 {
        return Some(Outcome::FiftyMoveRule);
    }

    if repetitions(position, history) >= 3 {
        return Some(Outcome::ThreefoldRepetition);
    }

    None
}

/// How many times `position` has occurred, counting itself. Only positions
/// since the last capture or pawn move can match.
pub fn repetitions(position: &Position, history: &[Position]) -> usize {
    let key = position.repetition_key();
    let window = position.halfmove_clock() as usize;

    1 + history
        .iter()
        .rev()
        .take(window)
        .filter(|p| p.repetition_key() == key)
        .count()
}
