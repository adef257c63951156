//! Chess core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    #[error("Invalid FEN: {0}")]
    InvalidFen(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid move spec: {0}")]
    InvalidMoveSpec(String),

    #[error("Illegal move: {0}")]
    IllegalMove(String),

    #[error("Invalid notation: {0}")]
    InvalidNotation(String),

    #[error("Transcript error: {0}")]
    Transcript(String),
}
