//! Session error types

use chess_core::{ChessError, Outcome};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No game in progress")]
    NotStarted,

    #[error("Game is over: {0}")]
    GameOver(Outcome),

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Waiting for the advisor")]
    AdvisorPending,

    #[error("It is not the advisor's turn")]
    NotAdvisorTurn,

    #[error("{0}")]
    IllegalMove(ChessError),

    #[error("Advisor unavailable: {0}")]
    AdvisorUnavailable(String),

    #[error("Advisor proposed an unusable move: '{0}'")]
    AdvisorIllegalMove(String),

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
}

/// Coarse classification for presentation and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Request not allowed in the current state (turn, pending request, game over)
    InvalidState,
    IllegalMove,
    AdvisorUnavailable,
    AdvisorIllegalMove,
    /// Programming defect; never caused by user input
    InvariantViolation,
}

impl SessionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::NotStarted
            | SessionError::GameOver(_)
            | SessionError::NotYourTurn
            | SessionError::AdvisorPending
            | SessionError::NotAdvisorTurn => ErrorKind::InvalidState,
            SessionError::IllegalMove(_) => ErrorKind::IllegalMove,
            SessionError::AdvisorUnavailable(_) => ErrorKind::AdvisorUnavailable,
            SessionError::AdvisorIllegalMove(_) => ErrorKind::AdvisorIllegalMove,
            SessionError::InvariantViolation(_) => ErrorKind::InvariantViolation,
        }
    }

    /// Advisor failures leave the session unchanged; asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::AdvisorUnavailable | ErrorKind::AdvisorIllegalMove
        )
    }
}
