//! Advisor requests handed out by the session.

use advisor::Difficulty;

/// Identifies one advisor request. A reply is applied only if its ticket
/// matches the request the session is still waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub(crate) generation: u64,
    pub(crate) sequence: u64,
}

impl Ticket {
    /// Game generation the request belongs to; bumped by every new game.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    ProposeMove,
    Evaluate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisorRequest {
    ProposeMove {
        ticket: Ticket,
        fen: String,
        difficulty: Difficulty,
    },
    Evaluate {
        ticket: Ticket,
        transcript: String,
    },
}

impl AdvisorRequest {
    pub fn ticket(&self) -> Ticket {
        match self {
            AdvisorRequest::ProposeMove { ticket, .. } | AdvisorRequest::Evaluate { ticket, .. } => {
                *ticket
            }
        }
    }

    pub fn kind(&self) -> RequestKind {
        match self {
            AdvisorRequest::ProposeMove { .. } => RequestKind::ProposeMove,
            AdvisorRequest::Evaluate { .. } => RequestKind::Evaluate,
        }
    }
}
