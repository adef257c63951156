//! Async helpers that run one advisor round trip against a session.
//!
//! Both helpers hold `&mut Session` across the call, so the reply can never
//! be stale. Callers sharing a session between tasks should use
//! `pending_request` / `resolve_*` directly and release their lock while
//! the advisor works.

use advisor::{Advisor, Evaluation};
use chess_core::MoveRecord;
use tracing::debug;

use crate::error::SessionError;
use crate::request::AdvisorRequest;
use crate::session::{Session, EVALUATION_UNAVAILABLE};

/// Ask the advisor for its move and apply it. On failure the session is
/// unchanged and the call can be repeated.
pub async fn play_advisor_turn<A: Advisor>(
    session: &mut Session,
    advisor: &A,
) -> Result<MoveRecord, SessionError> {
    let AdvisorRequest::ProposeMove {
        ticket,
        fen,
        difficulty,
    } = session.request_advisor_move()?
    else {
        return Err(SessionError::AdvisorPending);
    };

    debug!(generation = session.generation(), %fen, %difficulty, "Requesting advisor move");
    let reply = advisor.propose_move(&fen, difficulty).await;

    session
        .resolve_move(ticket, reply)?
        .ok_or_else(|| SessionError::InvariantViolation("advisor reply discarded".to_string()))
}

/// Ask the advisor to evaluate the game so far. Advisor failures come back
/// as an `Error` evaluation rather than an error.
pub async fn request_evaluation<A: Advisor>(
    session: &mut Session,
    advisor: &A,
) -> Result<Evaluation, SessionError> {
    let AdvisorRequest::Evaluate { ticket, transcript } = session.begin_evaluation()? else {
        return Err(SessionError::AdvisorPending);
    };

    debug!(generation = session.generation(), %transcript, "Requesting evaluation");
    let reply = advisor.evaluate_transcript(&transcript).await;
    Ok(session
        .resolve_evaluation(ticket, reply)
        .unwrap_or_else(|| Evaluation::error(EVALUATION_UNAVAILABLE)))
}
