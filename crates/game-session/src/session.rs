//! Game session state machine.

use advisor::{AdvisorError, Evaluation};
use chess_core::pgn;
use chess_core::{
    apply_move, apply_san, is_terminal, ChessError, Color, GameMetadata, MoveRecord, MoveSpec,
    Outcome, Position,
};
use tracing::{debug, error, info, warn};

use crate::error::SessionError;
use crate::mode::GameMode;
use crate::request::{AdvisorRequest, RequestKind, Ticket};

/// Explanation attached to the fallback evaluation when the advisor fails.
pub const EVALUATION_UNAVAILABLE: &str = "Could not get evaluation from the advisor.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No game has been started yet.
    Idle,
    AwaitingHuman,
    /// Advised mode only: the advisor's color is to move.
    AwaitingAdvisor,
    Terminal(Outcome),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    ticket: Ticket,
    kind: RequestKind,
}

/// One game plus the bookkeeping around it.
///
/// `positions[0]` is the starting position and `positions[i + 1]` is the
/// position after `history[i]`, so `positions.len() == history.len() + 1`.
/// At most one advisor request is outstanding at a time. With
/// `evaluate_moves` set, every move is followed by an evaluation request,
/// and the advisor's reply to a human move waits until that evaluation has
/// been resolved.
#[derive(Debug, Clone)]
pub struct Session {
    mode: GameMode,
    started: bool,
    evaluate_moves: bool,
    positions: Vec<Position>,
    history: Vec<MoveRecord>,
    outcome: Option<Outcome>,
    generation: u64,
    sequence: u64,
    pending: Option<Pending>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            started: false,
            evaluate_moves: false,
            positions: vec![Position::standard()],
            history: Vec::new(),
            outcome: None,
            generation: 0,
            sequence: 0,
            pending: None,
        }
    }
}

impl Session {
    /// Session with a game from the standard start already begun.
    pub fn new(mode: GameMode) -> Self {
        let mut session = Self::default();
        session.new_game(mode);
        session
    }

    /// Request an evaluation after every move. Kept across new games.
    pub fn set_evaluate_moves(&mut self, on: bool) {
        self.evaluate_moves = on;
    }

    pub fn evaluates_moves(&self) -> bool {
        self.evaluate_moves
    }

    pub fn new_game(&mut self, mode: GameMode) {
        self.new_game_from(mode, Position::standard());
    }

    /// Start over from `start`. Any outstanding advisor request is
    /// abandoned; its reply will be discarded when it arrives.
    pub fn new_game_from(&mut self, mode: GameMode, start: Position) {
        self.generation += 1;
        if let Some(pending) = self.pending.take() {
            debug!(ticket = ?pending.ticket, "Abandoning advisor request for previous game");
        }

        self.mode = mode;
        self.started = true;
        self.outcome = is_terminal(&start, &[]);
        self.positions = vec![start];
        self.history.clear();

        info!(
            generation = self.generation,
            mode = ?self.mode,
            custom_start = !self.start_position().is_standard_start(),
            "New game"
        );
        self.schedule_advisor_move_if_due();
    }

    // --- accessors ---

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn state(&self) -> SessionState {
        if !self.started {
            SessionState::Idle
        } else if let Some(outcome) = self.outcome {
            SessionState::Terminal(outcome)
        } else if self.is_advisor_to_move() {
            SessionState::AwaitingAdvisor
        } else {
            SessionState::AwaitingHuman
        }
    }

    /// Current position.
    pub fn position(&self) -> &Position {
        // Never empty: every constructor seeds the starting position
        &self.positions[self.positions.len() - 1]
    }

    pub fn start_position(&self) -> &Position {
        &self.positions[0]
    }

    /// Positions from the start through the current one.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn turn(&self) -> Color {
        self.position().turn()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// True while an advisor request is outstanding.
    pub fn is_thinking(&self) -> bool {
        self.pending.is_some()
    }

    pub fn legal_moves(&self) -> Vec<MoveSpec> {
        if self.outcome.is_some() {
            return Vec::new();
        }
        self.position().legal_moves()
    }

    /// The outstanding advisor request, if any.
    pub fn pending_request(&self) -> Option<AdvisorRequest> {
        self.pending.map(|pending| self.build_request(pending))
    }

    // --- human input ---

    pub fn submit_move(&mut self, spec: &MoveSpec) -> Result<MoveRecord, SessionError> {
        self.submit_with(|position| apply_move(position, spec))
    }

    pub fn submit_san(&mut self, san: &str) -> Result<MoveRecord, SessionError> {
        self.submit_with(|position| apply_san(position, san))
    }

    fn submit_with<F>(&mut self, apply: F) -> Result<MoveRecord, SessionError>
    where
        F: FnOnce(&Position) -> Result<(Position, MoveRecord), ChessError>,
    {
        self.ensure_accepting_input()?;
        if self.is_advisor_to_move() {
            return Err(SessionError::NotYourTurn);
        }

        let (next, record) = apply(self.position()).map_err(|e| {
            debug!(error = %e, "Rejected human move");
            SessionError::IllegalMove(e)
        })?;
        self.push(next, record.clone());
        if self.evaluate_moves {
            self.issue(RequestKind::Evaluate);
        } else {
            self.schedule_advisor_move_if_due();
        }
        Ok(record)
    }

    /// Take back moves. Local mode removes one ply. Advised mode removes
    /// plies until the human is to move again (normally two). Returns the
    /// number of plies removed.
    pub fn undo(&mut self) -> Result<usize, SessionError> {
        self.ensure_accepting_input()?;

        let mut removed = 0;
        match self.mode.human_color() {
            None => {
                if self.pop()? {
                    removed = 1;
                }
            }
            Some(human) => {
                while removed < 2 && self.pop()? {
                    removed += 1;
                    if self.turn() == human {
                        break;
                    }
                }
            }
        }

        self.outcome = None;
        if removed > 0 {
            debug!(removed, ply = self.history.len(), "Undo");
        }
        self.schedule_advisor_move_if_due();
        Ok(removed)
    }

    // --- advisor moves ---

    /// The move request for the advisor's turn. Returns the outstanding
    /// request when one is already in flight, or issues a new one (after a
    /// failed attempt, for example).
    pub fn request_advisor_move(&mut self) -> Result<AdvisorRequest, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if let Some(outcome) = self.outcome {
            return Err(SessionError::GameOver(outcome));
        }
        if let Some(pending) = self.pending {
            return match pending.kind {
                RequestKind::ProposeMove => Ok(self.build_request(pending)),
                RequestKind::Evaluate => Err(SessionError::AdvisorPending),
            };
        }
        if !self.is_advisor_to_move() {
            return Err(SessionError::NotAdvisorTurn);
        }

        let pending = self.issue(RequestKind::ProposeMove);
        Ok(self.build_request(pending))
    }

    /// Apply the advisor's reply to a move request.
    ///
    /// `Ok(None)` means the ticket was stale and nothing changed. Failures
    /// and unusable moves also leave the position unchanged; the request can
    /// be reissued with [`Session::request_advisor_move`].
    pub fn resolve_move(
        &mut self,
        ticket: Ticket,
        reply: Result<String, AdvisorError>,
    ) -> Result<Option<MoveRecord>, SessionError> {
        if !self.take_pending(ticket, RequestKind::ProposeMove) {
            return Ok(None);
        }
        if self.outcome.is_some() || !self.is_advisor_to_move() {
            error!(?ticket, state = ?self.state(), "Advisor move resolved outside the advisor's turn");
            return Err(SessionError::InvariantViolation(
                "advisor move request outstanding outside the advisor's turn".to_string(),
            ));
        }

        let text = match reply {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Advisor move request failed");
                return Err(SessionError::AdvisorUnavailable(e.to_string()));
            }
        };

        let san = text.trim();
        match apply_san(self.position(), san) {
            Ok((next, record)) => {
                self.push(next, record.clone());
                if self.evaluate_moves {
                    self.issue(RequestKind::Evaluate);
                }
                Ok(Some(record))
            }
            Err(e) => {
                warn!(reply = san, fen = %self.position().fen(), error = %e, "Advisor proposed an unusable move");
                Err(SessionError::AdvisorIllegalMove(san.to_string()))
            }
        }
    }

    // --- evaluation ---

    /// Ask for an evaluation of the game so far. Allowed after the game
    /// has ended. Returns the outstanding evaluation request if there is
    /// one; refused while a move request is in flight.
    pub fn begin_evaluation(&mut self) -> Result<AdvisorRequest, SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if let Some(pending) = self.pending {
            return match pending.kind {
                RequestKind::Evaluate => Ok(self.build_request(pending)),
                RequestKind::ProposeMove => Err(SessionError::AdvisorPending),
            };
        }
        let pending = self.issue(RequestKind::Evaluate);
        Ok(self.build_request(pending))
    }

    /// Accept the reply to an evaluation request. Failures degrade to an
    /// `Error` evaluation. `None` means the ticket was stale.
    pub fn resolve_evaluation(
        &mut self,
        ticket: Ticket,
        reply: Result<Evaluation, AdvisorError>,
    ) -> Option<Evaluation> {
        if !self.take_pending(ticket, RequestKind::Evaluate) {
            return None;
        }

        let evaluation = reply.unwrap_or_else(|e| {
            warn!(error = %e, "Evaluation request failed");
            Evaluation::error(EVALUATION_UNAVAILABLE)
        });
        self.schedule_advisor_move_if_due();
        Some(evaluation)
    }

    // --- export ---

    /// Numbered movetext of the game so far.
    pub fn export_transcript(&self) -> String {
        pgn::movetext(self.start_position(), &self.history)
    }

    pub fn export_pgn(&self, metadata: &GameMetadata) -> String {
        pgn::export_pgn(
            metadata,
            self.start_position(),
            &self.history,
            self.outcome,
        )
    }

    /// FEN of the current position.
    pub fn fen(&self) -> String {
        self.position().fen()
    }

    // --- internals ---

    fn ensure_accepting_input(&self) -> Result<(), SessionError> {
        if !self.started {
            return Err(SessionError::NotStarted);
        }
        if let Some(outcome) = self.outcome {
            return Err(SessionError::GameOver(outcome));
        }
        if self.pending.is_some() {
            return Err(SessionError::AdvisorPending);
        }
        Ok(())
    }

    fn is_advisor_to_move(&self) -> bool {
        self.started && self.mode.advisor_color() == Some(self.turn())
    }

    fn schedule_advisor_move_if_due(&mut self) {
        if self.outcome.is_none() && self.pending.is_none() && self.is_advisor_to_move() {
            let pending = self.issue(RequestKind::ProposeMove);
            debug!(ticket = ?pending.ticket, "Advisor move requested");
        }
    }

    fn issue(&mut self, kind: RequestKind) -> Pending {
        self.sequence += 1;
        let pending = Pending {
            ticket: Ticket {
                generation: self.generation,
                sequence: self.sequence,
            },
            kind,
        };
        self.pending = Some(pending);
        pending
    }

    /// Clear the outstanding request if `ticket` matches it.
    fn take_pending(&mut self, ticket: Ticket, kind: RequestKind) -> bool {
        match self.pending {
            Some(pending) if pending.ticket == ticket && pending.kind == kind => {
                self.pending = None;
                true
            }
            _ => {
                warn!(
                    ?ticket,
                    ?kind,
                    generation = self.generation,
                    "Discarding stale advisor response"
                );
                false
            }
        }
    }

    fn build_request(&self, pending: Pending) -> AdvisorRequest {
        match pending.kind {
            RequestKind::ProposeMove => AdvisorRequest::ProposeMove {
                ticket: pending.ticket,
                fen: self.position().fen(),
                difficulty: self.mode.difficulty().unwrap_or_default(),
            },
            RequestKind::Evaluate => AdvisorRequest::Evaluate {
                ticket: pending.ticket,
                transcript: self.export_transcript(),
            },
        }
    }

    fn push(&mut self, next: Position, record: MoveRecord) {
        debug!(
            ply = self.history.len() + 1,
            color = ?record.color,
            san = %record.san,
            "Move played"
        );
        self.history.push(record);
        self.positions.push(next);

        if let Some((current, earlier)) = self.positions.split_last() {
            self.outcome = is_terminal(current, earlier);
        }
        if let Some(outcome) = self.outcome {
            info!(%outcome, result = outcome.result(), plies = self.history.len(), "Game over");
        }
    }

    /// Remove the last ply. `Ok(false)` when there is nothing to remove.
    fn pop(&mut self) -> Result<bool, SessionError> {
        if self.history.is_empty() {
            return Ok(false);
        }
        if self.positions.len() != self.history.len() + 1 {
            error!(
                positions = self.positions.len(),
                history = self.history.len(),
                "Position list out of step with move history"
            );
            return Err(SessionError::InvariantViolation(
                "position list out of step with move history".to_string(),
            ));
        }
        self.history.pop();
        self.positions.pop();
        Ok(true)
    }
}
