#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use advisor::{Advisor, AdvisorError, Difficulty, Evaluation};
use chess_core::Position;
use game_session::Session;

/// In-memory advisor that answers from a queue of canned replies and
/// records every request it receives.
#[derive(Default)]
pub struct ScriptedAdvisor {
    moves: Mutex<VecDeque<Result<String, AdvisorError>>>,
    evaluations: Mutex<VecDeque<Result<Evaluation, AdvisorError>>>,
    move_requests: Mutex<Vec<(String, Difficulty)>>,
    evaluation_requests: Mutex<Vec<String>>,
}

impl ScriptedAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_move(&self, san: &str) -> &Self {
        self.moves.lock().unwrap().push_back(Ok(san.to_string()));
        self
    }

    pub fn push_move_error(&self, error: AdvisorError) -> &Self {
        self.moves.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn push_evaluation(&self, reply: Result<Evaluation, AdvisorError>) -> &Self {
        self.evaluations.lock().unwrap().push_back(reply);
        self
    }

    pub fn move_requests(&self) -> Vec<(String, Difficulty)> {
        self.move_requests.lock().unwrap().clone()
    }

    pub fn evaluation_requests(&self) -> Vec<String> {
        self.evaluation_requests.lock().unwrap().clone()
    }
}

impl Advisor for ScriptedAdvisor {
    async fn propose_move(&self, fen: &str, difficulty: Difficulty) -> Result<String, AdvisorError> {
        self.move_requests
            .lock()
            .unwrap()
            .push((fen.to_string(), difficulty));
        let next = self.moves.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(AdvisorError::Unavailable("script exhausted".to_string())))
    }

    async fn evaluate_transcript(&self, transcript: &str) -> Result<Evaluation, AdvisorError> {
        self.evaluation_requests
            .lock()
            .unwrap()
            .push(transcript.to_string());
        let next = self.evaluations.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(AdvisorError::Unavailable("script exhausted".to_string())))
    }
}

/// Play SAN moves as the human side(s); panics on the first rejection.
pub fn play(session: &mut Session, sans: &[&str]) {
    for san in sans {
        session
            .submit_san(san)
            .unwrap_or_else(|e| panic!("{san} rejected: {e}"));
    }
}

/// Positions worth walking from, besides the standard start.
pub const WALK_STARTS: &[&str] = &[
    chess_core::STANDARD_START_FEN,
    // Kiwipete: castling both sides, pins, en passant chances
    "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
    // Promotions for both sides
    "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
    // En passant discovered-check edge case
    "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
];

pub fn position(fen: &str) -> Position {
    Position::from_fen(fen).unwrap_or_else(|e| panic!("bad test FEN {fen}: {e}"))
}
