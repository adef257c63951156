//! Advisor gateway: the contract between the game session and an external
//! move-suggestion / evaluation service, plus an HTTP implementation backed
//! by a hosted language model.

use std::future::Future;

pub mod config;
pub mod difficulty;
pub mod error;
pub mod evaluation;
pub mod gemini;
pub mod prompt;
pub mod reply;

pub use config::AdvisorConfig;
pub use difficulty::Difficulty;
pub use error::AdvisorError;
pub use evaluation::{parse_evaluation, Evaluation, EvaluationLabel};
pub use gemini::GeminiAdvisor;

/// External move and evaluation capability. Both calls may fail or time
/// out; callers must treat the returned move as untrusted text and check it
/// against the legal moves before applying it.
pub trait Advisor {
    /// Suggest one move in SAN for the side to move in `fen`.
    fn propose_move(
        &self,
        fen: &str,
        difficulty: Difficulty,
    ) -> impl Future<Output = Result<String, AdvisorError>> + Send;

    /// Evaluate the most recent move of a game given as movetext.
    fn evaluate_transcript(
        &self,
        transcript: &str,
    ) -> impl Future<Output = Result<Evaluation, AdvisorError>> + Send;
}
