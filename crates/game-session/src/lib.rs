//! Game session: move history, turn bookkeeping, undo, and the
//! single-flight advisor request guard around the chess core.
//!
//! The session never performs I/O. It hands out [`AdvisorRequest`]s and
//! accepts replies tagged with the request's [`Ticket`]; `driver` has async
//! helpers that run one round trip against an [`advisor::Advisor`].

pub mod driver;
pub mod error;
pub mod mode;
pub mod request;
pub mod session;

pub use driver::{play_advisor_turn, request_evaluation};
pub use error::{ErrorKind, SessionError};
pub use mode::GameMode;
pub use request::{AdvisorRequest, RequestKind, Ticket};
pub use session::{Session, SessionState, EVALUATION_UNAVAILABLE};
