//! Advisor error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Advisor returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("Advisor returned an empty reply")]
    EmptyReply,

    #[error("Malformed advisor reply: {0}")]
    Malformed(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Advisor unavailable: {0}")]
    Unavailable(String),
}

impl AdvisorError {
    /// Worth another attempt: network failures, rate limiting, server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            AdvisorError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            AdvisorError::Status { status, .. } => *status == 429 || *status >= 500,
            AdvisorError::Unavailable(_) => true,
            _ => false,
        }
    }
}
