//! Advisor backed by the Gemini generateContent HTTP API.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AdvisorConfig;
use crate::difficulty::Difficulty;
use crate::error::AdvisorError;
use crate::evaluation::{parse_evaluation, Evaluation};
use crate::prompt;
use crate::reply::clean_move_reply;
use crate::Advisor;

const RETRY_DELAY: Duration = Duration::from_millis(500);
const MAX_ERROR_DETAIL: usize = 200;

pub struct GeminiAdvisor {
    client: Client,
    config: AdvisorConfig,
}

impl GeminiAdvisor {
    pub fn new(config: AdvisorConfig) -> Result<Self, AdvisorError> {
        let client = Client::builder()
            .user_agent("AdvisedChess/1.0")
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &AdvisorConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Send `body`, retrying transient failures up to `max_attempts` total.
    async fn generate(&self, body: &Value) -> Result<String, AdvisorError> {
        let attempts = self.config.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.generate_once(body).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < attempts => {
                    warn!(attempt, error = %e, "Advisor request failed, retrying");
                    tokio::time::sleep(RETRY_DELAY * attempt).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn generate_once(&self, body: &Value) -> Result<String, AdvisorError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            return Err(AdvisorError::Status {
                status: status.as_u16(),
                detail: detail.chars().take(MAX_ERROR_DETAIL).collect(),
            });
        }

        let data: Value = resp.json().await?;
        extract_text(&data)
    }
}

impl Advisor for GeminiAdvisor {
    async fn propose_move(&self, fen: &str, difficulty: Difficulty) -> Result<String, AdvisorError> {
        let body = prompt::move_request_body(fen, difficulty);
        let raw = self.generate(&body).await?;
        let mv = clean_move_reply(&raw);
        debug!(%difficulty, raw = raw.trim(), mv = %mv, "Advisor proposed move");

        if mv.is_empty() {
            return Err(AdvisorError::EmptyReply);
        }
        Ok(mv)
    }

    async fn evaluate_transcript(&self, transcript: &str) -> Result<Evaluation, AdvisorError> {
        let body = prompt::evaluation_request_body(transcript);
        let raw = self.generate(&body).await?;
        debug!(raw = raw.trim(), "Advisor evaluation reply");
        parse_evaluation(&raw)
    }
}

/// Concatenate the text parts of the first candidate.
pub(crate) fn extract_text(data: &Value) -> Result<String, AdvisorError> {
    let parts = data["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or_else(|| {
            let reason = data["candidates"][0]["finishReason"]
                .as_str()
                .or_else(|| data["promptFeedback"]["blockReason"].as_str())
                .unwrap_or("no candidates");
            AdvisorError::Malformed(format!("reply has no content ({reason})"))
        })?;

    let text: String = parts
        .iter()
        // Thought summaries are not part of the answer
        .filter(|part| !part["thought"].as_bool().unwrap_or(false))
        .filter_map(|part| part["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(AdvisorError::EmptyReply);
    }
    Ok(text)
}
