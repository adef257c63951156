//! Evaluation summaries returned by the advisor for display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

/// Closed vocabulary for move quality. `Error` marks a degraded result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvaluationLabel {
    Brilliant,
    Great,
    Good,
    Inaccuracy,
    Mistake,
    Blunder,
    Even,
    Error,
}

impl EvaluationLabel {
    pub const ALL: [EvaluationLabel; 8] = [
        EvaluationLabel::Brilliant,
        EvaluationLabel::Great,
        EvaluationLabel::Good,
        EvaluationLabel::Inaccuracy,
        EvaluationLabel::Mistake,
        EvaluationLabel::Blunder,
        EvaluationLabel::Even,
        EvaluationLabel::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationLabel::Brilliant => "Brilliant",
            EvaluationLabel::Great => "Great",
            EvaluationLabel::Good => "Good",
            EvaluationLabel::Inaccuracy => "Inaccuracy",
            EvaluationLabel::Mistake => "Mistake",
            EvaluationLabel::Blunder => "Blunder",
            EvaluationLabel::Even => "Even",
            EvaluationLabel::Error => "Error",
        }
    }
}

impl FromStr for EvaluationLabel {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AdvisorError::Malformed(format!("unknown evaluation label '{wanted}'")))
    }
}

impl fmt::Display for EvaluationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub label: EvaluationLabel,
    /// Percentage in `[0, 100]`.
    pub win_probability_white: f64,
    pub explanation: String,
}

impl Evaluation {
    /// Sentinel shown when the advisor could not produce an evaluation.
    pub fn error(explanation: impl Into<String>) -> Self {
        Self {
            label: EvaluationLabel::Error,
            win_probability_white: 50.0,
            explanation: explanation.into(),
        }
    }

    pub fn even(explanation: impl Into<String>) -> Self {
        Self {
            label: EvaluationLabel::Even,
            win_probability_white: 50.0,
            explanation: explanation.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.label == EvaluationLabel::Error
    }
}

/// Wire shape requested from the model.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvaluation {
    evaluation: String,
    win_probability_white: f64,
    explanation: String,
}

/// Parse the model's JSON reply, optionally wrapped in a code fence.
/// Unknown labels and probabilities outside `[0, 100]` are rejected.
pub fn parse_evaluation(text: &str) -> Result<Evaluation, AdvisorError> {
    let body = strip_code_fence(text.trim());
    if body.is_empty() {
        return Err(AdvisorError::EmptyReply);
    }

    let raw: RawEvaluation = serde_json::from_str(body)?;
    let label: EvaluationLabel = raw.evaluation.parse()?;

    let p = raw.win_probability_white;
    if !p.is_finite() || !(0.0..=100.0).contains(&p) {
        return Err(AdvisorError::Malformed(format!(
            "win probability {p} outside [0, 100]"
        )));
    }

    let explanation = raw.explanation.trim().to_string();
    if explanation.is_empty() {
        return Err(AdvisorError::Malformed("empty explanation".to_string()));
    }

    Ok(Evaluation {
        label,
        win_probability_white: p,
        explanation,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
