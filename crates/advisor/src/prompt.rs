//! Request bodies for the generateContent endpoint.

use serde_json::{json, Value};

use crate::difficulty::Difficulty;

const MOVE_TEMPERATURE: f64 = 0.2;
const MOVE_MAX_TOKENS: u32 = 32;

/// Persona instruction for each strength tier.
pub fn persona(difficulty: Difficulty) -> &'static str {
    match difficulty {
        Difficulty::Weak => {
            "You play chess like a beginner rated around 800. Pick a plausible move a novice \
             would choose; it may be suboptimal, but avoid throwing material away outright."
        }
        Difficulty::Moderate => {
            "You play chess like a club player rated around 1500. Pick a sound, solid move."
        }
        Difficulty::Strong => {
            "You play chess at engine strength. Pick the objectively best move in the position."
        }
    }
}

pub fn move_prompt(fen: &str) -> String {
    format!(
        "Choose a move for the side to move in this chess position. Reply with the move only, \
         in Standard Algebraic Notation such as Nf3, e4, O-O or bxc8=Q, and nothing else.\n\
         FEN: {fen}"
    )
}

pub fn evaluation_prompt(transcript: &str) -> String {
    format!(
        "You are a chess analyst. Judge the last move played in the game below and reply with:\n\
         1. evaluation: one of Brilliant, Great, Good, Inaccuracy, Mistake, Blunder, Even.\n\
         2. winProbabilityWhite: White's winning chances as a percentage from 0 to 100.\n\
         3. explanation: one short sentence.\n\
         Game movetext:\n{transcript}"
    )
}

pub fn move_request_body(fen: &str, difficulty: Difficulty) -> Value {
    json!({
        "systemInstruction": { "parts": [{ "text": persona(difficulty) }] },
        "contents": [{ "role": "user", "parts": [{ "text": move_prompt(fen) }] }],
        "generationConfig": {
            "temperature": MOVE_TEMPERATURE,
            "maxOutputTokens": MOVE_MAX_TOKENS,
        },
    })
}

pub fn evaluation_request_body(transcript: &str) -> Value {
    json!({
        "contents": [{ "role": "user", "parts": [{ "text": evaluation_prompt(transcript) }] }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "evaluation": {
                        "type": "STRING",
                        "enum": ["Brilliant", "Great", "Good", "Inaccuracy", "Mistake", "Blunder", "Even"],
                    },
                    "winProbabilityWhite": { "type": "NUMBER" },
                    "explanation": { "type": "STRING" },
                },
                "required": ["evaluation", "winProbabilityWhite", "explanation"],
            },
        },
    })
}
