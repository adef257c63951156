use serde::{Deserialize, Serialize};

/// PGN header values for an exported or imported game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub event: String,
    pub site: String,
    pub date: String, // "YYYY.MM.DD", "????.??.??" when unknown
    pub round: String,
    pub white: String,
    pub black: String,
    pub result: String, // "1-0", "0-1", "1/2-1/2", "*"
}

impl Default for GameMetadata {
    fn default() -> Self {
        Self {
            event: "Casual Game".to_string(),
            site: "?".to_string(),
            date: "????.??.??".to_string(),
            round: "-".to_string(),
            white: "?".to_string(),
            black: "?".to_string(),
            result: "*".to_string(),
        }
    }
}
