use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Qualitative playing strength requested from the advisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Weak,
    #[default]
    Moderate,
    Strong,
}

impl FromStr for Difficulty {
    type Err = String;

    /// Accepts the tier names and the easy/medium/hard aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weak" | "easy" => Ok(Difficulty::Weak),
            "moderate" | "medium" => Ok(Difficulty::Moderate),
            "strong" | "hard" => Ok(Difficulty::Strong),
            other => Err(format!("unknown difficulty '{other}'")),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Weak => "weak",
            Difficulty::Moderate => "moderate",
            Difficulty::Strong => "strong",
        })
    }
}
