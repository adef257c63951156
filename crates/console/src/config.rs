//! Console configuration from environment variables

use std::env;
use std::path::PathBuf;

use advisor::Difficulty;
use tracing::warn;

#[derive(Clone, Debug)]
pub struct ConsoleConfig {
    /// Directory `export` writes PGN files into
    pub export_dir: PathBuf,

    /// Tier used by `new advised` when none is given
    pub difficulty: Difficulty,

    /// Name recorded for the human in exported PGN
    pub player_name: String,

    /// Evaluate after every move when an advisor is configured
    pub auto_evaluate: bool,
}

impl ConsoleConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let difficulty = match lookup("CHESS_DIFFICULTY") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Unknown CHESS_DIFFICULTY, using moderate");
                Difficulty::default()
            }),
            None => Difficulty::default(),
        };

        Self {
            export_dir: lookup("CHESS_EXPORT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            difficulty,
            player_name: lookup("CHESS_PLAYER_NAME")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| "Player".to_string()),
            auto_evaluate: lookup("CHESS_AUTO_EVAL")
                .map(|v| !matches!(v.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::from_lookup(|_| None);
        assert_eq!(config.export_dir, PathBuf::from("."));
        assert_eq!(config.difficulty, Difficulty::Moderate);
        assert_eq!(config.player_name, "Player");
        assert!(config.auto_evaluate);
    }

    #[test]
    fn test_overrides() {
        let config = ConsoleConfig::from_lookup(|key| match key {
            "CHESS_EXPORT_DIR" => Some("/tmp/games".to_string()),
            "CHESS_DIFFICULTY" => Some("hard".to_string()),
            "CHESS_PLAYER_NAME" => Some(" Ada ".to_string()),
            "CHESS_AUTO_EVAL" => Some("off".to_string()),
            _ => None,
        });
        assert_eq!(config.export_dir, PathBuf::from("/tmp/games"));
        assert_eq!(config.difficulty, Difficulty::Strong);
        assert_eq!(config.player_name, "Ada");
        assert!(!config.auto_evaluate);
    }

    #[test]
    fn test_bad_difficulty_falls_back() {
        let config = ConsoleConfig::from_lookup(|key| {
            (key == "CHESS_DIFFICULTY").then(|| "grandmaster".to_string())
        });
        assert_eq!(config.difficulty, Difficulty::Moderate);
    }
}
