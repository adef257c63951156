//! Normalisation of free-text move replies.

use std::sync::LazyLock;

use regex::Regex;

static MOVE_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\s*\.+\s*").expect("move number pattern"));

const WRAPPERS: &[char] = &['"', '\'', '`', '*'];

/// Reduce a model reply to a single move token: first non-empty line,
/// without quotes, markdown, a leading move number or trailing punctuation.
/// Zero-style castling is mapped to letter O. Validity is not checked here.
pub fn clean_move_reply(raw: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("```"))
        .unwrap_or("");
    let line = line.trim_matches(WRAPPERS);
    let line = MOVE_NUMBER_RE.replace(line, "");

    let token = line
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_matches(WRAPPERS)
        .trim_end_matches(['.', ',', '!', '?']);

    match token {
        "0-0" => "O-O".to_string(),
        "0-0-0" => "O-O-O".to_string(),
        "0-0+" => "O-O+".to_string(),
        "0-0-0+" => "O-O-O+".to_string(),
        "0-0#" => "O-O#".to_string(),
        "0-0-0#" => "O-O-O#".to_string(),
        other => other.to_string(),
    }
}
