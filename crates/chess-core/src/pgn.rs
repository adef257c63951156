//! PGN utilities: movetext and full-game export, lightweight regex-based
//! header/move extraction, and replay of a transcript into positions.

use std::sync::LazyLock;

use regex::Regex;
use shakmaty::Color;
use tracing::debug;

use crate::error::ChessError;
use crate::game_data::GameMetadata;
use crate::moves::{apply_san, MoveRecord};
use crate::outcome::Outcome;
use crate::position::Position;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"((?:[^"\\]|\\.)*)"\]"#).expect("header pattern"));
static HEADER_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("header line pattern"));
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").expect("comment pattern"));
static VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").expect("variation pattern"));
static MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[KQRBN]?[a-h]?[1-8]?x?[a-h][1-8](?:=[QRBN])?[+#]?|O-O-O[+#]?|O-O[+#]?")
        .expect("move pattern")
});

/// Headers found in a PGN, plus the starting FEN when `SetUp` is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PgnHeaders {
    pub metadata: GameMetadata,
    pub fen: Option<String>,
}

/// A transcript replayed move by move. `positions[0]` is the start,
/// `positions[i + 1]` the position after `records[i]`.
#[derive(Debug, Clone)]
pub struct Replay {
    pub metadata: GameMetadata,
    pub positions: Vec<Position>,
    pub records: Vec<MoveRecord>,
}

impl Replay {
    pub fn start(&self) -> &Position {
        &self.positions[0]
    }

    pub fn final_position(&self) -> &Position {
        self.positions.last().unwrap_or(&self.positions[0])
    }
}

/// Numbered movetext: `1. e4 e5 2. Nf3`. A game whose first recorded move
/// is Black's starts with `N...`.
pub fn movetext(start: &Position, records: &[MoveRecord]) -> String {
    let mut tokens: Vec<String> = Vec::with_capacity(records.len() + records.len() / 2 + 1);
    let mut number = start.fullmove_number();

    for (i, record) in records.iter().enumerate() {
        match record.color {
            Color::White => tokens.push(format!("{number}.")),
            Color::Black if i == 0 => tokens.push(format!("{number}...")),
            Color::Black => {}
        }
        tokens.push(record.san.clone());
        if record.color == Color::Black {
            number += 1;
        }
    }

    tokens.join(" ")
}

/// Full PGN: seven-tag roster (with `SetUp`/`FEN` for non-standard
/// starts), a blank line, movetext and the result token.
pub fn export_pgn(
    metadata: &GameMetadata,
    start: &Position,
    records: &[MoveRecord],
    outcome: Option<Outcome>,
) -> String {
    let result = outcome.map(|o| o.result()).unwrap_or("*");

    let mut tags = vec![
        ("Event", metadata.event.clone()),
        ("Site", metadata.site.clone()),
        ("Date", metadata.date.clone()),
        ("Round", metadata.round.clone()),
        ("White", metadata.white.clone()),
        ("Black", metadata.black.clone()),
        ("Result", result.to_string()),
    ];
    if !start.is_standard_start() {
        tags.push(("SetUp", "1".to_string()));
        tags.push(("FEN", start.fen()));
    }

    let mut out = String::new();
    for (name, value) in tags {
        out.push_str(&format!("[{name} \"{}\"]\n", escape_tag(&value)));
    }
    out.push('\n');

    let moves = movetext(start, records);
    if moves.is_empty() {
        out.push_str(result);
    } else {
        out.push_str(&format!("{moves} {result}"));
    }
    out.push('\n');
    out
}

fn escape_tag(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn unescape_tag(value: &str) -> String {
    value.replace("\\\"", "\"").replace("\\\\", "\\")
}

/// Parse PGN tag pairs. Unknown tags are ignored; missing ones keep their
/// defaults.
pub fn parse_headers(pgn: &str) -> PgnHeaders {
    let mut metadata = GameMetadata::default();
    let mut setup = None;
    let mut fen = None;

    for cap in HEADER_RE.captures_iter(pgn) {
        let key = &cap[1];
        let value = unescape_tag(&cap[2]);
        match key {
            "Event" => metadata.event = value,
            "Site" => metadata.site = value,
            "Date" => metadata.date = value,
            "Round" => metadata.round = value,
            "White" => metadata.white = value,
            "Black" => metadata.black = value,
            "Result" => metadata.result = value,
            "SetUp" => setup = Some(value),
            "FEN" => fen = Some(value),
            _ => {}
        }
    }

    // A FEN tag without SetUp is still honoured; SetUp "0" disables it
    if setup.as_deref() == Some("0") {
        fen = None;
    }

    PgnHeaders { metadata, fen }
}

/// Extract SAN moves from PGN text (after removing headers, comments,
/// variations). Move numbers and result tokens never match.
pub fn extract_moves(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_LINE_RE.replace_all(pgn, "");
    let mut text = COMMENT_RE.replace_all(&no_headers, "").into_owned();

    // Innermost variations first, until none are left
    loop {
        let stripped = VARIATION_RE.replace_all(&text, "").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }

    MOVE_RE
        .find_iter(&text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Rebuild a game from PGN or bare movetext. Stops with an error at the
/// first move that does not apply.
pub fn replay(pgn: &str) -> Result<Replay, ChessError> {
    let headers = parse_headers(pgn);
    let start = match headers.fen.as_deref() {
        Some(fen) => Position::from_fen(fen)?,
        None => Position::standard(),
    };

    let sans = extract_moves(pgn);
    let mut positions = Vec::with_capacity(sans.len() + 1);
    let mut records = Vec::with_capacity(sans.len());
    positions.push(start);

    for (ply, san) in sans.iter().enumerate() {
        let current = &positions[positions.len() - 1];
        let (next, record) = apply_san(current, san)
            .map_err(|e| ChessError::Transcript(format!("ply {}: {e}", ply + 1)))?;
        records.push(record);
        positions.push(next);
    }

    debug!(plies = records.len(), "Replayed transcript");

    Ok(Replay {
        metadata: headers.metadata,
        positions,
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::apply_move;
    use crate::outcome::Outcome;

    fn play(start: &Position, sans: &[&str]) -> (Position, Vec<MoveRecord>) {
        let mut current = start.clone();
        let mut records = Vec::new();
        for san in sans {
            let (next, record) = apply_san(&current, san).unwrap();
            records.push(record);
            current = next;
        }
        (current, records)
    }

    #[test]
    fn test_movetext_numbering() {
        let start = Position::standard();
        let (_, records) = play(&start, &["e4", "e5", "Nf3"]);
        assert_eq!(movetext(&start, &records), "1. e4 e5 2. Nf3");
        assert_eq!(movetext(&start, &[]), "");
    }

    #[test]
    fn test_movetext_black_first() {
        let start =
            Position::from_fen("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1")
                .unwrap();
        let (_, records) = play(&start, &["c5", "Nf3", "d6"]);
        assert_eq!(movetext(&start, &records), "1... c5 2. Nf3 d6");
    }

    #[test]
    fn test_export_pgn_standard() {
        let start = Position::standard();
        let (_, records) = play(&start, &["f3", "e5", "g4", "Qh4#"]);
        let meta = GameMetadata {
            white: "Human".to_string(),
            black: "Advisor".to_string(),
            date: "2025.01.15".to_string(),
            ..GameMetadata::default()
        };
        let outcome = Some(Outcome::Checkmate {
            winner: Color::Black,
        });

        let pgn = export_pgn(&meta, &start, &records, outcome);
        assert!(pgn.starts_with("[Event \"Casual Game\"]\n"));
        assert!(pgn.contains("[White \"Human\"]\n"));
        assert!(pgn.contains("[Result \"0-1\"]\n"));
        assert!(!pgn.contains("SetUp"));
        assert!(pgn.ends_with("\n\n1. f3 e5 2. g4 Qh4# 0-1\n"));
    }

    #[test]
    fn test_export_pgn_custom_start_and_in_progress() {
        let start = Position::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 30").unwrap();
        let (_, records) = play(&start, &["e4"]);
        let pgn = export_pgn(&GameMetadata::default(), &start, &records, None);

        assert!(pgn.contains("[SetUp \"1\"]\n"));
        assert!(pgn.contains("[FEN \"4k3/8/8/8/8/8/4P3/4K3 w - - 0 30\"]\n"));
        assert!(pgn.contains("[Result \"*\"]\n"));
        assert!(pgn.ends_with("30. e4 *\n"));
    }

    #[test]
    fn test_parse_headers_basic() {
        let pgn = r#"[White "Player1"]
[Black "Player \"Two\""]
[Result "1-0"]
[Date "2025.01.15"]

1. e4 e5 2. Nf3 Nc6 1-0"#;

        let headers = parse_headers(pgn);
        assert_eq!(headers.metadata.white, "Player1");
        assert_eq!(headers.metadata.black, "Player \"Two\"");
        assert_eq!(headers.metadata.result, "1-0");
        assert_eq!(headers.metadata.date, "2025.01.15");
        assert_eq!(headers.metadata.event, "Casual Game");
        assert_eq!(headers.fen, None);
    }

    #[test]
    fn test_extract_moves_skips_annotations() {
        let pgn = "[Event \"x\"]\n\n1. e4 {best by test} e5 2. Nf3 (2. f4 exf4 (2... d5)) Nc6 ; rest\n3. O-O-O 1-0";
        assert_eq!(extract_moves(pgn), vec!["e4", "e5", "Nf3", "Nc6", "O-O-O"]);
    }

    #[test]
    fn test_replay_roundtrip() {
        let start = Position::standard();
        let line = [
            "e4", "c5", "Nf3", "d6", "d4", "cxd4", "Nxd4", "Nf6", "Nc3", "a6", "Be3", "e5",
            "Nb3", "Be6", "f3", "Be7", "Qd2", "O-O", "O-O-O", "Nbd7", "g4", "b5",
        ];
        let (final_position, records) = play(&start, &line);

        let pgn = export_pgn(&GameMetadata::default(), &start, &records, None);
        let replayed = replay(&pgn).unwrap();

        assert_eq!(replayed.records, records);
        assert_eq!(replayed.final_position(), &final_position);
        assert_eq!(replayed.start(), &start);
        assert_eq!(replayed.positions.len(), records.len() + 1);
    }

    #[test]
    fn test_replay_from_fen_tag() {
        let pgn = "[SetUp \"1\"]\n[FEN \"4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2\"]\n\n2. exd6 *";
        let replayed = replay(pgn).unwrap();
        assert_eq!(replayed.records.len(), 1);
        assert!(replayed.records[0].flags.en_passant);

        let expected = apply_move(replayed.start(), &"e5d6".parse().unwrap())
            .unwrap()
            .0;
        assert_eq!(replayed.final_position(), &expected);
    }

    #[test]
    fn test_replay_reports_illegal_ply() {
        let err = replay("1. e4 e5 2. Ke3").unwrap_err();
        match err {
            ChessError::Transcript(msg) => assert!(msg.starts_with("ply 3")),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
