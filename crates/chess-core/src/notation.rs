//! Syntactic checks for move notation.

use std::sync::LazyLock;

use regex::Regex;

/// SAN grammar: piece moves with optional disambiguation, pawn moves and
/// captures with optional promotion, castling, and a `+`/`#` suffix.
static SAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:O-O-O|O-O|[KQRBN][a-h]?[1-8]?x?[a-h][1-8]|[a-h](?:x[a-h])?[1-8](?:=[QRBN])?)[+#]?$",
    )
    .expect("SAN pattern compiles")
});

static COORDINATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-h][1-8][a-h][1-8][qrbnQRBN]?$").expect("coordinate pattern compiles"));

/// True if `text` is well-formed SAN. Says nothing about legality.
pub fn is_san(text: &str) -> bool {
    SAN_RE.is_match(text)
}

/// True if `text` looks like coordinate notation (`e2e4`, `e7e8q`).
pub fn is_coordinate(text: &str) -> bool {
    COORDINATE_RE.is_match(text)
}
