//! Console command parsing.

use advisor::Difficulty;
use anyhow::{anyhow, bail, Result};
use chess_core::notation;
use chess_core::{Color, MoveSpec};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    NewLocal,
    NewAdvised {
        human: Color,
        difficulty: Option<Difficulty>,
    },
    /// Local game from a FEN position
    NewFen(String),
    Coordinate(MoveSpec),
    San(String),
    Undo,
    Eval,
    Export,
    /// Moves played so far
    History,
    Moves,
    Fen,
    Board,
    Retry,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  new local                               two players at one board
  new advised <white|black> [difficulty]  play the advisor (weak, moderate, strong)
  new fen <FEN>                           local game from a position
  e2e4 | e7e8q | Nf3 | O-O                play a move
  undo                                    take back (a full move against the advisor)
  eval                                    evaluate the last move
  retry                                   ask the advisor to move again
  history                                 list the moves played so far
  moves                                   list legal moves
  fen | board                             show the position
  export                                  write the game as PGN
  help | quit";

/// Parse one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "new" => parse_new(line, words.collect())?,
        "undo" => Command::Undo,
        "eval" => Command::Eval,
        "export" => Command::Export,
        "history" => Command::History,
        "moves" => Command::Moves,
        "fen" => Command::Fen,
        "board" => Command::Board,
        "retry" => Command::Retry,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ if notation::is_coordinate(head) => Command::Coordinate(head.parse()?),
        _ if notation::is_san(head) => Command::San(head.to_string()),
        _ => bail!("Unrecognised command '{head}' (type 'help')"),
    };
    Ok(Some(command))
}

fn parse_new(line: &str, args: Vec<&str>) -> Result<Command> {
    match args.first().map(|a| a.to_ascii_lowercase()).as_deref() {
        None | Some("local") => Ok(Command::NewLocal),
        Some("advised") => {
            let human = match args.get(1).map(|a| a.to_ascii_lowercase()).as_deref() {
                None | Some("white") | Some("w") => Color::White,
                Some("black") | Some("b") => Color::Black,
                Some(other) => bail!("Unknown color '{other}'"),
            };
            let difficulty = args
                .get(2)
                .map(|d| d.parse::<Difficulty>())
                .transpose()
                .map_err(|_| anyhow!("Unknown difficulty (weak, moderate or strong)"))?;
            Ok(Command::NewAdvised { human, difficulty })
        }
        Some("fen") => {
            // Everything after the keyword; FEN fields are space separated
            let fen = line
                .splitn(3, char::is_whitespace)
                .nth(2)
                .map(str::trim)
                .unwrap_or_default();
            if fen.is_empty() {
                bail!("Usage: new fen <FEN>");
            }
            Ok(Command::NewFen(fen.to_string()))
        }
        Some(other) => bail!("Unknown game type '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{Role, Square};

    fn parsed(line: &str) -> Command {
        parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_new_game_commands() {
        assert_eq!(parsed("new"), Command::NewLocal);
        assert_eq!(parsed("new local"), Command::NewLocal);
        assert_eq!(
            parsed("new advised black hard"),
            Command::NewAdvised {
                human: Color::Black,
                difficulty: Some(Difficulty::Strong)
            }
        );
        assert_eq!(
            parsed("NEW Advised"),
            Command::NewAdvised {
                human: Color::White,
                difficulty: None
            }
        );
        assert_eq!(
            parsed("new fen 4k3/8/8/8/8/8/4P3/4K3 w - - 0 1"),
            Command::NewFen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1".to_string())
        );
        assert!(parse("new fen").is_err());
        assert!(parse("new advised purple").is_err());
        assert!(parse("new advised white impossible").is_err());
    }

    #[test]
    fn test_moves() {
        assert_eq!(
            parsed("e2e4"),
            Command::Coordinate(MoveSpec::new(Square::E2, Square::E4))
        );
        assert_eq!(
            parsed("a7a8n"),
            Command::Coordinate(MoveSpec::new(Square::A7, Square::A8).with_promotion(Role::Knight))
        );
        assert_eq!(parsed("Nf3"), Command::San("Nf3".to_string()));
        assert_eq!(parsed("O-O"), Command::San("O-O".to_string()));
        assert_eq!(parsed("exd5"), Command::San("exd5".to_string()));
    }

    #[test]
    fn test_keywords_and_unknown() {
        assert_eq!(parsed("board"), Command::Board);
        assert_eq!(parsed("Undo"), Command::Undo);
        assert_eq!(parsed("exit"), Command::Quit);
        assert_eq!(parsed("history"), Command::History);
        assert_eq!(parsed("moves"), Command::Moves);
        assert!(parse("castle").is_err());
    }
}
