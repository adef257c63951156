//! Console front end: routes commands to the session and prints results.

use std::io::Write;
use std::ops::ControlFlow;
use std::path::PathBuf;

use advisor::{Advisor, Evaluation};
use anyhow::{Context, Result};
use chess_core::{Color, GameMetadata, MoveRecord, Position};
use game_session::{
    play_advisor_turn, request_evaluation, GameMode, RequestKind, Session, SessionError,
    SessionState,
};
use tracing::{info, warn};

use crate::command::{self, Command, HELP};
use crate::config::ConsoleConfig;

const NO_ADVISOR: &str = "No advisor configured (set GEMINI_API_KEY)";

pub struct App<A, W> {
    session: Session,
    advisor: Option<A>,
    config: ConsoleConfig,
    out: W,
}

impl<A: Advisor, W: Write> App<A, W> {
    pub fn new(config: ConsoleConfig, advisor: Option<A>, out: W) -> Self {
        let mut session = Session::new(GameMode::Local);
        session.set_evaluate_moves(config.auto_evaluate && advisor.is_some());
        Self {
            session,
            advisor,
            config,
            out,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn greet(&mut self) -> Result<()> {
        writeln!(self.out, "{HELP}\n")?;
        if self.advisor.is_none() {
            writeln!(self.out, "{NO_ADVISOR}; local games only.\n")?;
        }
        self.show_board()
    }

    pub fn prompt(&mut self) -> Result<()> {
        let label = match self.session.state() {
            SessionState::Terminal(_) => "game over".to_string(),
            _ => color_name(self.session.turn()).to_lowercase(),
        };
        write!(self.out, "{label}> ")?;
        self.out.flush()?;
        Ok(())
    }

    /// Handle one input line. Problems with the input are reported to the
    /// user; only I/O failures are returned as errors.
    pub async fn handle_line(&mut self, line: &str) -> Result<ControlFlow<()>> {
        match command::parse(line) {
            Ok(Some(cmd)) => self.handle(cmd).await,
            Ok(None) => Ok(ControlFlow::Continue(())),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                Ok(ControlFlow::Continue(()))
            }
        }
    }

    pub async fn handle(&mut self, cmd: Command) -> Result<ControlFlow<()>> {
        match cmd {
            Command::NewLocal => self.start(GameMode::Local, Position::standard()).await?,
            Command::NewAdvised { human, difficulty } => {
                if self.advisor.is_none() {
                    writeln!(self.out, "{NO_ADVISOR}")?;
                } else {
                    let difficulty = difficulty.unwrap_or(self.config.difficulty);
                    writeln!(
                        self.out,
                        "You play {} against the advisor ({difficulty}).",
                        color_name(human)
                    )?;
                    self.start(GameMode::advised(human, difficulty), Position::standard())
                        .await?;
                }
            }
            Command::NewFen(fen) => match Position::from_fen(&fen) {
                Ok(position) => self.start(GameMode::Local, position).await?,
                Err(e) => writeln!(self.out, "{e}")?,
            },
            Command::Coordinate(spec) => {
                let result = self.session.submit_move(&spec);
                self.after_human_move(result).await?;
            }
            Command::San(san) => {
                let result = self.session.submit_san(&san);
                self.after_human_move(result).await?;
            }
            Command::Undo => match self.session.undo() {
                Ok(0) => writeln!(self.out, "Nothing to undo.")?,
                Ok(n) => {
                    writeln!(self.out, "Took back {n} ply.")?;
                    self.drive_advisor().await?;
                    self.show_board()?;
                }
                Err(e) => writeln!(self.out, "{e}")?,
            },
            Command::Eval => self.evaluate().await?,
            Command::Retry => {
                if self.session.state() == SessionState::AwaitingAdvisor {
                    if self.advisor_turn().await? {
                        self.drive_advisor().await?;
                    }
                    self.show_board()?;
                } else {
                    writeln!(self.out, "It is not the advisor's turn.")?;
                }
            }
            Command::Export => match self.export().await {
                Ok(path) => writeln!(self.out, "Saved {}", path.display())?,
                Err(e) => {
                    warn!("Export failed: {e:#}");
                    writeln!(self.out, "{e:#}")?;
                }
            },
            Command::History => {
                let transcript = self.session.export_transcript();
                if transcript.is_empty() {
                    writeln!(self.out, "No moves yet.")?;
                } else {
                    writeln!(self.out, "{transcript}")?;
                }
            }
            Command::Moves => {
                let mut moves: Vec<String> = self
                    .session
                    .legal_moves()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                moves.sort();
                writeln!(self.out, "{} legal: {}", moves.len(), moves.join(" "))?;
            }
            Command::Fen => writeln!(self.out, "{}", self.session.fen())?,
            Command::Board => self.show_board()?,
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::Quit => return Ok(ControlFlow::Break(())),
        }
        Ok(ControlFlow::Continue(()))
    }

    async fn start(&mut self, mode: GameMode, position: Position) -> Result<()> {
        self.session.new_game_from(mode, position);
        self.drive_advisor().await?;
        self.show_board()
    }

    async fn after_human_move(&mut self, result: Result<MoveRecord, SessionError>) -> Result<()> {
        match result {
            Ok(record) => {
                writeln!(self.out, "{} {}", color_name(record.color), record.san)?;
                self.drive_advisor().await?;
                self.show_board()?;
            }
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(())
    }

    /// Answer the session's advisor requests in the order it issues them
    /// (evaluation of the last move, the advisor's reply, its evaluation)
    /// until it waits on the human or a move request fails.
    async fn drive_advisor(&mut self) -> Result<()> {
        if self.advisor.is_none() {
            return Ok(());
        }
        while let Some(request) = self.session.pending_request() {
            match request.kind() {
                RequestKind::Evaluate => self.evaluate().await?,
                RequestKind::ProposeMove => {
                    if !self.advisor_turn().await? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    /// Play the advisor's move if one is due. Returns whether a move was
    /// played.
    async fn advisor_turn(&mut self) -> Result<bool> {
        if self.session.state() != SessionState::AwaitingAdvisor {
            return Ok(false);
        }
        let Some(advisor) = &self.advisor else {
            writeln!(self.out, "{NO_ADVISOR}")?;
            return Ok(false);
        };

        writeln!(self.out, "Advisor is thinking...")?;
        match play_advisor_turn(&mut self.session, advisor).await {
            Ok(record) => {
                writeln!(self.out, "Advisor plays {}", record.san)?;
                return Ok(true);
            }
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Advisor move failed");
                writeln!(self.out, "{e}. Type 'retry' to ask again.")?;
            }
            Err(e) => writeln!(self.out, "{e}")?,
        }
        Ok(false)
    }

    async fn evaluate(&mut self) -> Result<()> {
        let Some(advisor) = &self.advisor else {
            writeln!(self.out, "{NO_ADVISOR}")?;
            return Ok(());
        };
        if self.session.history().is_empty() {
            let fresh = Evaluation::even("A new game has begun.");
            return self.show_evaluation(&fresh);
        }
        match request_evaluation(&mut self.session, advisor).await {
            Ok(evaluation) => self.show_evaluation(&evaluation),
            Err(e) => {
                writeln!(self.out, "{e}")?;
                Ok(())
            }
        }
    }

    fn show_evaluation(&mut self, evaluation: &Evaluation) -> Result<()> {
        writeln!(
            self.out,
            "[{}] White {:.0}% - {}",
            evaluation.label, evaluation.win_probability_white, evaluation.explanation
        )?;
        Ok(())
    }

    fn show_board(&mut self) -> Result<()> {
        writeln!(self.out, "\n{}", self.session.position())?;
        let status = match self.session.state() {
            SessionState::Terminal(outcome) => match outcome.winner() {
                Some(winner) => format!("{outcome}! {} wins ({})", color_name(winner), outcome.result()),
                None => format!("{outcome} ({})", outcome.result()),
            },
            _ if self.session.position().is_check() => {
                format!("{} to move, in check", color_name(self.session.turn()))
            }
            _ => format!("{} to move", color_name(self.session.turn())),
        };
        writeln!(self.out, "{status}\n")?;
        Ok(())
    }

    async fn export(&self) -> Result<PathBuf> {
        let metadata = self.metadata();
        let pgn = self.session.export_pgn(&metadata);

        let name = format!(
            "advised-chess-{}.pgn",
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        let path: PathBuf = self.config.export_dir.join(name);
        tokio::fs::write(&path, pgn)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        info!(path = %path.display(), plies = self.session.history().len(), "Exported game");
        Ok(path)
    }

    fn metadata(&self) -> GameMetadata {
        let player = self.config.player_name.clone();
        let (event, white, black) = match self.session.mode() {
            GameMode::Local => ("Casual Game".to_string(), player.clone(), player),
            GameMode::Advised { human, difficulty } => {
                let advisor = format!("Advisor ({difficulty})");
                match human {
                    Color::White => ("Advised Game".to_string(), player, advisor),
                    Color::Black => ("Advised Game".to_string(), advisor, player),
                }
            }
        };
        GameMetadata {
            event,
            date: chrono::Local::now().format("%Y.%m.%d").to_string(),
            white,
            black,
            result: self
                .session
                .outcome()
                .map(|o| o.result().to_string())
                .unwrap_or_else(|| "*".to_string()),
            ..GameMetadata::default()
        }
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use advisor::{AdvisorError, Difficulty};

    struct Canned {
        moves: Mutex<VecDeque<&'static str>>,
        transcripts: Mutex<Vec<String>>,
    }

    impl Advisor for Canned {
        async fn propose_move(&self, _fen: &str, _difficulty: Difficulty) -> Result<String, AdvisorError> {
            let next = self.moves.lock().unwrap().pop_front();
            next.map(str::to_string).ok_or(AdvisorError::EmptyReply)
        }

        async fn evaluate_transcript(&self, transcript: &str) -> Result<Evaluation, AdvisorError> {
            self.transcripts.lock().unwrap().push(transcript.to_string());
            Err(AdvisorError::Unavailable("offline".to_string()))
        }
    }

    fn app(moves: &[&'static str], export_dir: PathBuf) -> App<Canned, Vec<u8>> {
        let config = ConsoleConfig {
            export_dir,
            difficulty: Difficulty::Weak,
            player_name: "Tester".to_string(),
            auto_evaluate: true,
        };
        let advisor = Canned {
            moves: Mutex::new(moves.iter().copied().collect()),
            transcripts: Mutex::default(),
        };
        App::new(config, Some(advisor), Vec::new())
    }

    fn output(app: &App<Canned, Vec<u8>>) -> String {
        String::from_utf8_lossy(&app.out).into_owned()
    }

    fn evaluated(app: &App<Canned, Vec<u8>>) -> Vec<String> {
        app.advisor.as_ref().unwrap().transcripts.lock().unwrap().clone()
    }

    #[tokio::test]
    async fn test_advised_game_flow() {
        let mut app = app(&["e5"], std::env::temp_dir());
        app.handle_line("new advised white").await.unwrap();
        app.handle_line("e2e4").await.unwrap();

        assert_eq!(app.session().export_transcript(), "1. e4 e5");
        assert_eq!(evaluated(&app), ["1. e4", "1. e4 e5"]);
        assert!(!app.session().is_thinking());

        let text = output(&app);
        // Evaluation failure degrades to the sentinel
        let first_eval = text.find("[Error] White 50%").unwrap();
        let reply = text.find("Advisor plays e5").unwrap();
        assert!(first_eval < reply, "human move evaluated after the reply:\n{text}");
    }

    #[tokio::test]
    async fn test_advised_game_as_black_evaluates_opening_move() {
        let mut app = app(&["d4", "c4"], std::env::temp_dir());
        app.handle_line("new advised black").await.unwrap();
        app.handle_line("d5").await.unwrap();

        assert_eq!(app.session().export_transcript(), "1. d4 d5 2. c4");
        assert_eq!(evaluated(&app), ["1. d4", "1. d4 d5", "1. d4 d5 2. c4"]);
        assert_eq!(app.session().state(), SessionState::AwaitingHuman);
    }

    #[tokio::test]
    async fn test_failed_advisor_move_then_retry() {
        let mut app = app(&["Kd6", "d5"], std::env::temp_dir());
        app.handle_line("new advised white").await.unwrap();
        app.handle_line("d4").await.unwrap();
        assert_eq!(app.session().state(), SessionState::AwaitingAdvisor);
        assert!(output(&app).contains("Type 'retry'"));

        app.handle_line("retry").await.unwrap();
        assert_eq!(app.session().export_transcript(), "1. d4 d5");
        assert_eq!(evaluated(&app), ["1. d4", "1. d4 d5"]);
        assert!(!app.session().is_thinking());
    }

    #[tokio::test]
    async fn test_bad_input_is_reported() {
        let mut app = app(&[], std::env::temp_dir());
        let flow = app.handle_line("e2e5").await.unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert!(app.session().history().is_empty());
        assert!(output(&app).contains("Illegal move"));

        let flow = app.handle_line("quit").await.unwrap();
        assert_eq!(flow, ControlFlow::Break(()));
    }

    #[tokio::test]
    async fn test_export_writes_pgn() {
        let dir = std::env::temp_dir().join(format!("advised-chess-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let mut app = app(&[], dir.clone());
        app.handle_line("e4").await.unwrap();
        app.handle_line("export").await.unwrap();

        let file = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .find(|e| e.file_name().to_string_lossy().ends_with(".pgn"))
            .unwrap();
        let pgn = std::fs::read_to_string(file.path()).unwrap();
        assert!(pgn.contains("[White \"Tester\"]"));
        assert!(pgn.contains("1. e4 *"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_export_failure_keeps_game() {
        let missing = std::env::temp_dir()
            .join(format!("advised-chess-missing-{}", std::process::id()))
            .join("nested");
        let mut app = app(&[], missing);
        app.handle_line("e4").await.unwrap();

        let flow = app.handle_line("export").await.unwrap();
        assert_eq!(flow, ControlFlow::Continue(()));
        assert!(output(&app).contains("Failed to write"));
        assert_eq!(app.session().export_transcript(), "1. e4");

        app.handle_line("e5").await.unwrap();
        assert_eq!(app.session().history().len(), 2);
    }

    #[tokio::test]
    async fn test_history_lists_moves() {
        let mut app = app(&[], std::env::temp_dir());
        app.handle_line("history").await.unwrap();
        assert!(output(&app).contains("No moves yet."));

        for line in ["e4", "c5", "Nf3", "history"] {
            app.handle_line(line).await.unwrap();
        }
        assert!(output(&app).ends_with("1. e4 c5 2. Nf3\n"));
    }
}
