use advisor::Difficulty;
use chess_core::Color;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameMode {
    /// Two humans share the board.
    #[default]
    Local,
    /// One human against the advisor, which plays the other color.
    Advised { human: Color, difficulty: Difficulty },
}

impl GameMode {
    pub fn advised(human: Color, difficulty: Difficulty) -> Self {
        GameMode::Advised { human, difficulty }
    }

    pub fn human_color(&self) -> Option<Color> {
        match self {
            GameMode::Local => None,
            GameMode::Advised { human, .. } => Some(*human),
        }
    }

    pub fn advisor_color(&self) -> Option<Color> {
        self.human_color().map(|c| !c)
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            GameMode::Local => None,
            GameMode::Advised { difficulty, .. } => Some(*difficulty),
        }
    }

    pub fn is_advised(&self) -> bool {
        matches!(self, GameMode::Advised { .. })
    }
}
