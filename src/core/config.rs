//! Game configuration types.
//!
//! `GameConfig` carries the numeric rules the engine enforces. The defaults
//! are the standard game: twelve stones each, three passes, elimination at
//! two stones, and a dozen sampled break combinations per move list.

use serde::{Deserialize, Serialize};

use super::player::Player;

/// Who is driving each side. Read by the controller; the rules ignore it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing one board.
    #[default]
    HumanVsHuman,
    /// One side played by the AI.
    HumanVsAi { ai: Player },
    /// Both sides played by the AI.
    AiVsAi,
}

impl GameMode {
    /// Whether `player` is driven by the AI in this mode.
    #[must_use]
    pub fn is_ai(self, player: Player) -> bool {
        match self {
            GameMode::HumanVsHuman => false,
            GameMode::HumanVsAi { ai } => ai == player,
            GameMode::AiVsAi => true,
        }
    }
}

/// Rules configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Stones each player starts with in hand.
    pub stones_per_player: u8,

    /// Passes each player may use over the whole game.
    pub max_passes: u8,

    /// A player with this many hand+board stones or fewer is eliminated.
    pub elimination_threshold: u8,

    /// Maximum BreakLock combinations produced by move enumeration.
    /// `None` enumerates every legal combination.
    pub break_sample_limit: Option<usize>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            stones_per_player: 12,
            max_passes: 3,
            elimination_threshold: 2,
            break_sample_limit: Some(12),
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the starting hand size.
    #[must_use]
    pub fn with_stones_per_player(mut self, stones: u8) -> Self {
        self.stones_per_player = stones;
        self
    }

    /// Set the per-player pass allowance.
    #[must_use]
    pub fn with_max_passes(mut self, passes: u8) -> Self {
        self.max_passes = passes;
        self
    }

    /// Set the elimination threshold.
    #[must_use]
    pub fn with_elimination_threshold(mut self, threshold: u8) -> Self {
        self.elimination_threshold = threshold;
        self
    }

    /// Set the BreakLock sampling bound (`None` = exhaustive).
    #[must_use]
    pub fn with_break_sample_limit(mut self, limit: Option<usize>) -> Self {
        self.break_sample_limit = limit;
        self
    }

    /// Total stones in a game.
    #[must_use]
    pub fn total_stones(&self) -> usize {
        usize::from(self.stones_per_player) * 2
    }
}
