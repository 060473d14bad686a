//! Stones and their identity tokens.

use serde::{Deserialize, Serialize};

use super::pattern::PatternId;
use super::player::Player;

/// Identity token for a stone, allocated when it enters the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoneId(pub u32);

impl std::fmt::Display for StoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stone({})", self.0)
    }
}

/// A stone in play (or resting in a river).
///
/// A locked stone always names the pattern that locked it. Only the rules
/// engine flips the lock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stone {
    pub id: StoneId,
    pub owner: Player,
    pub locked: bool,
    pub pattern: Option<PatternId>,
}

impl Stone {
    /// A fresh, unlocked stone.
    #[must_use]
    pub const fn new(id: StoneId, owner: Player) -> Self {
        Self {
            id,
            owner,
            locked: false,
            pattern: None,
        }
    }

    /// Lock this stone into a pattern.
    pub fn lock(&mut self, pattern: PatternId) {
        assert!(!self.locked, "{} is already locked", self.id);
        self.locked = true;
        self.pattern = Some(pattern);
    }

    /// Release this stone from its pattern.
    pub fn unlock(&mut self) {
        self.locked = false;
        self.pattern = None;
    }

    /// The stone as it rests in a river: unlocked, no pattern.
    #[must_use]
    pub fn released(mut self) -> Self {
        self.unlock();
        self
    }

    /// Whether this stone is owned by `player` and free to move or lock.
    #[inline]
    #[must_use]
    pub fn is_free_for(&self, player: Player) -> bool {
        self.owner == player && !self.locked
    }
}
