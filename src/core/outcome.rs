//! Terminal outcomes and the victory-set catalog.

use serde::{Deserialize, Serialize};

use super::pattern::PatternKind;
use super::player::Player;

/// Named combination of disjoint locked patterns that wins the game.
///
/// `ALL` is the check order. It is part of the rules: when a position
/// satisfies two sets at once, the earlier one is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VictorySet {
    TwinRivers,
    GateAndPath,
    ThreeBends,
    Fortress,
    Phalanx,
    Pincer,
    Serpent,
    Constellation,
}

impl VictorySet {
    pub const ALL: [VictorySet; 8] = [
        VictorySet::TwinRivers,
        VictorySet::GateAndPath,
        VictorySet::ThreeBends,
        VictorySet::Fortress,
        VictorySet::Phalanx,
        VictorySet::Pincer,
        VictorySet::Serpent,
        VictorySet::Constellation,
    ];

    /// Pattern kinds required, one entry per slot.
    #[must_use]
    pub const fn requirements(self) -> &'static [PatternKind] {
        use PatternKind::*;
        match self {
            VictorySet::TwinRivers => &[Line, Line],
            VictorySet::GateAndPath => &[Gate, Line],
            VictorySet::ThreeBends => &[Bend, Bend, Bend],
            VictorySet::Fortress => &[Gate, Gate],
            VictorySet::Phalanx => &[Gate, Cross],
            VictorySet::Pincer => &[Hook, Hook],
            VictorySet::Serpent => &[Bend, Bend, Line],
            VictorySet::Constellation => &[Gate, Gate, Gate],
        }
    }

    /// Whether a pattern of `kind` can fill one of this set's slots.
    #[must_use]
    pub fn uses(self, kind: PatternKind) -> bool {
        self.requirements().contains(&kind)
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VictorySet::TwinRivers => "Twin Rivers",
            VictorySet::GateAndPath => "Gate & Path",
            VictorySet::ThreeBends => "Three Bends",
            VictorySet::Fortress => "The Fortress",
            VictorySet::Phalanx => "The Phalanx",
            VictorySet::Pincer => "The Pincer",
            VictorySet::Serpent => "The Serpent",
            VictorySet::Constellation => "The Constellation",
        }
    }
}

impl std::fmt::Display for VictorySet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// How the game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VictoryKind {
    /// Opponent fell to the elimination threshold.
    Elimination,
    /// A locked line of five or more.
    LongLine,
    /// A locked cross.
    Cross,
    /// A composite victory set.
    Set(VictorySet),
    /// The player to move had no legal action at all.
    Stalemate,
}

/// Terminal status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameOutcome {
    /// `None` only for a stalemate.
    pub winner: Option<Player>,
    pub victory: VictoryKind,
}

impl GameOutcome {
    #[must_use]
    pub const fn win(winner: Player, victory: VictoryKind) -> Self {
        Self {
            winner: Some(winner),
            victory,
        }
    }

    #[must_use]
    pub const fn stalemate() -> Self {
        Self {
            winner: None,
            victory: VictoryKind::Stalemate,
        }
    }

    #[must_use]
    pub fn is_elimination(&self) -> bool {
        self.victory == VictoryKind::Elimination
    }
}
