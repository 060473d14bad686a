//! Action representation.
//!
//! `Action` is a closed enum: every consumer matches it exhaustively, so a
//! new kind of move cannot slip past the validator, the engine or the AI.
//!
//! ```
//! use riverstone::core::{Action, Position};
//!
//! let drop = Action::Drop("c3".parse().unwrap());
//! let shift = Action::Shift {
//!     from: Position::new(2, 2),
//!     to: Position::new(2, 4),
//! };
//!
//! assert_eq!(drop.destination(), Some(Position::new(2, 2)));
//! assert_eq!(shift.to_string(), "shift c3-c5");
//! ```

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::pattern::PatternId;
use super::player::Player;
use super::position::{Position, PositionSet};

/// A single move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Place a stone from hand on an empty cell.
    Drop(Position),
    /// Move an unlocked stone one or two cells orthogonally.
    Shift { from: Position, to: Position },
    /// Lock a detected pattern.
    Lock {
        pattern: PatternId,
        positions: PositionSet,
    },
    /// Reclaim the whole river into hand.
    DrawFromRiver,
    /// Sacrifice two own locked stones to unlock the opponent pattern at `target`.
    BreakLock {
        sacrifice: [Position; 2],
        target: Position,
    },
    /// Skip the turn.
    Pass,
}

impl Action {
    /// Build a lock action for a pattern footprint.
    #[must_use]
    pub fn lock(pattern: PatternId) -> Self {
        Action::Lock {
            pattern,
            positions: pattern.positions(),
        }
    }

    /// The destination cell for drops and shifts.
    #[must_use]
    pub fn destination(&self) -> Option<Position> {
        match *self {
            Action::Drop(pos) => Some(pos),
            Action::Shift { to, .. } => Some(to),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Action::Pass)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Drop(pos) => write!(f, "drop {pos}"),
            Action::Shift { from, to } => write!(f, "shift {from}-{to}"),
            Action::Lock { pattern, .. } => write!(f, "lock {pattern}"),
            Action::DrawFromRiver => write!(f, "draw from river"),
            Action::BreakLock { sacrifice, target } => {
                write!(f, "break {} with {}+{}", target, sacrifice[0], sacrifice[1])
            }
            Action::Pass => write!(f, "pass"),
        }
    }
}

/// An executed action with its realized consequences.
///
/// Used for:
/// - Move history in the state
/// - Replay/debugging
/// - Presentation (which cells were captured)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: Player,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,

    /// Opponent stones removed (strike plus surround).
    pub captured: SmallVec<[Position; 4]>,

    /// Mover's own stones removed by surrounding.
    pub self_surrounded: SmallVec<[Position; 2]>,
}

impl ActionRecord {
    /// Create a record with no captures.
    #[must_use]
    pub fn new(player: Player, action: Action, turn: u32) -> Self {
        Self {
            player,
            action,
            turn,
            captured: SmallVec::new(),
            self_surrounded: SmallVec::new(),
        }
    }

    /// Total stones removed from the board by this action.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.captured.len() + self.self_surrounded.len()
    }
}
