//! Pattern shapes and identifiers.
//!
//! A `PatternId` is canonical: it packs the pattern kind together with its
//! footprint, so detecting the same shape twice yields the same id and an
//! action can name a pattern without any registry lookup.

use serde::{Deserialize, Serialize};

use super::player::Player;
use super::position::{PositionSet, CELL_COUNT};

/// Geometric shape family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternKind {
    /// Straight run of 3+ stones along a row or column.
    Line,
    /// L-corner triple.
    Bend,
    /// 2×2 block.
    Gate,
    /// Plus sign, five stones.
    Cross,
    /// T-tetromino. Cosmetic: counts toward no victory set.
    Pod,
    /// L-tetromino.
    Hook,
}

impl PatternKind {
    pub const ALL: [PatternKind; 6] = [
        PatternKind::Line,
        PatternKind::Bend,
        PatternKind::Gate,
        PatternKind::Cross,
        PatternKind::Pod,
        PatternKind::Hook,
    ];

    const fn code(self) -> u64 {
        match self {
            PatternKind::Line => 0,
            PatternKind::Bend => 1,
            PatternKind::Gate => 2,
            PatternKind::Cross => 3,
            PatternKind::Pod => 4,
            PatternKind::Hook => 5,
        }
    }

    const fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(PatternKind::Line),
            1 => Some(PatternKind::Bend),
            2 => Some(PatternKind::Gate),
            3 => Some(PatternKind::Cross),
            4 => Some(PatternKind::Pod),
            5 => Some(PatternKind::Hook),
            _ => None,
        }
    }
}

impl std::fmt::Display for PatternKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PatternKind::Line => "Line",
            PatternKind::Bend => "Bend",
            PatternKind::Gate => "Gate",
            PatternKind::Cross => "Cross",
            PatternKind::Pod => "Pod",
            PatternKind::Hook => "Hook",
        };
        f.write_str(name)
    }
}

/// Canonical pattern identifier: kind code above the 36 footprint bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatternId(pub u64);

impl PatternId {
    #[must_use]
    pub const fn new(kind: PatternKind, positions: PositionSet) -> Self {
        Self((kind.code() << CELL_COUNT) | positions.bits())
    }

    /// The kind encoded in this id, `None` for a malformed id.
    #[must_use]
    pub const fn kind(self) -> Option<PatternKind> {
        PatternKind::from_code(self.0 >> CELL_COUNT)
    }

    /// The footprint encoded in this id.
    #[must_use]
    pub const fn positions(self) -> PositionSet {
        PositionSet::from_bits(self.0)
    }
}

impl std::fmt::Display for PatternId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind() {
            Some(kind) => write!(f, "{}{}", kind, self.positions()),
            None => write!(f, "Pattern(#{:x})", self.0),
        }
    }
}

/// A detected or locked pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pattern {
    pub id: PatternId,
    pub kind: PatternKind,
    pub positions: PositionSet,
    pub owner: Player,
}

impl Pattern {
    #[must_use]
    pub const fn new(kind: PatternKind, positions: PositionSet, owner: Player) -> Self {
        Self {
            id: PatternId::new(kind, positions),
            kind,
            positions,
            owner,
        }
    }

    /// Number of cells in the footprint.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.positions.len()
    }

    /// A line of five or more, or a cross: wins on lock.
    #[must_use]
    pub const fn is_instant_win(&self) -> bool {
        match self.kind {
            PatternKind::Line => self.positions.len() >= 5,
            PatternKind::Cross => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.owner, self.kind, self.positions)
    }
}
