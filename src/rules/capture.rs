//! Capture by surrounding.
//!
//! A stone is surrounded when every orthogonal neighbour is either off the
//! board or occupied, by anyone. Owner and lock state play no part. Only
//! stones that become surrounded through a move are captured; a stone that
//! already sat in a closed pocket before the move stays put.

use smallvec::SmallVec;

use crate::core::{Board, Player, Position, PositionSet};

/// Stones removed by surrounding after a move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Captures {
    /// Opponent stones, in board order.
    pub captured: SmallVec<[Position; 4]>,
    /// The mover's own stones, in board order.
    pub self_surrounded: SmallVec<[Position; 2]>,
}

impl Captures {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty() && self.self_surrounded.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.captured.len() + self.self_surrounded.len()
    }
}

/// Whether all four sides of `pos` are blocked.
#[must_use]
pub fn is_surrounded(pos: Position, board: &Board) -> bool {
    pos.neighbor_slots()
        .into_iter()
        .all(|slot| slot.map_or(true, |n| !board.is_empty(n)))
}

/// Every occupied cell that is currently surrounded.
#[must_use]
pub fn surrounded_set(board: &Board) -> PositionSet {
    board
        .occupied()
        .iter()
        .filter(|&pos| is_surrounded(pos, board))
        .collect()
}

/// Stones surrounded in `after` that were not surrounded in `before`.
///
/// A stone that moved into a surrounded cell counts as newly surrounded
/// even if its old cell was surrounded too: position is what matters.
#[must_use]
pub fn resolve_captures(mover: Player, before: &Board, after: &Board) -> Captures {
    let fresh = surrounded_set(after) - surrounded_set(before);
    let mut captures = Captures::default();
    for pos in fresh.iter() {
        match after.owner(pos) {
            Some(owner) if owner == mover => captures.self_surrounded.push(pos),
            Some(_) => captures.captured.push(pos),
            None => {}
        }
    }
    captures
}

/// Captures a shift would make, without touching a state.
///
/// The struck stone (if any) comes first in `captured`. The shift is not
/// validated.
#[must_use]
pub fn preview_shift(board: &Board, mover: Player, from: Position, to: Position) -> Captures {
    let mut after = board.clone();
    let mut preview = Captures::default();
    if after.remove(to).is_some() {
        preview.captured.push(to);
    }
    if let Some(stone) = after.remove(from) {
        after.place(to, stone);
    }

    let surrounded = resolve_captures(mover, board, &after);
    preview.captured.extend(surrounded.captured);
    preview.self_surrounded = surrounded.self_surrounded;
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, SetupBuilder};

    fn p(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_corner_needs_two_neighbours() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1"])
            .stones(Player::Dark, &["b1"])
            .build();
        assert!(!is_surrounded(p("a1"), state.board()));

        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1"])
            .stones(Player::Dark, &["b1", "a2"])
            .build();
        assert!(is_surrounded(p("a1"), state.board()));
    }

    #[test]
    fn test_own_stones_block_too() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["c3", "b3", "d3", "c2", "c4"])
            .build();
        assert!(is_surrounded(p("c3"), state.board()));
        assert!(!is_surrounded(p("b3"), state.board()));
    }

    #[test]
    fn test_surrounded_set() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "c3"])
            .stones(Player::Dark, &["b1", "a2", "b3", "d3", "c2"])
            .build();

        let set = surrounded_set(state.board());
        assert!(set.contains(p("a1")));
        assert!(!set.contains(p("c3")));
    }

    #[test]
    fn test_resolve_only_new() {
        let before = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "c3"])
            .stones(Player::Dark, &["b1", "a2", "b3", "d3", "c2"])
            .build();

        // Close the pocket around c3.
        let after = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "c3"])
            .stones(Player::Dark, &["b1", "a2", "b3", "d3", "c2", "c4"])
            .build();

        let captures = resolve_captures(Player::Dark, before.board(), after.board());
        assert_eq!(captures.captured.as_slice(), &[p("c3")]);
        assert!(captures.self_surrounded.is_empty());
    }

    #[test]
    fn test_resolve_splits_by_owner() {
        let before = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Dark, &["a1", "b2"])
            .stones(Player::Light, &["a2"])
            .build();
        let after = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Dark, &["a1", "b1", "b2"])
            .stones(Player::Light, &["a2"])
            .build();

        // b1 closes a1; a1 is Dark, so Dark moving self-surrounds.
        let captures = resolve_captures(Player::Dark, before.board(), after.board());
        assert_eq!(captures.self_surrounded.as_slice(), &[p("a1")]);

        let captures = resolve_captures(Player::Light, before.board(), after.board());
        assert_eq!(captures.captured.as_slice(), &[p("a1")]);
    }

    #[test]
    fn test_preview_shift() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "c2"])
            .stones(Player::Dark, &["b1", "b2"])
            .build();

        // c2 strikes b2; a1 is still open at a2, so only the strike counts.
        let preview = preview_shift(state.board(), Player::Light, p("c2"), p("b2"));
        assert_eq!(preview.captured.as_slice(), &[p("b2")]);

        // Dark b2-a2 closes a1.
        let preview = preview_shift(state.board(), Player::Dark, p("b2"), p("a2"));
        assert_eq!(preview.captured.as_slice(), &[p("a1")]);
        assert!(preview.self_surrounded.is_empty());
    }

    #[test]
    fn test_no_change_no_captures() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1"])
            .stones(Player::Dark, &["b1", "a2"])
            .build();
        let captures = resolve_captures(Player::Light, state.board(), state.board());
        assert!(captures.is_empty());
        assert_eq!(captures.len(), 0);
    }
}
