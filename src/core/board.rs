//! The 6×6 board: a total mapping from position to optional stone.

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerMap};
use super::position::{Position, PositionSet, CELL_COUNT};
use super::stone::Stone;

/// Board cells indexed by `Position::index()`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Option<Stone>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![None; CELL_COUNT],
        }
    }

    /// Number of stored cells; `CELL_COUNT` for any board built in-process.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<&Stone> {
        self.cells[pos.index()].as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Stone> {
        self.cells[pos.index()].as_mut()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self, pos: Position) -> bool {
        self.cells[pos.index()].is_none()
    }

    /// Put a stone on an empty cell.
    pub fn place(&mut self, pos: Position, stone: Stone) {
        let cell = &mut self.cells[pos.index()];
        assert!(cell.is_none(), "{pos} is already occupied");
        *cell = Some(stone);
    }

    /// Take the stone off a cell, if any.
    pub fn remove(&mut self, pos: Position) -> Option<Stone> {
        self.cells[pos.index()].take()
    }

    /// Owner of the stone at `pos`, if any.
    #[must_use]
    pub fn owner(&self, pos: Position) -> Option<Player> {
        self.get(pos).map(|s| s.owner)
    }

    /// Iterate over occupied cells.
    pub fn stones(&self) -> impl Iterator<Item = (Position, &Stone)> {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().map(|s| (Position::from_index(i), s)))
    }

    /// Cells holding a stone of `player` (locked or not).
    #[must_use]
    pub fn occupied_by(&self, player: Player) -> PositionSet {
        self.stones()
            .filter(|(_, s)| s.owner == player)
            .map(|(p, _)| p)
            .collect()
    }

    /// Cells holding an unlocked stone of `player`.
    #[must_use]
    pub fn free_stones(&self, player: Player) -> PositionSet {
        self.stones()
            .filter(|(_, s)| s.is_free_for(player))
            .map(|(p, _)| p)
            .collect()
    }

    /// Cells holding a locked stone of `player`.
    #[must_use]
    pub fn locked_stones(&self, player: Player) -> PositionSet {
        self.stones()
            .filter(|(_, s)| s.owner == player && s.locked)
            .map(|(p, _)| p)
            .collect()
    }

    /// All occupied cells.
    #[must_use]
    pub fn occupied(&self) -> PositionSet {
        self.stones().map(|(p, _)| p).collect()
    }

    /// Empty cells.
    #[must_use]
    pub fn empty_cells(&self) -> PositionSet {
        PositionSet::FULL - self.occupied()
    }

    #[must_use]
    pub fn count(&self, player: Player) -> usize {
        self.stones().filter(|(_, s)| s.owner == player).count()
    }

    /// Stone counts for both players.
    #[must_use]
    pub fn counts(&self) -> PlayerMap<usize> {
        let mut counts = PlayerMap::with_value(0);
        for (_, stone) in self.stones() {
            counts[stone.owner] += 1;
        }
        counts
    }
}
