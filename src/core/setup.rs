//! Builder for arranged positions (puzzles, tests, tutorials).
//!
//! Every stone placed by the builder comes out of its owner's hand, and
//! river stones come out of the hand too, so a built position conserves
//! the configured stone total exactly like a played one.
//!
//! ```
//! use riverstone::core::{GameConfig, PatternKind, Player, SetupBuilder};
//!
//! let state = SetupBuilder::new(&GameConfig::default())
//!     .stones(Player::Light, &["a1", "b1"])
//!     .locked(Player::Dark, PatternKind::Line, &["a6", "b6", "c6"])
//!     .river(Player::Light, 2)
//!     .to_move(Player::Dark)
//!     .build();
//!
//! assert_eq!(state.hand(Player::Light), 8);
//! assert_eq!(state.locked_patterns().len(), 1);
//! assert_eq!(state.conservation_total(), 24);
//! ```
//!
//! Builder methods panic on impossible arrangements (occupied cells, empty
//! hands, bad notation): they describe fixed positions, not player input.

use super::config::{GameConfig, GameMode};
use super::pattern::{Pattern, PatternKind};
use super::player::Player;
use super::position::{Position, PositionSet};
use super::state::GameState;

pub struct SetupBuilder {
    state: GameState,
}

impl SetupBuilder {
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            state: GameState::new(config, GameMode::HumanVsHuman, Player::Light),
        }
    }

    fn parse(cell: &str) -> Position {
        cell.parse()
            .unwrap_or_else(|e| panic!("setup cell {cell:?}: {e}"))
    }

    fn take_from_hand(&mut self, player: Player) {
        let hand = &mut self.state.hands[player];
        assert!(*hand > 0, "{player} has no stones left in hand for setup");
        *hand -= 1;
    }

    /// Place one unlocked stone.
    #[must_use]
    pub fn stone_at(mut self, player: Player, pos: Position) -> Self {
        self.take_from_hand(player);
        let stone = self.state.alloc_stone(player);
        self.state.board.place(pos, stone);
        self
    }

    /// Place unlocked stones given in notation.
    #[must_use]
    pub fn stones(mut self, player: Player, cells: &[&str]) -> Self {
        for cell in cells {
            self = self.stone_at(player, Self::parse(cell));
        }
        self
    }

    /// Place stones and lock them as a pattern of `kind`.
    #[must_use]
    pub fn locked(mut self, player: Player, kind: PatternKind, cells: &[&str]) -> Self {
        let positions: PositionSet = cells.iter().map(|c| Self::parse(c)).collect();
        let pattern = Pattern::new(kind, positions, player);
        for pos in positions.iter() {
            self = self.stone_at(player, pos);
            if let Some(stone) = self.state.board.get_mut(pos) {
                stone.lock(pattern.id);
            }
        }
        self.state.locked_patterns.push(pattern);
        self
    }

    /// Move `count` stones from hand into the river.
    #[must_use]
    pub fn river(mut self, player: Player, count: u8) -> Self {
        for _ in 0..count {
            self.take_from_hand(player);
            let stone = self.state.alloc_stone(player);
            self.state.rivers[player].push(stone);
        }
        self
    }

    #[must_use]
    pub fn to_move(mut self, player: Player) -> Self {
        self.state.current_player = player;
        self
    }

    #[must_use]
    pub fn mode(mut self, mode: GameMode) -> Self {
        self.state.mode = mode;
        self
    }

    #[must_use]
    pub fn passes_used(mut self, player: Player, passes: u8) -> Self {
        self.state.passes_used[player] = passes;
        self
    }

    #[must_use]
    pub fn break_used(mut self, player: Player) -> Self {
        self.state.break_used[player] = true;
        self
    }

    #[must_use]
    pub fn build(self) -> GameState {
        self.state
    }
}
