//! Game state.
//!
//! ## GameState
//!
//! The aggregate the rules engine transforms:
//! - Board, hands and rivers
//! - Locked patterns
//! - Turn, pass, break and cooldown bookkeeping
//! - Move history
//! - Terminal outcome
//!
//! Fields are crate-private: the rules engine is the only writer. Readers
//! use the accessors; test and puzzle positions are built with
//! [`SetupBuilder`](super::setup::SetupBuilder).
//!
//! History is an `im::Vector` so cloning a state for search is cheap no
//! matter how long the game has run.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::action::ActionRecord;
use super::board::Board;
use super::config::{GameConfig, GameMode};
use super::outcome::GameOutcome;
use super::pattern::{Pattern, PatternId};
use super::player::{Player, PlayerMap};
use super::position::PositionSet;
use super::stone::{Stone, StoneId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) board: Board,
    pub(crate) hands: PlayerMap<u8>,
    pub(crate) rivers: PlayerMap<Vec<Stone>>,
    pub(crate) locked_patterns: Vec<Pattern>,
    pub(crate) current_player: Player,
    pub(crate) turn_number: u32,
    pub(crate) history: Vector<ActionRecord>,
    pub(crate) passes_used: PlayerMap<u8>,
    pub(crate) break_used: PlayerMap<bool>,
    pub(crate) lock_cooldown: PlayerMap<PositionSet>,
    pub(crate) mode: GameMode,
    pub(crate) outcome: Option<GameOutcome>,
    pub(crate) next_stone_id: u32,
}

impl GameState {
    /// A fresh game: empty board, full hands, empty rivers.
    #[must_use]
    pub fn new(config: &GameConfig, mode: GameMode, starting_player: Player) -> Self {
        Self {
            board: Board::new(),
            hands: PlayerMap::with_value(config.stones_per_player),
            rivers: PlayerMap::default(),
            locked_patterns: Vec::new(),
            current_player: starting_player,
            turn_number: 1,
            history: Vector::new(),
            passes_used: PlayerMap::with_value(0),
            break_used: PlayerMap::with_value(false),
            lock_cooldown: PlayerMap::with_value(PositionSet::EMPTY),
            mode,
            outcome: None,
            next_stone_id: 0,
        }
    }

    // === Reading ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Stones a player still holds in hand.
    #[must_use]
    pub fn hand(&self, player: Player) -> u8 {
        self.hands[player]
    }

    /// A player's captured stones awaiting reclaim, oldest first.
    #[must_use]
    pub fn river(&self, player: Player) -> &[Stone] {
        &self.rivers[player]
    }

    #[must_use]
    pub fn locked_patterns(&self) -> &[Pattern] {
        &self.locked_patterns
    }

    /// Locked patterns owned by `player`.
    pub fn locked_patterns_of(&self, player: Player) -> impl Iterator<Item = &Pattern> {
        self.locked_patterns.iter().filter(move |p| p.owner == player)
    }

    #[must_use]
    pub fn locked_pattern(&self, id: PatternId) -> Option<&Pattern> {
        self.locked_patterns.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Turn counter, starting at 1 and advancing on every non-terminal move.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Most recent action by `player`.
    #[must_use]
    pub fn last_action_by(&self, player: Player) -> Option<&ActionRecord> {
        self.history.iter().rev().find(|r| r.player == player)
    }

    #[must_use]
    pub fn passes_used(&self, player: Player) -> u8 {
        self.passes_used[player]
    }

    #[must_use]
    pub fn break_used(&self, player: Player) -> bool {
        self.break_used[player]
    }

    /// Cells `player` may not lock on their current turn.
    #[must_use]
    pub fn lock_cooldown(&self, player: Player) -> PositionSet {
        self.lock_cooldown[player]
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(|o| o.winner)
    }

    /// Hand plus board: the count elimination looks at.
    #[must_use]
    pub fn stones_in_play(&self, player: Player) -> usize {
        usize::from(self.hands[player]) + self.board.count(player)
    }

    /// Hand plus board plus river.
    #[must_use]
    pub fn total_stones(&self, player: Player) -> usize {
        self.stones_in_play(player) + self.rivers[player].len()
    }

    /// Stones of both players wherever they are. Constant over a game.
    #[must_use]
    pub fn conservation_total(&self) -> usize {
        Player::BOTH.iter().map(|&p| self.total_stones(p)).sum()
    }

    /// Captures made so far by `player`, counted from history.
    #[must_use]
    pub fn captures_by(&self, player: Player) -> usize {
        self.history
            .iter()
            .filter(|r| r.player == player)
            .map(|r| r.captured.len())
            .sum()
    }

    // === Mutation (engine only) ===

    pub(crate) fn alloc_stone(&mut self, owner: Player) -> Stone {
        let id = StoneId(self.next_stone_id);
        self.next_stone_id += 1;
        Stone::new(id, owner)
    }

    /// A copy of this state with a different player to move.
    ///
    /// Used by the AI to ask "what could the opponent do from here".
    #[must_use]
    pub fn with_current_player(&self, player: Player) -> Self {
        let mut state = self.clone();
        state.current_player = player;
        state
    }
}
