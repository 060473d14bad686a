//! # riverstone
//!
//! Rules engine and computer opponents for Riverstone, a two-player game of
//! stones on a 6×6 board.
//!
//! ## Design Principles
//!
//! 1. **One Transition Function**: every state change goes through
//!    `RulesEngine::apply`, which validates, performs and scores an action
//!    on a copy of the state.
//!
//! 2. **Plain Data**: states, actions and outcomes are `Clone + Send`
//!    values with serde support. Nothing is shared or mutated behind the
//!    caller's back.
//!
//! 3. **Deterministic**: equal states and actions give equal results, and
//!    every AI is driven by a seeded RNG.
//!
//! ## Modules
//!
//! - `core`: positions, stones, board, patterns, actions, state
//! - `rules`: pattern detection, captures, validation, victory, the engine
//! - `ai`: evaluator, alpha-beta search, difficulty tiers, personalities
//! - `controller`: selection handling and event notification for front ends
//! - `snapshot`: opaque state serialization
//!
//! ## Example
//!
//! ```rust
//! use riverstone::{Action, Player, RulesEngine};
//!
//! let engine = RulesEngine::default();
//! let state = engine.new_game(Default::default(), Player::Light);
//! assert_eq!(engine.legal_actions(&state).len(), 36);
//!
//! let result = engine.apply(&state, Player::Light, &Action::Drop("c3".parse().unwrap())).unwrap();
//! assert_eq!(result.state.hand(Player::Light), 11);
//! assert_eq!(result.state.current_player(), Player::Dark);
//! ```

pub mod core;
pub mod rules;
pub mod ai;
pub mod controller;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, Board, GameConfig, GameMode, GameOutcome, GameRng, GameState, MoveError,
    Pattern, PatternId, PatternKind, Player, PlayerMap, Position, PositionSet, Stone, VictoryKind,
    VictorySet,
};

pub use crate::rules::{Captures, MoveResult, RulesEngine};

pub use crate::ai::{AiPlayer, Difficulty, EvalWeights, Personality, SearchConfig, SearchStats};

pub use crate::controller::{GameController, GameEvent, GameListener, TapOutcome};

pub use crate::snapshot::SnapshotError;
