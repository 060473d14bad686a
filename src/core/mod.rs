//! Core types: geometry, stones, board, patterns, actions, state.
//!
//! Everything here is plain data. The rules that move it live in `rules`.

pub mod position;
pub mod player;
pub mod stone;
pub mod pattern;
pub mod board;
pub mod action;
pub mod outcome;
pub mod config;
pub mod error;
pub mod rng;
pub mod state;
pub mod setup;

pub use position::{ParsePositionError, Position, PositionSet, BOARD_SIZE, CELL_COUNT};
pub use player::{Player, PlayerMap};
pub use stone::{Stone, StoneId};
pub use pattern::{Pattern, PatternId, PatternKind};
pub use board::Board;
pub use action::{Action, ActionRecord};
pub use outcome::{GameOutcome, VictoryKind, VictorySet};
pub use config::{GameConfig, GameMode};
pub use error::MoveError;
pub use rng::GameRng;
pub use state::GameState;
pub use setup::SetupBuilder;
