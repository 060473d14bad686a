//! Artificial opponents.
//!
//! ## Overview
//!
//! Move selection is layered:
//!
//! - **Evaluator**: static scoring of states and of single actions
//! - **Search**: depth-bounded alpha-beta over evaluator-ordered candidates
//! - **Tactics**: one-shot building blocks (win, block, capture, break...)
//! - **Policies**: difficulty tiers and personalities, each an ordering of
//!   the building blocks that ends in a search
//!
//! ## Usage
//!
//! ```rust
//! use riverstone::ai::{AiPlayer, Difficulty};
//! use riverstone::core::Player;
//! use riverstone::rules::RulesEngine;
//!
//! let engine = RulesEngine::default();
//! let state = engine.new_game(Default::default(), Player::Light);
//!
//! let mut ai = AiPlayer::from_difficulty(Difficulty::Easy, 7);
//! if let Some(action) = ai.select(&engine, &state) {
//!     let result = engine.apply(&state, Player::Light, &action).unwrap();
//!     assert_eq!(result.state.current_player(), Player::Dark);
//! }
//! ```
//!
//! Personalities are looked up by name:
//!
//! ```rust
//! use riverstone::ai::{personality, AiPlayer};
//!
//! let raider = personality::preset("raider").unwrap();
//! let ai = AiPlayer::from_personality(raider, 1);
//! assert_eq!(ai.name(), "raider");
//! ```

pub mod config;
pub mod evaluator;
pub mod locks;
pub mod personality;
pub mod player;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tactics;

pub use config::{Difficulty, SearchConfig};
pub use evaluator::{evaluate, evaluate_move, EvalWeights};
pub use locks::{choose_lock, LockPreference};
pub use personality::{Personality, Toggles};
pub use player::AiPlayer;
pub use policy::{MovePolicy, PersonalityPolicy, TierPolicy};
pub use search::{AlphaBeta, SearchContext, SearchResult, YieldHook};
pub use stats::SearchStats;
