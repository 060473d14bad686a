//! Game rules.
//!
//! - `patterns`: shape detection over one player's stones
//! - `capture`: surrounding
//! - `validator`: accept/reject and legal-action enumeration
//! - `victory`: elimination, instant wins, victory sets
//! - `engine`: `RulesEngine`, the only code that produces new states
//!
//! Everything here is pure: functions take a state by reference and never
//! keep it.

pub mod patterns;
pub mod capture;
pub mod validator;
pub mod victory;
pub mod engine;

pub use capture::Captures;
pub use engine::{MoveResult, RulesEngine};
