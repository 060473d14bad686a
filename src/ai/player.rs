//! The AI opponent.
//!
//! `AiPlayer` owns a policy, a seeded RNG and the statistics of its last
//! selection. `select` takes `&mut self`, so one instance serves one request
//! at a time; run several instances for parallel games.

use std::time::Instant;

use tracing::{debug, warn};

use crate::core::{Action, GameRng, GameState};
use crate::rules::RulesEngine;

use super::config::Difficulty;
use super::personality::Personality;
use super::policy::{MovePolicy, PersonalityPolicy, TierPolicy};
use super::search::{SearchContext, YieldHook};
use super::stats::SearchStats;

/// An artificial opponent.
pub struct AiPlayer {
    policy: Box<dyn MovePolicy>,
    rng: GameRng,
    stats: SearchStats,
    yield_hook: Option<YieldHook>,
}

impl AiPlayer {
    /// Wrap any policy.
    #[must_use]
    pub fn new(policy: Box<dyn MovePolicy>, seed: u64) -> Self {
        Self {
            policy,
            rng: GameRng::new(seed),
            stats: SearchStats::default(),
            yield_hook: None,
        }
    }

    /// An opponent playing a difficulty tier's pipeline.
    #[must_use]
    pub fn from_difficulty(difficulty: Difficulty, seed: u64) -> Self {
        Self::new(Box::new(TierPolicy::new(difficulty)), seed)
    }

    /// An opponent driven by a personality.
    #[must_use]
    pub fn from_personality(personality: Personality, seed: u64) -> Self {
        Self::new(Box::new(PersonalityPolicy::new(personality)), seed)
    }

    /// Call `hook` between root search candidates.
    #[must_use]
    pub fn with_yield_hook(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.yield_hook = Some(Box::new(hook));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.policy.name()
    }

    /// Statistics of the most recent `select`.
    #[must_use]
    pub fn last_stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Start a new game: per-game policy memory and statistics are cleared.
    /// The RNG keeps its stream.
    pub fn reset(&mut self) {
        self.policy.reset();
        self.stats.reset();
    }

    /// Choose an action for the player to move.
    ///
    /// `None` means nothing but `Pass` is available and the caller should
    /// pass (or the game is over).
    pub fn select(&mut self, engine: &RulesEngine, state: &GameState) -> Option<Action> {
        self.stats.reset();
        if state.is_game_over() {
            return None;
        }

        let start = Instant::now();
        let mut ctx = SearchContext {
            engine,
            rng: &mut self.rng,
            stats: &mut self.stats,
            yield_hook: self.yield_hook.as_mut(),
        };
        let chosen = self.policy.select(state, &mut ctx).filter(|a| !a.is_pass());
        self.stats.time_us = start.elapsed().as_micros() as u64;

        let player = state.current_player();
        match chosen {
            Some(action) => match engine.validate(state, player, &action) {
                Ok(()) => {
                    debug!(
                        ai = self.policy.name(),
                        %player,
                        %action,
                        step = self.stats.decided_by.as_deref().unwrap_or("-"),
                        nodes = self.stats.nodes,
                        time_us = self.stats.time_us,
                        nps = self.stats.nodes_per_second() as u64,
                        "ai selected"
                    );
                    Some(action)
                }
                Err(err) => {
                    warn!(
                        ai = self.policy.name(),
                        %action,
                        error = %err,
                        "policy proposed an illegal action"
                    );
                    engine.legal_actions(state).into_iter().find(|a| !a.is_pass())
                }
            },
            None => None,
        }
    }
}

impl std::fmt::Debug for AiPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiPlayer")
            .field("policy", &self.policy.name())
            .field("stats", &self.stats)
            .field("yield_hook", &self.yield_hook.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::config::SearchConfig;
    use crate::core::{GameConfig, PatternKind, Player, SetupBuilder};

    #[test]
    fn test_select_is_reproducible() {
        let engine = RulesEngine::default();
        let state = engine.new_game(Default::default(), Player::Light);

        let mut a = AiPlayer::from_difficulty(Difficulty::Medium, 21);
        let mut b = AiPlayer::from_difficulty(Difficulty::Medium, 21);
        assert_eq!(a.select(&engine, &state), b.select(&engine, &state));
    }

    #[test]
    fn test_select_none_when_only_pass() {
        let engine = RulesEngine::default();
        let config = GameConfig::default().with_stones_per_player(3);
        let state = SetupBuilder::new(&config)
            .locked(Player::Light, PatternKind::Line, &["a1", "b1", "c1"])
            .break_used(Player::Light)
            .build();

        let mut ai = AiPlayer::from_difficulty(Difficulty::Hard, 1);
        assert_eq!(ai.select(&engine, &state), None);
    }

    #[test]
    fn test_stats_and_name() {
        let engine = RulesEngine::default();
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "b1", "c1", "d1", "e1"])
            .build();

        let mut ai = AiPlayer::from_difficulty(Difficulty::Expert, 4);
        assert_eq!(ai.name(), "expert");
        let action = ai.select(&engine, &state).unwrap();
        assert!(matches!(action, Action::Lock { .. }));
        assert_eq!(ai.last_stats().decided_by.as_deref(), Some("win"));

        ai.reset();
        assert_eq!(ai.last_stats().decided_by, None);
    }

    #[test]
    fn test_yield_hook_reaches_search() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let engine = RulesEngine::default();
        let state = engine.new_game(Default::default(), Player::Light);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let personality = Personality::new("searcher")
            .with_threat_awareness(0.0)
            .with_aggression(0.0)
            .with_search(SearchConfig::new(1, 4, 2));
        let mut ai = AiPlayer::from_personality(personality, 3).with_yield_hook(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });

        ai.select(&engine, &state).unwrap();
        assert_eq!(ai.last_stats().decided_by.as_deref(), Some("search"));
        assert_eq!(calls.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn test_ai_player_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<AiPlayer>();
    }
}
