//! Move-selection policies.
//!
//! A `MovePolicy` turns a state into an action using the tactical blocks,
//! lock selection and the alpha-beta search. Two families exist:
//!
//! - `TierPolicy`: the fixed pipeline of a difficulty tier.
//! - `PersonalityPolicy`: the same blocks, gated and ordered by a
//!   `Personality`.
//!
//! Every step that fires records its name in `SearchStats::decided_by`.

use tracing::debug;

use crate::core::{Action, GameState};

use super::config::{Difficulty, SearchConfig};
use super::evaluator::EvalWeights;
use super::locks::LockPreference;
use super::personality::Personality;
use super::search::{AlphaBeta, SearchContext};
use super::tactics;

/// Pluggable move selection.
pub trait MovePolicy: Send {
    /// Pick an action for the player to move, `None` if only passing is
    /// possible.
    fn select(&mut self, state: &GameState, ctx: &mut SearchContext<'_>) -> Option<Action>;

    /// Display name for logs.
    fn name(&self) -> &str;

    /// Forget per-game memory.
    fn reset(&mut self) {}
}

fn decide(
    ctx: &mut SearchContext<'_>,
    policy: &str,
    step: &'static str,
    action: Option<Action>,
) -> Option<Action> {
    if let Some(action) = action {
        ctx.stats.decided_by = Some(step.to_string());
        debug!(policy, step, %action, "ai decision");
    }
    action
}

/// Return from the enclosing `select` as soon as a step yields an action.
macro_rules! step {
    ($ctx:expr, $policy:expr, $step:literal, $action:expr) => {
        let proposed = $action;
        if let Some(action) = decide($ctx, $policy, $step, proposed) {
            return Some(action);
        }
    };
}

// =============================================================================
// Difficulty tiers
// =============================================================================

/// Odds for the casual (Beginner/Easy) pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CasualOdds {
    win: f64,
    lock: f64,
    best_lock: f64,
    capture: f64,
    river: f64,
    build: f64,
}

impl CasualOdds {
    const BEGINNER: Self = Self {
        win: 0.5,
        lock: 0.3,
        best_lock: 0.2,
        capture: 0.3,
        river: 0.4,
        build: 0.3,
    };

    const EASY: Self = Self {
        win: 0.85,
        lock: 0.5,
        best_lock: 0.5,
        capture: 0.5,
        river: 0.6,
        build: 0.5,
    };
}

/// Medium falls back to the Easy pipeline this often.
const MEDIUM_DEGRADE: f64 = 0.3;
const MEDIUM_LOCK: f64 = 0.8;
const MEDIUM_CAPTURE: f64 = 0.7;

/// The pipeline of one difficulty tier.
#[derive(Clone, Debug)]
pub struct TierPolicy {
    difficulty: Difficulty,
    search: SearchConfig,
    weights: EvalWeights,
    name: String,
}

impl TierPolicy {
    #[must_use]
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            search: difficulty.search_config(),
            weights: EvalWeights::default(),
            name: difficulty.to_string(),
        }
    }

    /// Override the search budget of the final search step.
    #[must_use]
    pub fn with_search(mut self, search: SearchConfig) -> Self {
        self.search = search;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: EvalWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    fn casual(
        &self,
        state: &GameState,
        ctx: &mut SearchContext<'_>,
        odds: CasualOdds,
    ) -> Option<Action> {
        let engine = ctx.engine;
        let name = self.name.as_str();
        let pref = LockPreference::default();

        if ctx.rng.chance(odds.win) {
            step!(ctx, name, "win", tactics::immediate_win(engine, state, &self.weights, &pref));
        }
        if ctx.rng.chance(odds.lock) {
            if ctx.rng.chance(odds.best_lock) {
                let best = tactics::best_lock(engine, state, &self.weights, &pref);
                step!(ctx, name, "best lock", best);
            } else {
                step!(ctx, name, "any lock", tactics::any_lock(engine, state, ctx.rng));
            }
        }
        if ctx.rng.chance(odds.capture) {
            step!(
                ctx,
                name,
                "capture",
                tactics::best_capture(engine, state, &self.weights, 1).map(|c| c.action)
            );
        }
        if state.hand(state.current_player()) <= 2 && ctx.rng.chance(odds.river) {
            step!(ctx, name, "river", tactics::river_management(state));
        }
        if ctx.rng.chance(odds.build) {
            step!(ctx, name, "build", tactics::build(engine, state, &self.weights, false));
        }
        step!(ctx, name, "random", tactics::weighted_random(engine, state, ctx.rng));
        None
    }

    fn medium(&self, state: &GameState, ctx: &mut SearchContext<'_>) -> Option<Action> {
        if ctx.rng.chance(MEDIUM_DEGRADE) {
            return self.casual(state, ctx, CasualOdds::EASY);
        }

        let engine = ctx.engine;
        let name = self.name.as_str();
        let pref = LockPreference::default();

        step!(ctx, name, "win", tactics::immediate_win(engine, state, &self.weights, &pref));
        if ctx.rng.chance(MEDIUM_LOCK) {
            step!(ctx, name, "best lock", tactics::best_lock(engine, state, &self.weights, &pref));
        }
        if ctx.rng.chance(MEDIUM_CAPTURE) {
            step!(
                ctx,
                name,
                "capture",
                tactics::best_capture(engine, state, &self.weights, 1).map(|c| c.action)
            );
        }
        let search = AlphaBeta::new(self.search.with_depth(1), &self.weights);
        step!(ctx, name, "search", search.search(state, ctx).map(|r| r.action));
        None
    }

    fn strict(&self, state: &GameState, ctx: &mut SearchContext<'_>) -> Option<Action> {
        let engine = ctx.engine;
        let name = self.name.as_str();
        let w = &self.weights;
        let pref = LockPreference::default();
        let expert = self.difficulty >= Difficulty::Expert;
        let master = self.difficulty >= Difficulty::Master;
        let breadth = self.search.root_breadth;

        step!(ctx, name, "win", tactics::immediate_win(engine, state, w, &pref));
        step!(ctx, name, "block win", tactics::block_win(engine, state, w, breadth * 2));
        if expert {
            step!(ctx, name, "pattern hunt", tactics::pattern_hunt(engine, state, w));
        }
        step!(
            ctx,
            name,
            "aggressive capture",
            tactics::best_capture(engine, state, w, 1)
                .filter(|c| c.score > w.capture)
                .map(|c| c.action)
        );
        step!(ctx, name, "block near win", tactics::block_near_win(engine, state));
        if master {
            step!(ctx, name, "forcing move", tactics::forcing_move(engine, state, w, breadth));
            step!(
                ctx,
                name,
                "multi capture",
                tactics::best_capture(engine, state, w, 2).map(|c| c.action)
            );
            step!(ctx, name, "suffocation", tactics::suffocation(engine, state, w, breadth / 2));
        }
        step!(ctx, name, "elimination pressure", tactics::elimination_pressure(engine, state, w));
        step!(ctx, name, "break", tactics::break_near_complete(engine, state, w));
        step!(ctx, name, "river", tactics::river_management(state));

        let search = AlphaBeta::new(self.search, w);
        step!(ctx, name, "search", search.search(state, ctx).map(|r| r.action));
        None
    }
}

impl MovePolicy for TierPolicy {
    fn select(&mut self, state: &GameState, ctx: &mut SearchContext<'_>) -> Option<Action> {
        if state.is_game_over() {
            return None;
        }
        match self.difficulty {
            Difficulty::Beginner => self.casual(state, ctx, CasualOdds::BEGINNER),
            Difficulty::Easy => self.casual(state, ctx, CasualOdds::EASY),
            Difficulty::Medium => self.medium(state, ctx),
            Difficulty::Hard | Difficulty::Expert | Difficulty::Master => self.strict(state, ctx),
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Personalities
// =============================================================================

/// Chance a personality locks its favourite pattern when one is available.
const PERSONALITY_LOCK: f64 = 0.7;

/// A personality driving the tactical blocks.
#[derive(Clone, Debug)]
pub struct PersonalityPolicy {
    personality: Personality,
    weights: EvalWeights,
    preference: LockPreference,
    hesitated: bool,
}

impl PersonalityPolicy {
    #[must_use]
    pub fn new(personality: Personality) -> Self {
        let mut weights = EvalWeights::default();
        let scale = 0.5 + personality.aggression;
        weights.capture = (f64::from(weights.capture) * scale).round() as i32;
        if personality.toggles.center_obsession {
            weights.move_center *= 2;
            weights.center *= 2;
        }
        Self {
            preference: personality.lock_preference(),
            personality,
            weights,
            hesitated: false,
        }
    }

    #[must_use]
    pub fn personality(&self) -> &Personality {
        &self.personality
    }

    /// Whether the one-time hesitation has been spent this game.
    #[must_use]
    pub fn has_hesitated(&self) -> bool {
        self.hesitated
    }
}

impl MovePolicy for PersonalityPolicy {
    fn select(&mut self, state: &GameState, ctx: &mut SearchContext<'_>) -> Option<Action> {
        if state.is_game_over() {
            return None;
        }

        let engine = ctx.engine;
        let p = &self.personality;
        let name = p.name.as_str();
        let w = &self.weights;
        let player = state.current_player();

        // Drops never win, so building is a safe way to let the win slip.
        let win = tactics::immediate_win(engine, state, w, &self.preference);
        if win.is_some() && !self.hesitated && ctx.rng.chance(p.hesitation) {
            self.hesitated = true;
            debug!(policy = name, "hesitating on a winning move");
            step!(ctx, name, "hesitate", tactics::build(engine, state, w, false));
        } else {
            step!(ctx, name, "win", win);
        }

        if ctx.rng.chance(p.chaos) {
            step!(ctx, name, "chaos", tactics::weighted_random(engine, state, ctx.rng));
        }
        if ctx.rng.chance(p.mirror) {
            step!(ctx, name, "mirror", tactics::mirror(engine, state));
        }

        let breadth = p.search.root_breadth;
        let aware = ctx.rng.chance(p.threat_awareness);
        if aware {
            step!(ctx, name, "block win", tactics::block_win(engine, state, w, breadth * 2));
        }

        let behind = state
            .stones_in_play(player.opponent())
            .saturating_sub(state.stones_in_play(player));
        if ctx.rng.chance(p.effective_aggression(behind)) {
            step!(ctx, name, "pattern hunt", tactics::pattern_hunt(engine, state, w));
            step!(
                ctx,
                name,
                "capture",
                tactics::best_capture(engine, state, w, 1).map(|c| c.action)
            );
        }

        if aware {
            step!(ctx, name, "block near win", tactics::block_near_win(engine, state));
        }
        if p.toggles.traps {
            step!(ctx, name, "trap", tactics::forcing_move(engine, state, w, breadth));
        }
        if p.toggles.suffocation {
            step!(ctx, name, "suffocation", tactics::suffocation(engine, state, w, breadth / 2));
        }
        step!(ctx, name, "elimination pressure", tactics::elimination_pressure(engine, state, w));
        if p.toggles.breaks {
            step!(ctx, name, "break", tactics::break_near_complete(engine, state, w));
        }
        if p.toggles.river_denial || state.hand(player) == 0 {
            step!(ctx, name, "river", tactics::river_management(state));
        }
        if ctx.rng.chance(PERSONALITY_LOCK) {
            step!(ctx, name, "lock", tactics::best_lock(engine, state, w, &self.preference));
        }
        if p.toggles.center_obsession {
            step!(ctx, name, "centre", tactics::build(engine, state, w, true));
        }

        let search = AlphaBeta::new(p.search, w);
        step!(ctx, name, "search", search.search(state, ctx).map(|r| r.action));
        step!(ctx, name, "random", tactics::weighted_random(engine, state, ctx.rng));
        None
    }

    fn name(&self) -> &str {
        &self.personality.name
    }

    fn reset(&mut self) {
        self.hesitated = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::stats::SearchStats;
    use crate::core::{GameRng, PatternKind, Player, Position, SetupBuilder};
    use crate::rules::RulesEngine;

    fn p(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn run(
        policy: &mut dyn MovePolicy,
        state: &GameState,
        seed: u64,
    ) -> (Option<Action>, SearchStats) {
        let engine = RulesEngine::default();
        let mut rng = GameRng::new(seed);
        let mut stats = SearchStats::default();
        let mut ctx = SearchContext {
            engine: &engine,
            rng: &mut rng,
            stats: &mut stats,
            yield_hook: None,
        };
        let action = policy.select(state, &mut ctx);
        (action, stats)
    }

    fn five_in_a_row() -> GameState {
        SetupBuilder::new(&Default::default())
            .stones(Player::Light, &["a1", "b1", "c1", "d1", "e1"])
            .stones(Player::Dark, &["c4"])
            .build()
    }

    #[test]
    fn test_strict_tiers_take_the_win() {
        for difficulty in [Difficulty::Hard, Difficulty::Expert, Difficulty::Master] {
            let (action, stats) = run(&mut TierPolicy::new(difficulty), &five_in_a_row(), 3);
            assert!(matches!(action, Some(Action::Lock { .. })), "{difficulty}");
            assert_eq!(stats.decided_by.as_deref(), Some("win"));
        }
    }

    #[test]
    fn test_hard_blocks_opponent_win() {
        let state = SetupBuilder::new(&Default::default())
            .stones(Player::Dark, &["a1", "b1", "c1", "d1", "e1"])
            .stones(Player::Light, &["c2"])
            .build();

        let (action, stats) = run(&mut TierPolicy::new(Difficulty::Hard), &state, 1);
        assert_eq!(stats.decided_by.as_deref(), Some("block win"));

        let action = action.unwrap();
        assert!(matches!(action, Action::Shift { from, .. } if from == p("c2")), "{action}");
        let engine = RulesEngine::default();
        let after = engine.apply(&state, Player::Light, &action).unwrap().state;
        assert!(crate::ai::tactics::winning_actions(&engine, &after).is_empty());
    }

    #[test]
    fn test_every_tier_returns_a_legal_move() {
        let engine = RulesEngine::default();
        let state = engine.new_game(Default::default(), Player::Light);
        for difficulty in Difficulty::ALL {
            let mut policy = TierPolicy::new(difficulty).with_search(SearchConfig::new(1, 6, 3));
            let (action, stats) = run(&mut policy, &state, 11);
            let action = action.unwrap();
            let legal = engine.validate(&state, Player::Light, &action);
            assert!(legal.is_ok(), "{difficulty}: {action}");
            assert!(stats.decided_by.is_some());
        }
    }

    #[test]
    fn test_tier_is_deterministic() {
        let engine = RulesEngine::default();
        let state = engine.new_game(Default::default(), Player::Dark);
        let (a, _) = run(&mut TierPolicy::new(Difficulty::Easy), &state, 42);
        let (b, _) = run(&mut TierPolicy::new(Difficulty::Easy), &state, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_move_when_only_pass() {
        let config = crate::core::GameConfig::default().with_stones_per_player(3);
        let state = SetupBuilder::new(&config)
            .locked(Player::Light, PatternKind::Line, &["a1", "b1", "c1"])
            .break_used(Player::Light)
            .build();
        for difficulty in Difficulty::ALL {
            let (action, _) = run(&mut TierPolicy::new(difficulty), &state, 5);
            assert_eq!(action, None, "{difficulty}");
        }
    }

    #[test]
    fn test_hesitation_happens_once() {
        let personality = Personality::new("doubter").with_hesitation(1.0);
        let mut policy = PersonalityPolicy::new(personality);
        let state = five_in_a_row();

        let (action, first) = run(&mut policy, &state, 8);
        assert!(policy.has_hesitated());
        assert!(matches!(action, Some(Action::Drop(_))));
        assert_eq!(first.decided_by.as_deref(), Some("hesitate"));

        let (action, second) = run(&mut policy, &state, 8);
        assert!(matches!(action, Some(Action::Lock { .. })));
        assert_eq!(second.decided_by.as_deref(), Some("win"));

        policy.reset();
        assert!(!policy.has_hesitated());
    }

    #[test]
    fn test_mirror_personality() {
        let engine = RulesEngine::default();
        let state = engine.new_game(Default::default(), Player::Dark);
        let state = engine.apply(&state, Player::Dark, &Action::Drop(p("b2"))).unwrap().state;

        let personality = Personality::new("copycat").with_mirror(1.0).with_threat_awareness(0.0);
        let (action, stats) = run(&mut PersonalityPolicy::new(personality), &state, 2);
        assert_eq!(action, Some(Action::Drop(p("e5"))));
        assert_eq!(stats.decided_by.as_deref(), Some("mirror"));
    }

    #[test]
    fn test_presets_play_legal_moves() {
        let engine = RulesEngine::default();
        let state = engine.new_game(Default::default(), Player::Light);
        for name in crate::ai::personality::PRESET_NAMES {
            let personality = crate::ai::personality::preset(name)
                .unwrap()
                .with_search(SearchConfig::new(1, 6, 3));
            let (action, _) = run(&mut PersonalityPolicy::new(personality), &state, 13);
            let action = action.unwrap();
            assert!(engine.validate(&state, Player::Light, &action).is_ok(), "{name}: {action}");
        }
    }
}
