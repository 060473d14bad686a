//! Depth-bounded alpha-beta minimax.
//!
//! Candidates at every node are ordered by `evaluate_move` and cut to the
//! configured breadth: `root_breadth` at the root, `inner_breadth` below.
//! Leaves are scored by the static evaluator from the searching player's
//! side. Wins found sooner score slightly higher than wins found later.
//!
//! The search is a plain recursive walk over cloned states. Between root
//! candidates it calls the context's yield hook so a host event loop can
//! breathe during long searches; there is no cancellation.

use std::time::Instant;

use tracing::debug;

use crate::core::{Action, GameRng, GameState, Player};
use crate::rules::RulesEngine;

use super::config::SearchConfig;
use super::evaluator::{self, EvalWeights};
use super::stats::SearchStats;

/// Host callback run between root candidates.
pub type YieldHook = Box<dyn FnMut() + Send>;

/// Mutable services a selection runs with.
pub struct SearchContext<'a> {
    pub engine: &'a RulesEngine,
    pub rng: &'a mut GameRng,
    pub stats: &'a mut SearchStats,
    pub yield_hook: Option<&'a mut YieldHook>,
}

impl SearchContext<'_> {
    /// Give the host a chance to run.
    pub fn yield_now(&mut self) {
        if let Some(hook) = self.yield_hook.as_deref_mut() {
            hook();
        }
    }
}

/// Best root move and its backed-up score.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub action: Action,
    pub score: i32,
}

/// Candidates for the player to move, best first, at most `breadth`.
///
/// `Pass` is only kept when it is the only legal action.
#[must_use]
pub fn ordered_moves(
    engine: &RulesEngine,
    weights: &EvalWeights,
    state: &GameState,
    breadth: usize,
) -> Vec<Action> {
    let player = state.current_player();
    let mut scored: Vec<(i32, Action)> = engine
        .legal_actions(state)
        .into_iter()
        .filter(|a| !a.is_pass())
        .map(|a| (evaluator::evaluate_move_with(weights, &a, state, player), a))
        .collect();

    if scored.is_empty() {
        return engine.legal_actions(state);
    }

    // Stable: equal scores keep enumeration order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(breadth.max(1));
    scored.into_iter().map(|(_, a)| a).collect()
}

/// Alpha-beta searcher for one configuration.
pub struct AlphaBeta<'w> {
    config: SearchConfig,
    weights: &'w EvalWeights,
}

impl<'w> AlphaBeta<'w> {
    #[must_use]
    pub fn new(config: SearchConfig, weights: &'w EvalWeights) -> Self {
        Self { config, weights }
    }

    /// Best move for the player to move in `state`.
    ///
    /// Returns `None` if the state is terminal or nothing but `Pass` is
    /// legal.
    pub fn search(&self, state: &GameState, ctx: &mut SearchContext<'_>) -> Option<SearchResult> {
        let start = Instant::now();
        let player = state.current_player();
        if state.is_game_over() {
            return None;
        }

        let root_breadth = self.config.root_breadth;
        let candidates: Vec<Action> = ordered_moves(ctx.engine, self.weights, state, root_breadth)
            .into_iter()
            .filter(|a| !a.is_pass())
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let depth = self.config.depth.max(1);
        let mut best: Option<SearchResult> = None;
        let mut alpha = i32::MIN + 1;
        let beta = i32::MAX;

        for action in candidates {
            ctx.yield_now();
            ctx.stats.root_candidates += 1;

            let Ok(result) = ctx.engine.apply(state, player, &action) else {
                continue;
            };
            let score = self.minimax(&result.state, player, depth - 1, 1, alpha, beta, ctx);

            if best.map_or(true, |b| score > b.score) {
                best = Some(SearchResult { action, score });
            }
            alpha = alpha.max(score);
        }

        ctx.stats.time_us += start.elapsed().as_micros() as u64;
        if let Some(best) = best {
            debug!(
                %player,
                action = %best.action,
                score = best.score,
                nodes = ctx.stats.nodes,
                cutoffs = ctx.stats.cutoffs,
                "search finished"
            );
        }
        best
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &self,
        state: &GameState,
        root: Player,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        mut beta: i32,
        ctx: &mut SearchContext<'_>,
    ) -> i32 {
        ctx.stats.nodes += 1;
        ctx.stats.record_depth(ply);

        if state.is_game_over() || depth == 0 {
            ctx.stats.leaves += 1;
            return self.leaf(state, root, depth);
        }

        let moves = ordered_moves(ctx.engine, self.weights, state, self.config.inner_breadth);
        if moves.is_empty() {
            ctx.stats.leaves += 1;
            return self.leaf(state, root, depth);
        }

        let mover = state.current_player();
        let maximizing = mover == root;
        let mut best = if maximizing { i32::MIN + 1 } else { i32::MAX };

        for action in moves {
            let Ok(result) = ctx.engine.apply(state, mover, &action) else {
                continue;
            };
            let score = self.minimax(&result.state, root, depth - 1, ply + 1, alpha, beta, ctx);

            if maximizing {
                best = best.max(score);
                alpha = alpha.max(score);
            } else {
                best = best.min(score);
                beta = beta.min(score);
            }
            if alpha >= beta {
                ctx.stats.cutoffs += 1;
                break;
            }
        }
        best
    }

    fn leaf(&self, state: &GameState, root: Player, depth_left: u8) -> i32 {
        let score = evaluator::evaluate_with(self.weights, state, root);
        // Prefer quick wins and slow losses.
        if state.is_game_over() {
            let urgency = i32::from(depth_left);
            match state.winner() {
                Some(winner) if winner == root => score + urgency,
                Some(_) => score - urgency,
                None => score,
            }
        } else {
            score
        }
    }
}
