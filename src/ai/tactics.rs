//! Tactical building blocks.
//!
//! Every function here looks at the state from the side of the player to
//! move and either proposes one action or declines with `None`. The
//! difficulty pipelines and personalities are different orderings and
//! gatings of these same blocks.

use crate::core::{Action, GameRng, GameState, Pattern, Player, Position, PositionSet};
use crate::rules::{capture, patterns, victory, RulesEngine};

use super::evaluator::{self, EvalWeights};
use super::locks::{self, LockPreference};
use super::search::ordered_moves;

fn may_end_game(action: &Action) -> bool {
    matches!(action, Action::Lock { .. } | Action::Shift { .. } | Action::BreakLock { .. })
}

/// Actions that win on the spot for the player to move.
///
/// Only locks, shifts and breaks are tried: a drop, a river draw or a pass
/// never ends the game in the mover's favour.
#[must_use]
pub fn winning_actions(engine: &RulesEngine, state: &GameState) -> Vec<Action> {
    let player = state.current_player();
    engine
        .legal_actions(state)
        .into_iter()
        .filter(may_end_game)
        .filter(|a| {
            engine
                .apply(state, player, a)
                .is_ok_and(|r| r.winner() == Some(player))
        })
        .collect()
}

/// What the opponent could win with if it were their turn now.
#[must_use]
pub fn opponent_threats(engine: &RulesEngine, state: &GameState) -> Vec<Action> {
    if state.is_game_over() {
        return Vec::new();
    }
    winning_actions(engine, &state.with_current_player(state.current_player().opponent()))
}

/// Take a win, preferring the lock that strategic selection would pick.
#[must_use]
pub fn immediate_win(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    preference: &LockPreference,
) -> Option<Action> {
    let wins = winning_actions(engine, state);
    let lock_wins: Vec<Pattern> = wins
        .iter()
        .filter_map(|a| match *a {
            Action::Lock { pattern, positions } => {
                pattern.kind().map(|kind| Pattern::new(kind, positions, state.current_player()))
            }
            _ => None,
        })
        .collect();

    locks::choose_lock(weights, state, state.current_player(), &lock_wins, preference)
        .map(|p| Action::lock(p.id))
        .or_else(|| wins.first().copied())
}

/// Best lock by strategic selection, if any pattern is lockable.
#[must_use]
pub fn best_lock(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    preference: &LockPreference,
) -> Option<Action> {
    let player = state.current_player();
    let candidates = engine.lockable_patterns(player, state);
    locks::choose_lock(weights, state, player, &candidates, preference).map(|p| Action::lock(p.id))
}

/// Any lockable pattern, uniformly at random.
#[must_use]
pub fn any_lock(engine: &RulesEngine, state: &GameState, rng: &mut GameRng) -> Option<Action> {
    let candidates = engine.lockable_patterns(state.current_player(), state);
    rng.pick(&candidates).map(|p| Action::lock(p.id))
}

/// A move after which the opponent has no immediate win.
///
/// If no candidate stops every threat, the one leaving the fewest wins.
#[must_use]
pub fn block_win(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    breadth: usize,
) -> Option<Action> {
    if opponent_threats(engine, state).is_empty() {
        return None;
    }

    let player = state.current_player();
    let mut best: Option<(usize, Action)> = None;
    for action in ordered_moves(engine, weights, state, breadth) {
        if action.is_pass() {
            continue;
        }
        let Ok(result) = engine.apply(state, player, &action) else {
            continue;
        };
        match result.outcome {
            Some(outcome) if outcome.winner == Some(player) => return Some(action),
            Some(_) => continue,
            None => {}
        }

        let remaining = winning_actions(engine, &result.state).len();
        if remaining == 0 {
            return Some(action);
        }
        if best.map_or(true, |(n, _)| remaining < n) {
            best = Some((remaining, action));
        }
    }
    best.map(|(_, a)| a)
}

// === Captures ===

/// A scored capturing shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureMove {
    pub action: Action,
    pub captured: usize,
    pub score: i32,
}

/// Every shift that removes at least one opponent stone and loses fewer of
/// our own, scored by stones taken and opponent patterns disrupted.
#[must_use]
pub fn capture_moves(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
) -> Vec<CaptureMove> {
    let player = state.current_player();
    let opponent = player.opponent();
    let board = state.board();
    let threatened = board.free_stones(opponent);

    engine
        .legal_actions(state)
        .into_iter()
        .filter_map(|action| {
            let Action::Shift { from, to } = action else {
                return None;
            };
            let preview = capture::preview_shift(board, player, from, to);
            let (taken, lost) = (preview.captured.len(), preview.self_surrounded.len());
            if taken == 0 || lost >= taken {
                return None;
            }

            let mut score = (taken as i32 - lost as i32) * weights.capture;
            for &pos in &preview.captured {
                for pattern in patterns::patterns_through(threatened, opponent, pos) {
                    score += weights.pattern_value(&pattern);
                }
                let locked = board.get(pos).and_then(|s| s.pattern);
                if let Some(locked) = locked.and_then(|id| state.locked_pattern(id)) {
                    score += weights.pattern_value(locked);
                }
            }
            Some(CaptureMove {
                action,
                captured: preview.captured.len(),
                score,
            })
        })
        .collect()
}

/// Highest-scoring capture taking at least `min_captured` stones.
#[must_use]
pub fn best_capture(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    min_captured: usize,
) -> Option<CaptureMove> {
    capture_moves(engine, state, weights)
        .into_iter()
        .filter(|c| c.captured >= min_captured)
        .fold(None, |best: Option<CaptureMove>, c| match best {
            Some(b) if b.score >= c.score => Some(b),
            _ => Some(c),
        })
}

/// Captures aimed at stones the opponent is building patterns with.
///
/// Severity per captured cell is the value of every unlocked opponent
/// pattern through it, with patterns that would win or complete a set if
/// locked counting far more.
#[must_use]
pub fn pattern_hunt(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
) -> Option<Action> {
    let player = state.current_player();
    let opponent = player.opponent();
    let board = state.board();
    let building = patterns::detect(board, opponent, true);
    if building.is_empty() {
        return None;
    }
    let opp_locked: Vec<Pattern> = state.locked_patterns_of(opponent).copied().collect();

    let severity = |pattern: &Pattern| -> i32 {
        let mut value = weights.pattern_value(pattern);
        if pattern.is_instant_win() || victory::completes_set(&opp_locked, pattern).is_some() {
            value += 4 * weights.near_win;
        }
        value
    };

    let mut best: Option<(i32, Action)> = None;
    for action in engine.legal_actions(state) {
        let Action::Shift { from, to } = action else {
            continue;
        };
        let preview = capture::preview_shift(board, player, from, to);
        if preview.captured.is_empty() || !preview.self_surrounded.is_empty() {
            continue;
        }
        let hit: PositionSet = preview.captured.iter().copied().collect();
        let score: i32 = building
            .iter()
            .filter(|p| !p.positions.is_disjoint(hit))
            .map(|p| severity(p))
            .sum();
        if score > 0 && best.map_or(true, |(s, _)| score > s) {
            best = Some((score, action));
        }
    }
    best.map(|(_, a)| a)
}

// === Threat cells ===

/// Empty cells where one more opponent stone would create a pattern that
/// wins or completes a set once locked, with a severity (2 for an instant
/// win, 1 for a set).
#[must_use]
pub fn threat_cells(state: &GameState, opponent: Player) -> Vec<(Position, u8)> {
    if state.hand(opponent) == 0 {
        return Vec::new();
    }

    let board = state.board();
    let free = board.free_stones(opponent);
    let locked: Vec<Pattern> = state.locked_patterns_of(opponent).copied().collect();

    let mut cells: Vec<(Position, u8)> = board
        .empty_cells()
        .iter()
        .filter_map(|cell| {
            patterns::patterns_through(free | PositionSet::single(cell), opponent, cell)
                .iter()
                .map(|p| {
                    if p.is_instant_win() {
                        2
                    } else if victory::completes_set(&locked, p).is_some() {
                        1
                    } else {
                        0
                    }
                })
                .max()
                .filter(|&severity| severity > 0)
                .map(|severity| (cell, severity))
        })
        .collect();
    cells.sort_by(|a, b| b.1.cmp(&a.1));
    cells
}

/// Occupy the worst opponent threat cell, by drop or by shift.
#[must_use]
pub fn block_near_win(engine: &RulesEngine, state: &GameState) -> Option<Action> {
    let player = state.current_player();
    let cells = threat_cells(state, player.opponent());
    if cells.is_empty() {
        return None;
    }

    let legal = engine.legal_actions(state);
    cells.iter().find_map(|&(cell, _)| {
        legal
            .iter()
            .find(|a| matches!(a, Action::Drop(p) if *p == cell))
            .or_else(|| legal.iter().find(|a| matches!(a, Action::Shift { to, .. } if *to == cell)))
            .copied()
    })
}

// === Master-level ideas ===

/// A move after which we hold two or more distinct winning replies and the
/// opponent has no immediate win of their own.
#[must_use]
pub fn forcing_move(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    breadth: usize,
) -> Option<Action> {
    let player = state.current_player();
    for action in ordered_moves(engine, weights, state, breadth) {
        if action.is_pass() {
            continue;
        }
        let Ok(result) = engine.apply(state, player, &action) else {
            continue;
        };
        if result.is_terminal() || !winning_actions(engine, &result.state).is_empty() {
            continue;
        }
        let follow_ups = winning_actions(engine, &result.state.with_current_player(player));
        if follow_ups.len() >= 2 {
            return Some(action);
        }
    }
    None
}

/// A move that cuts the opponent's legal-move count by at least 30%.
#[must_use]
pub fn suffocation(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    breadth: usize,
) -> Option<Action> {
    let player = state.current_player();
    let baseline = engine
        .legal_actions(&state.with_current_player(player.opponent()))
        .len();
    if baseline == 0 {
        return None;
    }

    let mut best: Option<(usize, Action)> = None;
    for action in ordered_moves(engine, weights, state, breadth) {
        let Ok(result) = engine.apply(state, player, &action) else {
            continue;
        };
        if result.is_terminal() || !winning_actions(engine, &result.state).is_empty() {
            continue;
        }
        let left = engine.legal_actions(&result.state).len();
        if left * 10 <= baseline * 7 && best.map_or(true, |(n, _)| left < n) {
            best = Some((left, action));
        }
    }
    best.map(|(_, a)| a)
}

/// Capture, or close in on the most exposed opponent stone, when the
/// opponent is near elimination.
#[must_use]
pub fn elimination_pressure(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
) -> Option<Action> {
    let player = state.current_player();
    let opponent = player.opponent();
    let threshold = usize::from(engine.config().elimination_threshold);
    if state.stones_in_play(opponent) > threshold + 3 {
        return None;
    }

    if let Some(capture) = best_capture(engine, state, weights, 1) {
        return Some(capture.action);
    }

    let board = state.board();
    let liberties = |pos: Position| -> PositionSet {
        pos.neighbors().into_iter().filter(|n| board.is_empty(*n)).collect()
    };
    let target = board
        .occupied_by(opponent)
        .iter()
        .map(|pos| liberties(pos))
        .filter(|libs| !libs.is_empty())
        .min_by_key(|libs| libs.len())?;

    let legal = engine.legal_actions(state);
    target.iter().find_map(|cell| {
        legal
            .iter()
            .filter(|a| matches!(a, Action::Drop(_) | Action::Shift { .. }))
            .find(|a| a.destination() == Some(cell))
            .copied()
    })
}

/// Break the opponent pattern whose loss sets back their nearest victory
/// set the most, sacrificing our cheapest pair of locked stones.
///
/// Only considered when the opponent is one pattern short of some set and
/// the sacrifice does not drop us to elimination.
#[must_use]
pub fn break_near_complete(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
) -> Option<Action> {
    let player = state.current_player();
    let opponent = player.opponent();
    if state.break_used(player) {
        return None;
    }
    let threshold = usize::from(engine.config().elimination_threshold);
    if state.stones_in_play(player) < threshold + 3 {
        return None;
    }

    let theirs: Vec<Pattern> = state.locked_patterns_of(opponent).copied().collect();
    let near = victory::near_complete_sets(&theirs);
    if near.is_empty() {
        return None;
    }

    let setback = |index: usize| -> usize {
        let without: Vec<Pattern> = theirs
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, p)| *p)
            .collect();
        near.iter()
            .map(|&set| victory::set_progress(set, &theirs) - victory::set_progress(set, &without))
            .sum()
    };
    let (_, target) = theirs
        .iter()
        .enumerate()
        .map(|(i, p)| (setback(i), p))
        .filter(|(s, _)| *s > 0)
        .max_by_key(|(s, p)| (*s, weights.pattern_value(p)))?;

    let own: Vec<Position> = state.board().locked_stones(player).iter().collect();
    let mut cheapest: Option<(i32, [Position; 2])> = None;
    for (i, &a) in own.iter().enumerate() {
        for &b in &own[i + 1..] {
            let cost: i32 = evaluator::sacrificed_patterns(state, [a, b])
                .iter()
                .map(|p| weights.pattern_value(p))
                .sum();
            if cheapest.map_or(true, |(c, _)| cost < c) {
                cheapest = Some((cost, [a, b]));
            }
        }
    }
    let (_, sacrifice) = cheapest?;

    let action = Action::BreakLock {
        sacrifice,
        target: target.positions.first()?,
    };
    engine.validate(state, player, &action).ok().map(|()| action)
}

/// Reclaim the river when short on stones or when ahead on material.
#[must_use]
pub fn river_management(state: &GameState) -> Option<Action> {
    let player = state.current_player();
    if state.river(player).is_empty() {
        return None;
    }
    let starved = state.hand(player) <= 2;
    let leading = state.stones_in_play(player) > state.stones_in_play(player.opponent());
    (starved || leading).then_some(Action::DrawFromRiver)
}

/// Best building move: a drop (or, with an empty hand, a shift) by move
/// score, which rewards the centre and new patterns.
#[must_use]
pub fn build(
    engine: &RulesEngine,
    state: &GameState,
    weights: &EvalWeights,
    center_only: bool,
) -> Option<Action> {
    let player = state.current_player();
    engine
        .legal_actions(state)
        .into_iter()
        .filter(|a| match a {
            Action::Drop(pos) => !center_only || pos.center_distance() <= 1,
            Action::Shift { to, .. } => {
                state.hand(player) == 0 && (!center_only || to.center_distance() <= 1)
            }
            _ => false,
        })
        .map(|a| (evaluator::evaluate_move_with(weights, &a, state, player), a))
        .fold(None, |best: Option<(i32, Action)>, (score, a)| match best {
            Some((s, _)) if s >= score => best,
            _ => Some((score, a)),
        })
        .map(|(_, a)| a)
}

/// Random non-pass move weighted towards the centre, friendly contact and
/// locks.
#[must_use]
pub fn weighted_random(
    engine: &RulesEngine,
    state: &GameState,
    rng: &mut GameRng,
) -> Option<Action> {
    let player = state.current_player();
    let own = state.board().occupied_by(player);
    let actions: Vec<Action> = engine
        .legal_actions(state)
        .into_iter()
        .filter(|a| !a.is_pass())
        .collect();

    let weights: Vec<f64> = actions
        .iter()
        .map(|a| match a.destination() {
            Some(pos) => {
                let centre = f64::from(4 - pos.center_distance().min(4));
                let contact = pos.neighbors().iter().filter(|n| own.contains(**n)).count() as f64;
                1.0 + centre + contact
            }
            None if matches!(a, Action::Lock { .. }) => 3.0,
            None => 1.0,
        })
        .collect();

    rng.pick_weighted(&weights).map(|i| actions[i])
}

/// Reflect the opponent's last drop or shift through the centre.
#[must_use]
pub fn mirror(engine: &RulesEngine, state: &GameState) -> Option<Action> {
    let player = state.current_player();
    let last = state.last_action_by(player.opponent())?;
    let action = match last.action {
        Action::Drop(pos) => Action::Drop(pos.mirrored()),
        Action::Shift { from, to } => Action::Shift {
            from: from.mirrored(),
            to: to.mirrored(),
        },
        _ => return None,
    };
    engine.validate(state, player, &action).ok().map(|()| action)
}
