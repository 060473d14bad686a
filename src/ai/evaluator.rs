//! Static position and move scoring.
//!
//! `evaluate` scores a whole position from one player's side as "mine minus
//! theirs" over a handful of terms. `evaluate_move` scores a single
//! candidate without applying it; the search uses it for move ordering and
//! the shallow pipelines use it directly.
//!
//! ## Position terms
//!
//! | Term          | Weight                                       |
//! |---------------|----------------------------------------------|
//! | Material      | 50 per stone in hand or on board             |
//! | Presence      | 40 per stone on board                        |
//! | Locked        | per pattern, see `EvalWeights::pattern_value`|
//! | Set progress  | filled fraction × set value, per set         |
//! | Near win      | per set one pattern short                    |
//! | Potential     | 30 per lockable pattern                      |
//! | Centre        | 20 per centre cell held                      |
//! | Connectivity  | 8 per orthogonally adjacent friendly pair    |
//! | River         | 10 per stone waiting in the river            |

use serde::{Deserialize, Serialize};

use crate::core::{
    Action, Board, GameState, Pattern, PatternKind, Player, Position, PositionSet, VictorySet,
};
use crate::rules::{capture, patterns, victory};

/// Every weight the evaluator uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalWeights {
    /// Score of a won position (negated for a lost one).
    pub terminal: i32,
    pub material: i32,
    pub presence: i32,
    pub line_per_stone: i32,
    pub long_line_bonus: i32,
    pub cross: i32,
    pub gate: i32,
    pub bend: i32,
    pub hook: i32,
    pub pod: i32,
    pub near_win: i32,
    pub potential: i32,
    /// Value of a victory set per slot; a full set is worth this × slots.
    pub set_slot: i32,
    pub center: i32,
    pub connectivity: i32,
    pub river: i32,

    // Move scoring.
    pub capture: i32,
    pub move_center: i32,
    pub pattern_creation: i32,
    pub lock_bonus: i32,
    pub river_draw: i32,
    pub break_bonus: i32,
    pub pass_penalty: i32,
}

impl Default for EvalWeights {
    fn default() -> Self {
        Self {
            terminal: 100_000,
            material: 50,
            presence: 40,
            line_per_stone: 120,
            long_line_bonus: 5000,
            cross: 10_000,
            gate: 200,
            bend: 100,
            hook: 150,
            pod: 80,
            near_win: 400,
            potential: 30,
            set_slot: 150,
            center: 20,
            connectivity: 8,
            river: 10,

            capture: 300,
            move_center: 12,
            pattern_creation: 40,
            lock_bonus: 100,
            river_draw: 60,
            break_bonus: 150,
            pass_penalty: 500,
        }
    }
}

impl EvalWeights {
    /// Value of holding `pattern` locked.
    #[must_use]
    pub fn pattern_value(&self, pattern: &Pattern) -> i32 {
        self.kind_value(pattern.kind, pattern.size())
    }

    /// Value of a locked pattern of `kind` covering `size` cells.
    #[must_use]
    pub fn kind_value(&self, kind: PatternKind, size: usize) -> i32 {
        match kind {
            PatternKind::Line => {
                let bonus = if size >= 5 { self.long_line_bonus } else { 0 };
                size as i32 * self.line_per_stone + bonus
            }
            PatternKind::Cross => self.cross,
            PatternKind::Gate => self.gate,
            PatternKind::Bend => self.bend,
            PatternKind::Hook => self.hook,
            PatternKind::Pod => self.pod,
        }
    }

    /// Value of a completed victory set.
    #[must_use]
    pub fn set_value(&self, set: VictorySet) -> i32 {
        self.set_slot * set.requirements().len() as i32
    }
}

// === Positions ===

/// Score `state` for `player` with the default weights.
#[must_use]
pub fn evaluate(state: &GameState, player: Player) -> i32 {
    evaluate_with(&EvalWeights::default(), state, player)
}

#[must_use]
pub fn evaluate_with(weights: &EvalWeights, state: &GameState, player: Player) -> i32 {
    if let Some(outcome) = state.outcome() {
        return match outcome.winner {
            Some(winner) if winner == player => weights.terminal,
            Some(_) => -weights.terminal,
            None => 0,
        };
    }
    side_score(weights, state, player) - side_score(weights, state, player.opponent())
}

fn side_score(w: &EvalWeights, state: &GameState, player: Player) -> i32 {
    let board = state.board();
    let locked: Vec<Pattern> = state.locked_patterns_of(player).copied().collect();

    let mut score = state.stones_in_play(player) as i32 * w.material;
    score += board.count(player) as i32 * w.presence;
    score += locked.iter().map(|p| w.pattern_value(p)).sum::<i32>();

    for set in VictorySet::ALL {
        let slots = set.requirements().len();
        let filled = victory::set_progress(set, &locked);
        score += w.set_value(set) * filled as i32 / slots as i32;
        if filled + 1 == slots {
            score += w.near_win;
        }
    }

    score += patterns::detect(board, player, true).len() as i32 * w.potential;

    let own = board.occupied_by(player);
    score += own.iter().filter(|p| p.is_center()).count() as i32 * w.center;
    score += adjacent_pairs(own) as i32 * w.connectivity;
    score += state.river(player).len() as i32 * w.river;
    score
}

/// Orthogonally adjacent pairs inside `cells`, each pair counted once.
#[must_use]
pub fn adjacent_pairs(cells: PositionSet) -> usize {
    cells
        .iter()
        .map(|pos| {
            [pos.offset(1, 0), pos.offset(0, 1)]
                .into_iter()
                .flatten()
                .filter(|n| cells.contains(*n))
                .count()
        })
        .sum()
}

// === Moves ===

/// Score a single candidate for `player` with the default weights.
#[must_use]
pub fn evaluate_move(action: &Action, state: &GameState, player: Player) -> i32 {
    evaluate_move_with(&EvalWeights::default(), action, state, player)
}

#[must_use]
pub fn evaluate_move_with(
    w: &EvalWeights,
    action: &Action,
    state: &GameState,
    player: Player,
) -> i32 {
    let board = state.board();
    match *action {
        Action::Drop(pos) => placement_score(w, board, player, PositionSet::EMPTY, pos),

        Action::Shift { from, to } => {
            let mut score = placement_score(w, board, player, PositionSet::single(from), to);
            let own = board.free_stones(player);
            let broken = patterns::patterns_through(own, player, from).len() as i32;
            score -= broken * w.pattern_creation / 2;

            let preview = capture::preview_shift(board, player, from, to);
            let opponent = player.opponent();
            let threatened = board.free_stones(opponent);
            for &pos in &preview.captured {
                score += w.capture;
                let disrupted = patterns::patterns_through(threatened, opponent, pos).len() as i32;
                score += disrupted * w.pattern_creation;
                if board.get(pos).is_some_and(|s| s.locked) {
                    score += w.capture;
                }
            }
            score -= preview.self_surrounded.len() as i32 * w.capture;
            score
        }

        Action::Lock { pattern, positions } => {
            let Some(kind) = pattern.kind() else {
                return 0;
            };
            let candidate = Pattern::new(kind, positions, player);
            let locked: Vec<Pattern> = state.locked_patterns_of(player).copied().collect();
            if candidate.is_instant_win() {
                w.terminal / 2
            } else if victory::completes_set(&locked, &candidate).is_some() {
                w.terminal / 4
            } else {
                w.lock_bonus + w.pattern_value(&candidate) + progress_gain(w, &locked, &candidate)
            }
        }

        Action::DrawFromRiver => {
            let river = state.river(player).len() as i32;
            let starved = if state.hand(player) == 0 { 2 * w.river_draw } else { 0 };
            river * w.river_draw + starved
        }

        Action::BreakLock { sacrifice, target } => {
            let gained = state
                .board()
                .get(target)
                .and_then(|s| s.pattern)
                .and_then(|id| state.locked_pattern(id))
                .map_or(0, |p| w.pattern_value(p));
            let lost: i32 = sacrificed_patterns(state, sacrifice)
                .iter()
                .map(|p| w.pattern_value(p))
                .sum();
            w.break_bonus + gained - lost
        }

        Action::Pass => -w.pass_penalty,
    }
}

/// Set-progress value added by locking `candidate` next to `locked`.
#[must_use]
pub fn progress_gain(w: &EvalWeights, locked: &[Pattern], candidate: &Pattern) -> i32 {
    let mut with = locked.to_vec();
    with.push(*candidate);
    VictorySet::ALL
        .into_iter()
        .filter(|set| set.uses(candidate.kind))
        .map(|set| {
            let slots = set.requirements().len() as i32;
            let before = victory::set_progress(set, locked) as i32;
            let gained = victory::set_progress(set, &with) as i32 - before;
            w.set_value(set) * gained / slots
        })
        .sum()
}

/// Own locked patterns that a break sacrificing these cells would dissolve.
#[must_use]
pub fn sacrificed_patterns(state: &GameState, sacrifice: [Position; 2]) -> Vec<Pattern> {
    let mut out: Vec<Pattern> = Vec::new();
    for pos in sacrifice {
        let pattern = state
            .board()
            .get(pos)
            .and_then(|s| s.pattern)
            .and_then(|id| state.locked_pattern(id));
        if let Some(pattern) = pattern {
            if !out.iter().any(|p| p.id == pattern.id) {
                out.push(*pattern);
            }
        }
    }
    out
}

fn placement_score(
    w: &EvalWeights,
    board: &Board,
    player: Player,
    vacated: PositionSet,
    pos: Position,
) -> i32 {
    let mut score = (4 - i32::from(pos.center_distance())).max(0) * w.move_center;

    let own = (board.free_stones(player) - vacated) | PositionSet::single(pos);
    score += patterns::patterns_through(own, player, pos).len() as i32 * w.pattern_creation;

    let friends = board.occupied_by(player) - vacated;
    let adjacent = pos.neighbors().iter().filter(|n| friends.contains(**n)).count() as i32;
    score += adjacent * w.connectivity;

    // Taking a cell the opponent would build through.
    let opponent = player.opponent();
    let theirs = board.free_stones(opponent) | PositionSet::single(pos);
    let denied = patterns::patterns_through(theirs, opponent, pos).len() as i32;
    score += denied * w.pattern_creation / 2;
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, GameMode, SetupBuilder};

    fn p(s: &str) -> Position {
        s.parse().unwrap()
    }

    #[test]
    fn test_fresh_game_is_even() {
        let state = GameState::new(&GameConfig::default(), GameMode::HumanVsHuman, Player::Light);
        assert_eq!(evaluate(&state, Player::Light), 0);
        assert_eq!(evaluate(&state, Player::Dark), 0);
    }

    #[test]
    fn test_symmetric() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["c3", "c4"])
            .stones(Player::Dark, &["a1"])
            .build();
        assert_eq!(evaluate(&state, Player::Light), -evaluate(&state, Player::Dark));
        assert!(evaluate(&state, Player::Light) > 0);
    }

    #[test]
    fn test_pattern_values() {
        let w = EvalWeights::default();
        assert_eq!(w.kind_value(PatternKind::Line, 3), 360);
        assert_eq!(w.kind_value(PatternKind::Line, 5), 5600);
        assert_eq!(w.kind_value(PatternKind::Cross, 5), 10_000);
        assert_eq!(w.kind_value(PatternKind::Pod, 4), 80);
    }

    #[test]
    fn test_locked_line_scores() {
        let free = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "b1", "c1"])
            .build();
        let locked = SetupBuilder::new(&GameConfig::default())
            .locked(Player::Light, PatternKind::Line, &["a1", "b1", "c1"])
            .build();
        assert!(evaluate(&locked, Player::Light) > evaluate(&free, Player::Light));
    }

    #[test]
    fn test_adjacent_pairs() {
        let cells: PositionSet = [p("a1"), p("b1"), p("a2"), p("b2")].into_iter().collect();
        assert_eq!(adjacent_pairs(cells), 4);
        assert_eq!(adjacent_pairs(PositionSet::single(p("c3"))), 0);
    }

    #[test]
    fn test_move_scores_order_sensibly() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["c3"])
            .stones(Player::Dark, &["c4"])
            .build();

        let shift = Action::Shift { from: p("c3"), to: p("c4") };
        let strike = evaluate_move(&shift, &state, Player::Light);
        let corner = evaluate_move(&Action::Drop(p("f6")), &state, Player::Light);
        let pass = evaluate_move(&Action::Pass, &state, Player::Light);

        assert!(strike > corner);
        assert!(corner > pass);
        assert!(evaluate_move(&Action::Drop(p("d3")), &state, Player::Light) > corner);
    }

    #[test]
    fn test_winning_lock_dominates() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "b1", "c1", "d1", "e1"])
            .build();
        let line = patterns::detect(state.board(), Player::Light, true)[0];
        assert_eq!(line.size(), 5);

        let lock = evaluate_move(&Action::lock(line.id), &state, Player::Light);
        assert_eq!(lock, EvalWeights::default().terminal / 2);
    }

    #[test]
    fn test_terminal_scores() {
        let engine = crate::rules::RulesEngine::default();
        let state = SetupBuilder::new(engine.config())
            .stones(Player::Light, &["a1", "b1", "c1", "d1", "e1"])
            .build();
        let line = patterns::detect(state.board(), Player::Light, true)[0];
        let done = engine.apply(&state, Player::Light, &Action::lock(line.id)).unwrap().state;

        assert_eq!(evaluate(&done, Player::Light), 100_000);
        assert_eq!(evaluate(&done, Player::Dark), -100_000);
    }
}
