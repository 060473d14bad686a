//! Strategic lock selection.
//!
//! Among the patterns a player could lock, the choice is:
//!
//! 1. An instant win (cross, line of five or more).
//! 2. A pattern that completes a victory set with the patterns already
//!    locked. The preferred set, if any, is tried first; otherwise sets
//!    are tried in check order.
//! 3. The best heuristic score: pattern value plus the set progress it
//!    adds, plus any preference bonus.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Pattern, PatternKind, Player, VictorySet};
use crate::rules::victory;

use super::evaluator::{progress_gain, EvalWeights};

/// Taste in patterns, from a personality.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockPreference {
    pub kind: Option<PatternKind>,
    pub set: Option<VictorySet>,
    /// Added to the heuristic score of matching candidates.
    pub bonus: i32,
}

impl LockPreference {
    #[must_use]
    pub fn new(kind: Option<PatternKind>, set: Option<VictorySet>, bonus: i32) -> Self {
        Self { kind, set, bonus }
    }
}

/// Pick the pattern to lock from `candidates`.
#[must_use]
pub fn choose_lock(
    weights: &EvalWeights,
    state: &GameState,
    player: Player,
    candidates: &[Pattern],
    preference: &LockPreference,
) -> Option<Pattern> {
    if let Some(win) = candidates.iter().find(|p| p.is_instant_win()) {
        return Some(*win);
    }

    let locked: Vec<Pattern> = state.locked_patterns_of(player).copied().collect();

    let completing: Vec<(VictorySet, Pattern)> = candidates
        .iter()
        .filter_map(|c| victory::completes_set(&locked, c).map(|set| (set, *c)))
        .collect();
    let preferred = preference
        .set
        .and_then(|want| completing.iter().find(|(set, _)| *set == want));
    let first = || completing.iter().min_by_key(|(set, _)| *set);
    if let Some((_, pattern)) = preferred.or_else(first) {
        return Some(*pattern);
    }

    candidates
        .iter()
        .min_by_key(|c| Reverse(lock_score(weights, &locked, c, preference)))
        .copied()
}

/// Heuristic value of locking `candidate` next to `locked`.
#[must_use]
pub fn lock_score(
    weights: &EvalWeights,
    locked: &[Pattern],
    candidate: &Pattern,
    preference: &LockPreference,
) -> i32 {
    let mut score = weights.pattern_value(candidate) + progress_gain(weights, locked, candidate);
    if preference.kind == Some(candidate.kind) {
        score += preference.bonus;
    }
    if preference.set.is_some_and(|set| set.uses(candidate.kind)) {
        score += preference.bonus / 2;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, Position, SetupBuilder};
    use crate::rules::patterns;

    fn pat(kind: PatternKind, cells: &[&str]) -> Pattern {
        let positions = cells.iter().map(|c| c.parse::<Position>().unwrap()).collect();
        Pattern::new(kind, positions, Player::Light)
    }

    fn pick(state: &GameState, candidates: &[Pattern], pref: &LockPreference) -> Option<Pattern> {
        choose_lock(&EvalWeights::default(), state, Player::Light, candidates, pref)
    }

    #[test]
    fn test_instant_win_first() {
        let state = SetupBuilder::new(&GameConfig::default()).build();
        let gate = pat(PatternKind::Gate, &["a1", "b1", "a2", "b2"]);
        let cross = pat(PatternKind::Cross, &["c3", "b3", "d3", "c2", "c4"]);

        let chosen = pick(&state, &[gate, cross], &LockPreference::default());
        assert_eq!(chosen, Some(cross));
    }

    #[test]
    fn test_set_completion_beats_value() {
        let state = SetupBuilder::new(&GameConfig::default())
            .locked(Player::Light, PatternKind::Gate, &["a1", "b1", "a2", "b2"])
            .build();
        let line = pat(PatternKind::Line, &["d5", "e5", "f5"]);
        let hook = pat(PatternKind::Hook, &["d1", "e1", "f1", "f2"]);

        let chosen = pick(&state, &[hook, line], &LockPreference::default());
        assert_eq!(chosen, Some(line));
    }

    #[test]
    fn test_preferred_set_wins_tie() {
        let state = SetupBuilder::new(&GameConfig::default())
            .locked(Player::Light, PatternKind::Gate, &["a1", "b1", "a2", "b2"])
            .build();
        let line = pat(PatternKind::Line, &["d5", "e5", "f5"]);
        let gate = pat(PatternKind::Gate, &["e1", "f1", "e2", "f2"]);
        let pref = LockPreference::new(None, Some(VictorySet::Fortress), 0);

        let chosen = pick(&state, &[line, gate], &pref);
        assert_eq!(chosen, Some(gate));

        let chosen = pick(&state, &[line, gate], &LockPreference::default());
        assert_eq!(chosen, Some(line));
    }

    #[test]
    fn test_heuristic_prefers_bigger_line() {
        let state = SetupBuilder::new(&GameConfig::default())
            .stones(Player::Light, &["a1", "b1", "c1", "d1", "a3", "b3", "c3"])
            .build();
        let candidates: Vec<Pattern> = patterns::detect(state.board(), Player::Light, true)
            .into_iter()
            .filter(|p| p.kind == PatternKind::Line)
            .collect();

        let chosen = pick(&state, &candidates, &LockPreference::default());
        assert_eq!(chosen.map(|p| p.size()), Some(4));
    }

    #[test]
    fn test_preference_bonus() {
        let locked: [Pattern; 0] = [];
        let bend = pat(PatternKind::Bend, &["a1", "b1", "a2"]);
        let weights = EvalWeights::default();
        let plain = lock_score(&weights, &locked, &bend, &LockPreference::default());
        let likes_bends = LockPreference::new(Some(PatternKind::Bend), None, 500);
        let liked = lock_score(&weights, &locked, &bend, &likes_bends);
        assert_eq!(liked - plain, 500);
    }
}
