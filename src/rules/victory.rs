//! Victory checking.
//!
//! ## Order
//!
//! 1. Elimination: a player whose hand plus board is at or below the
//!    threshold loses. River stones do not count.
//! 2. Instant wins: a locked line of five or more, or a locked cross.
//! 3. Victory sets in `VictorySet::ALL` order, first match wins.
//!
//! Within each step the player who just moved is looked at first, except
//! for elimination, where the mover's opponent is checked first: a move that
//! captures the opponent down to the threshold wins even if it also
//! self-surrounded the mover's own last stones.
//!
//! ## Sets
//!
//! A set is satisfied when its slots can be filled by distinct locked
//! patterns of the owner whose footprints are pairwise disjoint. The search
//! is a small backtracking assignment over the owner's locked patterns.

use crate::core::{
    GameConfig, GameOutcome, GameState, Pattern, PatternKind, Player, PositionSet, VictoryKind,
    VictorySet,
};

/// The outcome of `state` right after `mover` acted, if the game is over.
#[must_use]
pub fn check(config: &GameConfig, state: &GameState, mover: Player) -> Option<GameOutcome> {
    let threshold = usize::from(config.elimination_threshold);
    for loser in [mover.opponent(), mover] {
        if state.stones_in_play(loser) <= threshold {
            return Some(GameOutcome::win(loser.opponent(), VictoryKind::Elimination));
        }
    }

    for player in [mover, mover.opponent()] {
        let owned: Vec<Pattern> = state.locked_patterns_of(player).copied().collect();
        if let Some(kind) = instant_win(&owned) {
            return Some(GameOutcome::win(player, kind));
        }
    }

    for player in [mover, mover.opponent()] {
        let owned: Vec<Pattern> = state.locked_patterns_of(player).copied().collect();
        if let Some(set) = find_victory_set(&owned) {
            return Some(GameOutcome::win(player, VictoryKind::Set(set)));
        }
    }

    None
}

/// Instant-win kind among `patterns`, if any.
#[must_use]
pub fn instant_win(patterns: &[Pattern]) -> Option<VictoryKind> {
    patterns.iter().find(|p| p.is_instant_win()).map(|p| match p.kind {
        PatternKind::Cross => VictoryKind::Cross,
        _ => VictoryKind::LongLine,
    })
}

/// First victory set (in check order) satisfied by `patterns`.
#[must_use]
pub fn find_victory_set(patterns: &[Pattern]) -> Option<VictorySet> {
    VictorySet::ALL.into_iter().find(|&set| satisfies(set, patterns))
}

/// Whether `patterns` can fill every slot of `set` disjointly.
#[must_use]
pub fn satisfies(set: VictorySet, patterns: &[Pattern]) -> bool {
    set_progress(set, patterns) == set.requirements().len()
}

/// Most slots of `set` that a disjoint choice from `patterns` can fill.
#[must_use]
pub fn set_progress(set: VictorySet, patterns: &[Pattern]) -> usize {
    let slots = set.requirements();
    let mut used = vec![false; patterns.len()];
    best_fill(slots, patterns, &mut used, PositionSet::EMPTY)
}

fn best_fill(
    slots: &[PatternKind],
    patterns: &[Pattern],
    used: &mut [bool],
    covered: PositionSet,
) -> usize {
    let Some((&kind, rest)) = slots.split_first() else {
        return 0;
    };

    // Leaving this slot empty.
    let mut best = best_fill(rest, patterns, used, covered);

    for (i, pattern) in patterns.iter().enumerate() {
        if used[i] || pattern.kind != kind || !pattern.positions.is_disjoint(covered) {
            continue;
        }
        used[i] = true;
        let filled = 1 + best_fill(rest, patterns, used, covered | pattern.positions);
        used[i] = false;

        best = best.max(filled);
        if best == slots.len() {
            break;
        }
    }
    best
}

/// The set, if any, that locking `candidate` on top of `patterns` would
/// complete.
///
/// Only sets that `patterns` alone do not already satisfy are reported, and
/// the candidate must fit disjointly with them.
#[must_use]
pub fn completes_set(patterns: &[Pattern], candidate: &Pattern) -> Option<VictorySet> {
    let mut with: Vec<Pattern> = patterns.to_vec();
    with.push(*candidate);
    VictorySet::ALL
        .into_iter()
        .find(|&set| set.uses(candidate.kind) && !satisfies(set, patterns) && satisfies(set, &with))
}

/// Sets one slot short of completion.
#[must_use]
pub fn near_complete_sets(patterns: &[Pattern]) -> Vec<VictorySet> {
    VictorySet::ALL
        .into_iter()
        .filter(|&set| set_progress(set, patterns) + 1 == set.requirements().len())
        .collect()
}
