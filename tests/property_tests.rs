//! Property tests over random playouts.

use proptest::prelude::*;

use riverstone::core::{GameConfig, GameMode, GameRng, GameState, Player, Position, PositionSet};
use riverstone::rules::{capture, RulesEngine};
use riverstone::{snapshot, Action, MoveResult};

/// Play up to `moves` uniformly random legal actions. Returns every
/// `(before, action, result)` step.
fn random_playout(
    engine: &RulesEngine,
    seed: u64,
    moves: usize,
) -> Vec<(GameState, Action, MoveResult)> {
    let mut rng = GameRng::new(seed);
    let first = if seed % 2 == 0 { Player::Light } else { Player::Dark };
    let mut state = engine.new_game(GameMode::HumanVsHuman, first);
    let mut steps = Vec::new();

    for _ in 0..moves {
        if state.is_game_over() {
            break;
        }
        let actions = engine.legal_actions(&state);
        let Some(&action) = rng.pick(&actions) else {
            break;
        };
        let result = engine
            .apply(&state, state.current_player(), &action)
            .expect("enumerated action must apply");
        let next = result.state.clone();
        steps.push((state, action, result));
        state = next;
    }
    steps
}

fn assert_lock_invariant(state: &GameState) {
    let board = state.board();
    for pattern in state.locked_patterns() {
        for pos in pattern.positions.iter() {
            let stone = board
                .get(pos)
                .unwrap_or_else(|| panic!("locked pattern {pattern} lost the stone at {pos}"));
            assert_eq!(stone.owner, pattern.owner);
            assert!(stone.locked);
            assert_eq!(stone.pattern, Some(pattern.id));
        }
    }
    for (pos, stone) in board.stones() {
        match stone.pattern {
            Some(id) => {
                assert!(stone.locked);
                let pattern = state
                    .locked_pattern(id)
                    .unwrap_or_else(|| panic!("stone at {pos} names a pattern that is gone"));
                assert!(pattern.positions.contains(pos));
            }
            None => assert!(!stone.locked, "stone at {pos} locked without a pattern"),
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_conservation(seed in any::<u64>(), moves in 1usize..120) {
        let engine = RulesEngine::default();
        let total = engine.config().total_stones();
        for (before, _, result) in random_playout(&engine, seed, moves) {
            prop_assert_eq!(before.conservation_total(), total);
            prop_assert_eq!(result.state.conservation_total(), total);
        }
    }

    #[test]
    fn prop_apply_is_deterministic(seed in any::<u64>(), moves in 1usize..60) {
        let engine = RulesEngine::default();
        for (before, action, result) in random_playout(&engine, seed, moves) {
            let again = engine.apply(&before, before.current_player(), &action).unwrap();
            prop_assert_eq!(&again, &result);
        }
    }

    #[test]
    fn prop_snapshot_roundtrip(seed in any::<u64>(), moves in 0usize..80) {
        let engine = RulesEngine::default();
        let state = random_playout(&engine, seed, moves)
            .pop()
            .map_or_else(|| engine.new_game(GameMode::AiVsAi, Player::Light), |(_, _, r)| r.state);
        let bytes = snapshot::serialize(&state).unwrap();
        prop_assert_eq!(snapshot::deserialize(&bytes).unwrap(), state);
    }

    #[test]
    fn prop_drop_legality(seed in any::<u64>(), moves in 0usize..60) {
        let engine = RulesEngine::default();
        let Some((_, _, last)) = random_playout(&engine, seed, moves).pop() else {
            return Ok(());
        };
        let state = last.state;
        prop_assume!(!state.is_game_over());

        let player = state.current_player();
        for pos in Position::all() {
            let expected = state.board().is_empty(pos) && state.hand(player) > 0;
            let legal = engine.validate(&state, player, &Action::Drop(pos)).is_ok();
            prop_assert_eq!(legal, expected, "drop {}", pos);
        }
    }

    #[test]
    fn prop_strikes_hit_unlocked_opponents(seed in any::<u64>(), moves in 0usize..80) {
        let engine = RulesEngine::default();
        for (_, _, result) in random_playout(&engine, seed, moves) {
            let state = result.state;
            if state.is_game_over() {
                continue;
            }
            let player = state.current_player();
            for action in engine.legal_actions(&state) {
                if let Action::Shift { to, .. } = action {
                    if let Some(target) = state.board().get(to) {
                        prop_assert_ne!(target.owner, player);
                        prop_assert!(!target.locked);
                    }
                }
            }
        }
    }

    #[test]
    fn prop_only_new_surrounds_are_captured(seed in any::<u64>(), moves in 1usize..120) {
        let engine = RulesEngine::default();
        for (before, _, result) in random_playout(&engine, seed, moves) {
            let already = capture::surrounded_set(before.board());
            let removed: PositionSet = result
                .captured
                .iter()
                .chain(result.self_surrounded.iter())
                .copied()
                .collect();
            prop_assert!(removed.is_disjoint(already));
        }
    }

    #[test]
    fn prop_locked_patterns_stay_whole(seed in any::<u64>(), moves in 1usize..150) {
        let engine = RulesEngine::default();
        for (_, _, result) in random_playout(&engine, seed, moves) {
            assert_lock_invariant(&result.state);
        }
    }

    #[test]
    fn prop_elimination_is_terminal(seed in any::<u64>(), moves in 1usize..150) {
        let engine = RulesEngine::new(GameConfig::default().with_elimination_threshold(9));
        for (_, _, result) in random_playout(&engine, seed, moves) {
            let state = &result.state;
            for player in Player::BOTH {
                if state.stones_in_play(player) <= 9 {
                    prop_assert!(state.is_game_over());
                    let outcome = state.outcome().unwrap();
                    // Whoever fell first decided it; the winner is never a
                    // player at or below the threshold unless both are.
                    if state.stones_in_play(player.opponent()) > 9 {
                        prop_assert_eq!(outcome.winner, Some(player.opponent()));
                    }
                }
            }
        }
    }
}
