//! Opaque state snapshots.
//!
//! A snapshot is a four-byte magic, a little-endian `u16` format version,
//! then the bincode encoding of the `GameState`. Callers should treat the
//! bytes as opaque; only `deserialize` from the same crate version is
//! guaranteed to read them.
//!
//! Decoded states are checked before they are returned: board shape,
//! cell ranges, the lock invariant and stone conservation. A payload that
//! decodes but fails those checks is `SnapshotError::Corrupt`.

use thiserror::Error;

use crate::core::{Action, ActionRecord, GameState, PatternId, Player, CELL_COUNT};

const MAGIC: &[u8; 4] = b"RVST";
const VERSION: u16 = 1;
const HEADER_SIZE: usize = MAGIC.len() + 2;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("not a riverstone snapshot")]
    BadMagic,

    #[error("unsupported snapshot version {found} (expected {})", VERSION)]
    UnsupportedVersion { found: u16 },

    #[error("failed to encode state: {0}")]
    Encode(bincode::Error),

    #[error("failed to decode state: {0}")]
    Decode(#[from] bincode::Error),

    #[error("corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Encode `state` as a snapshot.
pub fn serialize(state: &GameState) -> Result<Vec<u8>, SnapshotError> {
    let payload = bincode::serialize(state).map_err(SnapshotError::Encode)?;
    let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a snapshot produced by [`serialize`].
pub fn deserialize(bytes: &[u8]) -> Result<GameState, SnapshotError> {
    if bytes.len() < HEADER_SIZE || &bytes[..MAGIC.len()] != MAGIC {
        return Err(SnapshotError::BadMagic);
    }
    let found = u16::from_le_bytes([bytes[4], bytes[5]]);
    if found != VERSION {
        return Err(SnapshotError::UnsupportedVersion { found });
    }
    let state: GameState = bincode::deserialize(&bytes[HEADER_SIZE..])?;
    check_consistency(&state)?;
    Ok(state)
}

fn corrupt(reason: impl Into<String>) -> SnapshotError {
    SnapshotError::Corrupt(reason.into())
}

fn action_on_board(action: &Action) -> bool {
    match *action {
        Action::Drop(pos) => pos.is_on_board(),
        Action::Shift { from, to } => from.is_on_board() && to.is_on_board(),
        Action::Lock { pattern, positions } => {
            positions.is_on_board() && pattern.kind().is_some() && pattern.positions() == positions
        }
        Action::BreakLock { sacrifice, target } => {
            target.is_on_board() && sacrifice.iter().all(|p| p.is_on_board())
        }
        Action::DrawFromRiver | Action::Pass => true,
    }
}

/// Reject states no sequence of moves could have produced in a way that
/// would make later indexing panic.
fn check_consistency(state: &GameState) -> Result<(), SnapshotError> {
    let board = state.board();
    if board.cell_count() != CELL_COUNT {
        return Err(corrupt(format!("board has {} cells", board.cell_count())));
    }

    for player in Player::BOTH {
        if !state.lock_cooldown(player).is_on_board() {
            return Err(corrupt(format!("{player} cooldown reaches off the board")));
        }
        if let Some(stone) = state.river(player).iter().find(|s| s.owner != player) {
            return Err(corrupt(format!("{player} river holds a {} stone", stone.owner)));
        }
    }

    for pattern in state.locked_patterns() {
        let canonical = PatternId::new(pattern.kind, pattern.positions);
        if !pattern.positions.is_on_board() || pattern.id != canonical {
            return Err(corrupt(format!("malformed locked pattern {}", pattern.id)));
        }
        for pos in pattern.positions.iter() {
            let whole = board.get(pos).is_some_and(|s| {
                s.owner == pattern.owner && s.locked && s.pattern == Some(pattern.id)
            });
            if !whole {
                return Err(corrupt(format!("locked pattern {} is missing {pos}", pattern.id)));
            }
        }
    }

    for (pos, stone) in board.stones() {
        let named = match stone.pattern {
            Some(id) => state.locked_pattern(id).is_some_and(|p| p.positions.contains(pos)),
            None => true,
        };
        if stone.locked != stone.pattern.is_some() || !named {
            return Err(corrupt(format!("stone at {pos} has a dangling lock")));
        }
    }

    let record_on_board = |r: &ActionRecord| {
        action_on_board(&r.action)
            && r.captured.iter().chain(&r.self_surrounded).all(|p| p.is_on_board())
    };
    if let Some(record) = state.history().iter().find(|r| !record_on_board(r)) {
        return Err(corrupt(format!("history entry for turn {} leaves the board", record.turn)));
    }

    // Each player's stones move between hand, board and river, never across.
    let light = state.total_stones(Player::Light);
    let dark = state.total_stones(Player::Dark);
    if light != dark {
        return Err(corrupt(format!("stone counts differ: Light {light}, Dark {dark}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, GameMode, PatternKind, Player, SetupBuilder};
    use crate::rules::RulesEngine;

    #[test]
    fn test_roundtrip_mid_game() {
        let engine = RulesEngine::default();
        let state = SetupBuilder::new(engine.config())
            .locked(Player::Light, PatternKind::Gate, &["a1", "b1", "a2", "b2"])
            .stones(Player::Dark, &["c3", "d3"])
            .river(Player::Dark, 2)
            .mode(GameMode::HumanVsAi { ai: Player::Dark })
            .build();
        let state = engine
            .apply(&state, Player::Light, &Action::Drop("f6".parse().unwrap()))
            .unwrap()
            .state;

        let bytes = serialize(&state).unwrap();
        assert_eq!(&bytes[..4], b"RVST");
        let restored = deserialize(&bytes).unwrap();
        assert_eq!(restored, state);
        assert_eq!(restored.history().len(), 1);
    }

    #[test]
    fn test_bad_magic() {
        assert!(matches!(deserialize(b"nope"), Err(SnapshotError::BadMagic)));
        assert!(matches!(deserialize(b"XXXX\x01\x00rest"), Err(SnapshotError::BadMagic)));
    }

    #[test]
    fn test_unsupported_version() {
        let state = RulesEngine::default().new_game(GameMode::default(), Player::Light);
        let mut bytes = serialize(&state).unwrap();
        bytes[4] = 9;
        assert!(matches!(
            deserialize(&bytes),
            Err(SnapshotError::UnsupportedVersion { found: 9 })
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let state = RulesEngine::default().new_game(GameMode::default(), Player::Light);
        let bytes = serialize(&state).unwrap();
        let err = deserialize(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, SnapshotError::Decode(_)));
        assert!(err.to_string().starts_with("failed to decode state"));
    }

    /// Re-encode `state` after editing its JSON form, skipping every check.
    fn tampered(state: &GameState, edit: impl FnOnce(&mut serde_json::Value)) -> Vec<u8> {
        let mut value = serde_json::to_value(state).unwrap();
        edit(&mut value);
        let bad: GameState = serde_json::from_value(value).unwrap();
        serialize(&bad).unwrap()
    }

    fn assert_corrupt(bytes: &[u8]) {
        let err = deserialize(bytes).unwrap_err();
        assert!(matches!(err, SnapshotError::Corrupt(_)), "{err}");
    }

    #[test]
    fn test_short_board_rejected() {
        let state = RulesEngine::default().new_game(GameMode::default(), Player::Light);
        let bytes = tampered(&state, |v| {
            v["board"]["cells"].as_array_mut().unwrap().pop();
        });
        assert_corrupt(&bytes);
    }

    #[test]
    fn test_off_board_cooldown_rejected() {
        let state = RulesEngine::default().new_game(GameMode::default(), Player::Light);
        let bytes = tampered(&state, |v| {
            v["lock_cooldown"]["data"][0] = serde_json::json!(1u64 << 40);
        });
        assert_corrupt(&bytes);
    }

    #[test]
    fn test_off_board_history_rejected() {
        let engine = RulesEngine::default();
        let state = engine.new_game(GameMode::default(), Player::Light);
        let state = engine
            .apply(&state, Player::Light, &Action::Drop("c3".parse().unwrap()))
            .unwrap()
            .state;
        let bytes = tampered(&state, |v| {
            v["history"][0]["action"]["Drop"]["col"] = serde_json::json!(9);
        });
        assert_corrupt(&bytes);
    }

    #[test]
    fn test_broken_conservation_rejected() {
        let state = RulesEngine::default().new_game(GameMode::default(), Player::Light);
        let bytes = tampered(&state, |v| v["hands"]["data"][0] = serde_json::json!(11));
        assert_corrupt(&bytes);
    }

    #[test]
    fn test_dangling_lock_rejected() {
        let engine = RulesEngine::default();
        let state = SetupBuilder::new(engine.config())
            .locked(Player::Light, PatternKind::Gate, &["a1", "b1", "a2", "b2"])
            .build();
        assert!(deserialize(&serialize(&state).unwrap()).is_ok());

        let bytes = tampered(&state, |v| {
            v["locked_patterns"].as_array_mut().unwrap().clear();
        });
        assert_corrupt(&bytes);
    }
}
