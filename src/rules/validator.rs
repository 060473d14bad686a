//! Move validation and legal-action enumeration.
//!
//! `validate` is the single gate every action passes through before the
//! engine touches a state. `legal_actions` enumerates exactly the actions
//! `validate` accepts, with two deliberate narrowings:
//!
//! - Break combinations are sampled up to `GameConfig::break_sample_limit`.
//!   Targets inside the same opponent pattern have the same effect, so the
//!   sample takes one target per pattern and varies the sacrifice pair.
//! - `Pass` is only offered when nothing else is legal.
//!
//! Enumeration order is fixed (drops, shifts, locks, river, breaks, pass,
//! each in board order), so two calls on equal states return equal lists.

use smallvec::SmallVec;

use crate::core::{
    Action, Board, GameConfig, GameState, MoveError, PatternId, Player, Position, PositionSet,
};

use super::patterns;

/// Check `action` by `player` against `state`.
pub fn validate(
    config: &GameConfig,
    state: &GameState,
    player: Player,
    action: &Action,
) -> Result<(), MoveError> {
    if state.is_game_over() {
        return Err(MoveError::GameOver);
    }
    if player != state.current_player() {
        return Err(MoveError::NotYourTurn {
            current: state.current_player(),
            attempted: player,
        });
    }

    match *action {
        Action::Drop(pos) => validate_drop(state, player, pos),
        Action::Shift { from, to } => validate_shift(state.board(), player, from, to),
        Action::Lock { pattern, positions } => {
            validate_lock(state, player, pattern, positions)
        }
        Action::DrawFromRiver => {
            if state.river(player).is_empty() {
                Err(MoveError::EmptyRiver)
            } else {
                Ok(())
            }
        }
        Action::BreakLock { sacrifice, target } => {
            validate_break(state, player, sacrifice, target)
        }
        Action::Pass => {
            if state.passes_used(player) >= config.max_passes {
                Err(MoveError::NoPassesLeft)
            } else {
                Ok(())
            }
        }
    }
}

fn on_board(pos: Position) -> Result<(), MoveError> {
    if pos.is_on_board() {
        Ok(())
    } else {
        Err(MoveError::OffBoard(pos))
    }
}

fn validate_drop(state: &GameState, player: Player, pos: Position) -> Result<(), MoveError> {
    on_board(pos)?;
    if !state.board().is_empty(pos) {
        return Err(MoveError::Occupied(pos));
    }
    if state.hand(player) == 0 {
        return Err(MoveError::EmptyHand);
    }
    Ok(())
}

fn validate_shift(
    board: &Board,
    player: Player,
    from: Position,
    to: Position,
) -> Result<(), MoveError> {
    on_board(from)?;
    on_board(to)?;

    match board.get(from) {
        Some(stone) if stone.owner == player => {
            if stone.locked {
                return Err(MoveError::StoneLocked(from));
            }
        }
        _ => return Err(MoveError::NotYourStone(from)),
    }

    let dc = i32::from(to.col()) - i32::from(from.col());
    let dr = i32::from(to.row()) - i32::from(from.row());
    if (dc != 0 && dr != 0) || (dc == 0 && dr == 0) {
        return Err(MoveError::NotOrthogonal { from, to });
    }
    let distance = dc.abs() + dr.abs();
    if distance > 2 {
        return Err(MoveError::TooFar { from, to });
    }
    if distance == 2 {
        if let Some(mid) = from.offset(dc.signum(), dr.signum()) {
            if !board.is_empty(mid) {
                return Err(MoveError::PathBlocked(mid));
            }
        }
    }

    match board.get(to) {
        None => Ok(()),
        Some(target) if target.owner != player && !target.locked => Ok(()),
        Some(_) => Err(MoveError::InvalidTarget(to)),
    }
}

fn validate_lock(
    state: &GameState,
    player: Player,
    pattern: PatternId,
    positions: PositionSet,
) -> Result<(), MoveError> {
    if positions.len() < 3 {
        return Err(MoveError::TooFewPositions(positions.len()));
    }

    let cooldown = state.lock_cooldown(player);
    if let Some(pos) = (positions & cooldown).first() {
        return Err(MoveError::CoolingDown(pos));
    }

    for pos in positions.iter() {
        match state.board().get(pos) {
            Some(stone) if stone.owner == player => {
                if stone.locked {
                    return Err(MoveError::StoneLocked(pos));
                }
            }
            _ => return Err(MoveError::NotYourStone(pos)),
        }
    }

    if positions != pattern.positions()
        || patterns::find_unlocked(state.board(), player, pattern).is_none()
    {
        return Err(MoveError::NotAPattern(pattern));
    }
    Ok(())
}

fn validate_break(
    state: &GameState,
    player: Player,
    sacrifice: [Position; 2],
    target: Position,
) -> Result<(), MoveError> {
    if state.break_used(player) {
        return Err(MoveError::BreakAlreadyUsed);
    }

    let own_locked = state.board().locked_stones(player);
    let [a, b] = sacrifice;
    let usable = |pos: Position| pos.is_on_board() && own_locked.contains(pos);
    if a == b || !usable(a) || !usable(b) {
        return Err(MoveError::InvalidSacrifice);
    }

    if !target.is_on_board() || !state.board().locked_stones(player.opponent()).contains(target) {
        return Err(MoveError::InvalidBreakTarget(target));
    }
    Ok(())
}

// === Enumeration ===

/// Every action `player` may take, in a fixed order.
///
/// Empty when the game is over, when it is not `player`'s turn, or when
/// the player is completely stuck with no passes left.
#[must_use]
pub fn legal_actions(config: &GameConfig, state: &GameState, player: Player) -> Vec<Action> {
    if state.is_game_over() || player != state.current_player() {
        return Vec::new();
    }

    let board = state.board();
    let mut actions = Vec::new();

    if state.hand(player) > 0 {
        actions.extend(board.empty_cells().iter().map(Action::Drop));
    }

    for from in board.free_stones(player).iter() {
        let shifts = shift_destinations(board, player, from).map(|to| Action::Shift { from, to });
        actions.extend(shifts);
    }

    actions.extend(lock_actions(state, player));

    if !state.river(player).is_empty() {
        actions.push(Action::DrawFromRiver);
    }

    if !state.break_used(player) {
        actions.extend(break_actions(config, state, player));
    }

    if actions.is_empty() && state.passes_used(player) < config.max_passes {
        actions.push(Action::Pass);
    }
    actions
}

/// Whether `player` has any legal action, `Pass` included.
///
/// Agrees with `!legal_actions(..).is_empty()` but stops at the first hit,
/// cheapest checks first.
#[must_use]
pub fn has_legal_action(config: &GameConfig, state: &GameState, player: Player) -> bool {
    if state.is_game_over() || player != state.current_player() {
        return false;
    }

    let board = state.board();
    (state.hand(player) > 0 && !board.empty_cells().is_empty())
        || state.passes_used(player) < config.max_passes
        || !state.river(player).is_empty()
        || board
            .free_stones(player)
            .iter()
            .any(|from| shift_destinations(board, player, from).next().is_some())
        || (!state.break_used(player)
            && board.locked_stones(player).len() >= 2
            && !board.locked_stones(player.opponent()).is_empty())
        || !lock_actions(state, player).is_empty()
}

/// Cells the stone at `from` may shift to.
pub fn shift_destinations(
    board: &Board,
    player: Player,
    from: Position,
) -> impl Iterator<Item = Position> + '_ {
    const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

    DIRECTIONS.into_iter().flat_map(move |(dc, dr)| {
        let mut out: SmallVec<[Position; 2]> = SmallVec::new();
        for step in 1..=2 {
            let Some(to) = from.offset(dc * step, dr * step) else {
                break;
            };
            match board.get(to) {
                None => out.push(to),
                Some(stone) => {
                    if stone.owner != player && !stone.locked {
                        out.push(to);
                    }
                    // Anything on the cell blocks the second step.
                    break;
                }
            }
        }
        out
    })
}

/// One lock per detected unlocked pattern clear of the cooldown.
#[must_use]
pub fn lock_actions(state: &GameState, player: Player) -> Vec<Action> {
    let cooldown = state.lock_cooldown(player);
    patterns::detect(state.board(), player, true)
        .into_iter()
        .filter(|p| p.positions.is_disjoint(cooldown))
        .map(|p| Action::lock(p.id))
        .collect()
}

fn break_actions(config: &GameConfig, state: &GameState, player: Player) -> Vec<Action> {
    let own: Vec<Position> = state.board().locked_stones(player).iter().collect();
    if own.len() < 2 {
        return Vec::new();
    }

    let targets: Vec<Position> = match config.break_sample_limit {
        Some(_) => state
            .locked_patterns_of(player.opponent())
            .filter_map(|p| p.positions.first())
            .collect(),
        None => state.board().locked_stones(player.opponent()).iter().collect(),
    };
    if targets.is_empty() {
        return Vec::new();
    }

    let limit = config.break_sample_limit.unwrap_or(usize::MAX);
    let mut actions = Vec::new();
    'pairs: for (i, &a) in own.iter().enumerate() {
        for &b in &own[i + 1..] {
            for &target in &targets {
                if actions.len() >= limit {
                    break 'pairs;
                }
                actions.push(Action::BreakLock {
                    sacrifice: [a, b],
                    target,
                });
            }
        }
    }
    actions
}
