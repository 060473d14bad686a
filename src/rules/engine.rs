//! The rules engine: the one place a game state changes.
//!
//! `apply` validates an action, then performs it on a clone of the state:
//!
//! 1. Validate; a rejection leaves the caller's state untouched.
//! 2. Perform the action (strikes and break sacrifices move stones to
//!    their owner's river; a removed locked stone dissolves its pattern).
//! 3. After a shift, capture every newly surrounded stone.
//! 4. Record the action with its realized captures.
//! 5. Clear the mover's lock cooldown; it lasts exactly one of their turns.
//! 6. Check for victory. A finished game does not advance the turn.
//! 7. Otherwise hand the turn over. If the next player has no legal action
//!    at all, the game ends in a stalemate.
//!
//! The engine holds nothing but its configuration, so it is cheap to share
//! and `apply` is deterministic: equal inputs give equal results.

use smallvec::SmallVec;
use tracing::{debug, info, trace};

use crate::core::{
    Action, ActionRecord, GameConfig, GameMode, GameOutcome, GameState, MoveError, Pattern,
    PatternId, Player, Position, PositionSet,
};

use super::{capture, patterns, validator, victory};

/// Everything that happened when an action was applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveResult {
    /// The state after the action.
    pub state: GameState,
    /// The history entry appended for this action.
    pub record: ActionRecord,
    /// Cell of the opponent stone struck by a shift.
    pub strike: Option<Position>,
    /// Opponent stones captured by surrounding.
    pub captured: SmallVec<[Position; 4]>,
    /// The mover's own stones lost to surrounding.
    pub self_surrounded: SmallVec<[Position; 2]>,
    /// Pattern locked by this action.
    pub locked: Option<Pattern>,
    /// Opponent pattern unlocked by a break.
    pub broken: Option<Pattern>,
    /// Set when this action ended the game.
    pub outcome: Option<GameOutcome>,
}

impl MoveResult {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    #[must_use]
    pub fn is_elimination(&self) -> bool {
        self.outcome.is_some_and(|o| o.is_elimination())
    }

    #[must_use]
    pub fn winner(&self) -> Option<Player> {
        self.outcome.and_then(|o| o.winner)
    }
}

/// Authoritative state transitions for one rule configuration.
#[derive(Clone, Debug, Default)]
pub struct RulesEngine {
    config: GameConfig,
}

impl RulesEngine {
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// A fresh game: empty board, full hands.
    #[must_use]
    pub fn new_game(&self, mode: GameMode, starting_player: Player) -> GameState {
        GameState::new(&self.config, mode, starting_player)
    }

    /// Check an action without applying it.
    pub fn validate(
        &self,
        state: &GameState,
        player: Player,
        action: &Action,
    ) -> Result<(), MoveError> {
        validator::validate(&self.config, state, player, action)
    }

    /// Legal actions for the player to move.
    #[must_use]
    pub fn legal_actions(&self, state: &GameState) -> Vec<Action> {
        validator::legal_actions(&self.config, state, state.current_player())
    }

    /// Patterns `player` could lock if it were their turn.
    #[must_use]
    pub fn lockable_patterns(&self, player: Player, state: &GameState) -> Vec<Pattern> {
        let cooldown = state.lock_cooldown(player);
        patterns::detect(state.board(), player, true)
            .into_iter()
            .filter(|p| p.positions.is_disjoint(cooldown))
            .collect()
    }

    #[must_use]
    pub fn outcome(&self, state: &GameState) -> Option<GameOutcome> {
        state.outcome()
    }

    #[must_use]
    pub fn conservation_total(&self, state: &GameState) -> usize {
        state.conservation_total()
    }

    /// Apply `action` by `player`.
    ///
    /// On success the returned result owns the new state; `state` itself is
    /// never modified.
    pub fn apply(
        &self,
        state: &GameState,
        player: Player,
        action: &Action,
    ) -> Result<MoveResult, MoveError> {
        if let Err(err) = self.validate(state, player, action) {
            debug!(%player, %action, error = %err, "action rejected");
            return Err(err);
        }

        let mut next = state.clone();
        let mut record = ActionRecord::new(player, *action, state.turn_number());
        let mut strike = None;
        let mut captured = SmallVec::new();
        let mut self_surrounded = SmallVec::new();
        let mut locked = None;
        let mut broken = None;

        match *action {
            Action::Drop(pos) => {
                next.hands[player] -= 1;
                let stone = next.alloc_stone(player);
                next.board.place(pos, stone);
            }

            Action::Shift { from, to } => {
                if let Some(struck) = next.board.get(to) {
                    assert!(
                        struck.owner != player && !struck.locked,
                        "strike on protected stone at {to}"
                    );
                    lift_to_river(&mut next, to);
                    strike = Some(to);
                    record.captured.push(to);
                }

                let Some(stone) = next.board.remove(from) else {
                    unreachable!("validated shift from empty cell {from}");
                };
                next.board.place(to, stone);

                let surrounded = capture::resolve_captures(player, &state.board, &next.board);
                for &pos in surrounded.captured.iter().chain(surrounded.self_surrounded.iter()) {
                    lift_to_river(&mut next, pos);
                }
                record.captured.extend(surrounded.captured.iter().copied());
                record.self_surrounded.extend(surrounded.self_surrounded.iter().copied());
                captured = surrounded.captured;
                self_surrounded = surrounded.self_surrounded;
            }

            Action::Lock { pattern, .. } => {
                let Some(found) = patterns::find_unlocked(&next.board, player, pattern) else {
                    unreachable!("validated lock of undetected pattern {pattern}");
                };
                for pos in found.positions.iter() {
                    if let Some(stone) = next.board.get_mut(pos) {
                        stone.lock(found.id);
                    }
                }
                next.locked_patterns.push(found);
                locked = Some(found);
            }

            Action::DrawFromRiver => {
                let stones = std::mem::take(&mut next.rivers[player]);
                let drawn = u8::try_from(stones.len()).unwrap_or(u8::MAX);
                next.hands[player] = next.hands[player].saturating_add(drawn);
            }

            Action::BreakLock { sacrifice, target } => {
                next.break_used[player] = true;
                for pos in sacrifice {
                    lift_to_river(&mut next, pos);
                }

                let target_id = next.board.get(target).and_then(|s| s.pattern);
                assert!(target_id.is_some(), "break target {target} is not locked");
                broken = target_id.and_then(|id| dissolve(&mut next, id));
                if let Some(pattern) = broken {
                    next.lock_cooldown[player.opponent()] = pattern.positions;
                }
            }

            Action::Pass => {
                next.passes_used[player] += 1;
            }
        }

        next.lock_cooldown[player] = PositionSet::EMPTY;
        next.history.push_back(record.clone());

        trace!(
            %player,
            %action,
            turn = state.turn_number(),
            removed = record.removed_count(),
            "action applied"
        );

        let outcome = victory::check(&self.config, &next, player).or_else(|| {
            next.current_player = player.opponent();
            next.turn_number += 1;
            (!validator::has_legal_action(&self.config, &next, next.current_player))
                .then(GameOutcome::stalemate)
        });

        if let Some(outcome) = outcome {
            next.outcome = Some(outcome);
            info!(
                winner = ?outcome.winner,
                victory = ?outcome.victory,
                turn = next.turn_number,
                "game over"
            );
        }

        Ok(MoveResult {
            state: next,
            record,
            strike,
            captured,
            self_surrounded,
            locked,
            broken,
            outcome,
        })
    }
}

/// Take the stone at `pos` off the board and into its owner's river,
/// dissolving any pattern it was locked into.
fn lift_to_river(state: &mut GameState, pos: Position) {
    let Some(stone) = state.board.remove(pos) else {
        return;
    };
    if let Some(id) = stone.pattern {
        dissolve(state, id);
    }
    state.rivers[stone.owner].push(stone.released());
}

/// Remove a locked pattern and unlock whatever is left of it.
fn dissolve(state: &mut GameState, id: PatternId) -> Option<Pattern> {
    let index = state.locked_patterns.iter().position(|p| p.id == id)?;
    let pattern = state.locked_patterns.remove(index);
    for pos in pattern.positions.iter() {
        if let Some(stone) = state.board.get_mut(pos) {
            if stone.pattern == Some(id) {
                stone.unlock();
            }
        }
    }
    Some(pattern)
}
