//! Game controller.
//!
//! A thin façade for front ends. It owns the engine, the current state, the
//! AI players for the sides the mode gives to the computer, and the board
//! selection a pointer interface needs. Every change is reported to the
//! registered listeners as `GameEvent`s, in the order they happened:
//!
//! 1. `MoveExecuted`
//! 2. `CaptureOccurred` (if stones were removed)
//! 3. `PatternLocked` / `PatternBroken` (if any)
//! 4. `GameEnded` or `TurnChanged`
//!
//! A rejected submission produces a single `MoveRejected`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ai::{AiPlayer, Difficulty, Personality};
use crate::core::{
    Action, ActionRecord, GameMode, GameOutcome, GameState, MoveError, Pattern, Player, PlayerMap,
    Position,
};
use crate::rules::{MoveResult, RulesEngine};

/// Something that happened in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// An action was applied.
    MoveExecuted { record: ActionRecord },
    /// Stones left the board. `by` made the move; `captured` belonged to the
    /// opponent, `self_surrounded` to the mover.
    CaptureOccurred {
        by: Player,
        captured: Vec<Position>,
        self_surrounded: Vec<Position>,
    },
    PatternLocked { pattern: Pattern },
    /// An opponent pattern was unlocked by a break.
    PatternBroken { pattern: Pattern },
    TurnChanged { player: Player, turn: u32 },
    GameEnded { outcome: GameOutcome },
    /// A submission failed validation. The state is unchanged.
    MoveRejected { action: Action, reason: String },
}

/// Receives game events.
pub trait GameListener: Send {
    fn on_event(&mut self, event: &GameEvent);
}

impl<F> GameListener for F
where
    F: FnMut(&GameEvent) + Send,
{
    fn on_event(&mut self, event: &GameEvent) {
        self(event);
    }
}

/// What a board tap did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TapOutcome {
    /// One of the mover's free stones is now selected.
    Selected(Position),
    /// The selection was cleared.
    Deselected,
    /// The tap became an action and was submitted.
    Submitted(Result<MoveResult, MoveError>),
    /// Nothing to do for that cell.
    Ignored,
}

/// Drives one game for a front end.
pub struct GameController {
    engine: RulesEngine,
    state: GameState,
    ai: PlayerMap<Option<AiPlayer>>,
    selection: Option<Position>,
    listeners: Vec<Box<dyn GameListener>>,
}

impl GameController {
    /// A fresh game. AI sides stay idle until an AI is attached.
    #[must_use]
    pub fn new(engine: RulesEngine, mode: GameMode, starting_player: Player) -> Self {
        let state = engine.new_game(mode, starting_player);
        Self::from_state(engine, state)
    }

    /// Resume from an existing state, e.g. a restored snapshot.
    #[must_use]
    pub fn from_state(engine: RulesEngine, state: GameState) -> Self {
        Self {
            engine,
            state,
            ai: PlayerMap::new(|_| None),
            selection: None,
            listeners: Vec::new(),
        }
    }

    /// Attach an AI to `player`.
    #[must_use]
    pub fn with_ai(mut self, player: Player, ai: AiPlayer) -> Self {
        *self.ai.get_mut(player) = Some(ai);
        self
    }

    /// Attach a difficulty-tier AI to every side the mode gives the computer.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty, seed: u64) -> Self {
        for player in Player::BOTH {
            if self.state.mode().is_ai(player) {
                let seed = seed.wrapping_add(player.index() as u64);
                let ai = AiPlayer::from_difficulty(difficulty, seed);
                *self.ai.get_mut(player) = Some(ai);
            }
        }
        self
    }

    /// Attach a personality AI to every side the mode gives the computer.
    #[must_use]
    pub fn with_personality(mut self, personality: &Personality, seed: u64) -> Self {
        for player in Player::BOTH {
            if self.state.mode().is_ai(player) {
                let seed = seed.wrapping_add(player.index() as u64);
                let ai = AiPlayer::from_personality(personality.clone(), seed);
                *self.ai.get_mut(player) = Some(ai);
            }
        }
        self
    }

    pub fn add_listener(&mut self, listener: impl GameListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    #[must_use]
    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.state.mode()
    }

    #[must_use]
    pub fn selection(&self) -> Option<Position> {
        self.selection
    }

    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        self.engine.legal_actions(&self.state)
    }

    #[must_use]
    pub fn ai(&self, player: Player) -> Option<&AiPlayer> {
        self.ai.get(player).as_ref()
    }

    /// Whether the side to move is computer-controlled and has an AI.
    #[must_use]
    pub fn is_ai_turn(&self) -> bool {
        let player = self.state.current_player();
        !self.state.is_game_over()
            && self.state.mode().is_ai(player)
            && self.ai.get(player).is_some()
    }

    /// Start over with the same engine, mode and AIs.
    pub fn restart(&mut self, starting_player: Player) {
        self.state = self.engine.new_game(self.state.mode(), starting_player);
        self.selection = None;
        for player in Player::BOTH {
            if let Some(ai) = self.ai.get_mut(player) {
                ai.reset();
            }
        }
        self.emit(&GameEvent::TurnChanged {
            player: starting_player,
            turn: self.state.turn_number(),
        });
    }

    // === Selection ===

    /// Select a stone to shift. Only the mover's free stones can be selected.
    pub fn select(&mut self, pos: Position) -> bool {
        let player = self.state.current_player();
        let selectable = !self.state.is_game_over()
            && self.state.board().get(pos).is_some_and(|s| s.is_free_for(player));
        if selectable {
            self.selection = Some(pos);
        }
        selectable
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Interpret a tap on `pos`.
    ///
    /// With nothing selected, an empty cell drops a stone and a free stone
    /// of the mover becomes the selection. With a stone selected, tapping it
    /// again deselects, tapping another free stone of the mover reselects,
    /// and any other cell is submitted as a shift.
    pub fn tap(&mut self, pos: Position) -> TapOutcome {
        if self.state.is_game_over() {
            return TapOutcome::Ignored;
        }

        match self.selection {
            Some(from) if from == pos => {
                self.clear_selection();
                TapOutcome::Deselected
            }
            Some(from) => {
                if self.select(pos) {
                    return TapOutcome::Selected(pos);
                }
                TapOutcome::Submitted(self.submit(Action::Shift { from, to: pos }))
            }
            None if self.state.board().is_empty(pos) => {
                TapOutcome::Submitted(self.submit(Action::Drop(pos)))
            }
            None => {
                if self.select(pos) {
                    TapOutcome::Selected(pos)
                } else {
                    TapOutcome::Ignored
                }
            }
        }
    }

    // === Moves ===

    /// Apply `action` for the player to move.
    pub fn submit(&mut self, action: Action) -> Result<MoveResult, MoveError> {
        let player = self.state.current_player();
        let result = match self.engine.apply(&self.state, player, &action) {
            Ok(result) => result,
            Err(err) => {
                self.emit(&GameEvent::MoveRejected {
                    action,
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        self.state = result.state.clone();
        self.selection = None;
        for event in Self::events_for(&result) {
            self.emit(&event);
        }
        Ok(result)
    }

    /// Let the AI move for the side to move, if it is an AI side.
    ///
    /// Returns `None` when it is not the AI's turn. An AI with nothing but a
    /// pass available passes.
    pub fn play_ai_turn(&mut self) -> Option<Result<MoveResult, MoveError>> {
        if !self.is_ai_turn() {
            return None;
        }

        let player = self.state.current_player();
        let action = self
            .ai
            .get_mut(player)
            .as_mut()
            .and_then(|ai| ai.select(&self.engine, &self.state))
            .unwrap_or(Action::Pass);
        debug!(%player, %action, "ai turn");
        Some(self.submit(action))
    }

    /// Play AI turns until a human is to move or the game ends. Returns the
    /// number of moves made, at most `limit`.
    pub fn run_ai(&mut self, limit: usize) -> usize {
        let mut moves = 0;
        while moves < limit {
            match self.play_ai_turn() {
                Some(Ok(_)) => moves += 1,
                Some(Err(_)) | None => break,
            }
        }
        moves
    }

    fn events_for(result: &MoveResult) -> Vec<GameEvent> {
        let record = &result.record;
        let mut events = vec![GameEvent::MoveExecuted { record: record.clone() }];

        if record.removed_count() > 0 {
            events.push(GameEvent::CaptureOccurred {
                by: record.player,
                captured: record.captured.to_vec(),
                self_surrounded: record.self_surrounded.to_vec(),
            });
        }
        if let Some(pattern) = result.locked {
            events.push(GameEvent::PatternLocked { pattern });
        }
        if let Some(pattern) = result.broken {
            events.push(GameEvent::PatternBroken { pattern });
        }

        events.push(match result.outcome {
            Some(outcome) => GameEvent::GameEnded { outcome },
            None => GameEvent::TurnChanged {
                player: result.state.current_player(),
                turn: result.state.turn_number(),
            },
        });
        events
    }

    fn emit(&mut self, event: &GameEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }
}

impl std::fmt::Debug for GameController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameController")
            .field("state", &self.state)
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::core::SetupBuilder;

    fn p(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn hot_seat() -> GameController {
        GameController::new(RulesEngine::default(), GameMode::HumanVsHuman, Player::Light)
    }

    fn recording(controller: &mut GameController) -> Arc<Mutex<Vec<GameEvent>>> {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        controller.add_listener(move |event: &GameEvent| sink.lock().unwrap().push(event.clone()));
        events
    }

    #[test]
    fn test_tap_drops_on_empty_cell() {
        let mut controller = hot_seat();
        let events = recording(&mut controller);

        let outcome = controller.tap(p("c3"));
        assert!(matches!(outcome, TapOutcome::Submitted(Ok(_))));
        assert_eq!(controller.state().board().owner(p("c3")), Some(Player::Light));

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GameEvent::MoveExecuted { .. }));
        assert_eq!(events[1], GameEvent::TurnChanged { player: Player::Dark, turn: 2 });
    }

    #[test]
    fn test_tap_select_then_shift() {
        let state = SetupBuilder::new(&Default::default())
            .stones(Player::Light, &["c3"])
            .stones(Player::Dark, &["c4"])
            .build();
        let mut controller = GameController::from_state(RulesEngine::default(), state);
        let events = recording(&mut controller);

        assert_eq!(controller.tap(p("c3")), TapOutcome::Selected(p("c3")));
        assert_eq!(controller.selection(), Some(p("c3")));

        let outcome = controller.tap(p("c4"));
        let TapOutcome::Submitted(Ok(result)) = outcome else {
            panic!("expected a strike, got {outcome:?}");
        };
        assert_eq!(result.strike, Some(p("c4")));
        assert_eq!(controller.selection(), None);

        let events = events.lock().unwrap();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::CaptureOccurred { by: Player::Light, captured, .. }
                if captured == &vec![p("c4")]
        )));
    }

    #[test]
    fn test_tap_same_stone_deselects() {
        let state = SetupBuilder::new(&Default::default())
            .stones(Player::Light, &["c3"])
            .build();
        let mut controller = GameController::from_state(RulesEngine::default(), state);

        controller.tap(p("c3"));
        assert_eq!(controller.tap(p("c3")), TapOutcome::Deselected);
        assert_eq!(controller.tap(p("c3")), TapOutcome::Selected(p("c3")));
        controller.clear_selection();
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn test_opponent_stone_not_selectable() {
        let state = SetupBuilder::new(&Default::default())
            .stones(Player::Dark, &["c3"])
            .build();
        let mut controller = GameController::from_state(RulesEngine::default(), state);
        assert!(!controller.select(p("c3")));
        assert_eq!(controller.tap(p("c3")), TapOutcome::Ignored);
    }

    #[test]
    fn test_rejection_event() {
        let mut controller = hot_seat();
        let events = recording(&mut controller);

        let err = controller.submit(Action::DrawFromRiver).unwrap_err();
        assert_eq!(err, MoveError::EmptyRiver);
        let events = events.lock().unwrap();
        assert!(matches!(
            &events[..],
            [GameEvent::MoveRejected { action: Action::DrawFromRiver, .. }]
        ));
    }

    #[test]
    fn test_lock_and_game_end_events() {
        let state = SetupBuilder::new(&Default::default())
            .stones(Player::Light, &["a1", "b1", "c1", "d1", "e1"])
            .build();
        let mut controller = GameController::from_state(RulesEngine::default(), state);
        let events = recording(&mut controller);

        let lock = controller
            .legal_actions()
            .into_iter()
            .find(|a| matches!(a, Action::Lock { .. }))
            .unwrap();
        controller.submit(lock).unwrap();

        let events = events.lock().unwrap();
        assert!(matches!(events[1], GameEvent::PatternLocked { .. }));
        assert!(matches!(
            events[2],
            GameEvent::GameEnded { outcome } if outcome.winner == Some(Player::Light)
        ));
        drop(events);
        assert_eq!(controller.tap(p("f6")), TapOutcome::Ignored);
    }

    #[test]
    fn test_ai_turn() {
        let mut controller = GameController::new(
            RulesEngine::default(),
            GameMode::HumanVsAi { ai: Player::Dark },
            Player::Light,
        )
        .with_difficulty(Difficulty::Easy, 5);

        assert!(!controller.is_ai_turn());
        assert!(controller.play_ai_turn().is_none());

        controller.submit(Action::Drop(p("c3"))).unwrap();
        assert!(controller.is_ai_turn());
        let result = controller.play_ai_turn().unwrap().unwrap();
        assert_eq!(result.record.player, Player::Dark);
        assert_eq!(controller.state().current_player(), Player::Light);
    }

    #[test]
    fn test_ai_vs_ai_runs() {
        let engine = RulesEngine::default();
        let mut controller = GameController::new(engine, GameMode::AiVsAi, Player::Light)
            .with_difficulty(Difficulty::Beginner, 9);
        let moves = controller.run_ai(6);
        assert!(moves > 0);
        assert!(controller.ai(Player::Light).is_some());
        assert_eq!(controller.state().history().len(), moves);
    }

    #[test]
    fn test_restart() {
        let mut controller = hot_seat();
        controller.submit(Action::Drop(p("a1"))).unwrap();
        controller.restart(Player::Dark);
        assert_eq!(controller.state().current_player(), Player::Dark);
        assert!(controller.state().history().is_empty());
    }
}
