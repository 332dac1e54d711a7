//! Game engine: roll and move operations on behalf of a calling color.
//!
//! The engine is stateless apart from its rules. Callers hand it the
//! `GameState` to act on, which keeps every operation a plain transaction
//! over a record the sync layer can publish as a whole.

use tracing::debug;

use crate::core::{Color, DiceSource, GamePhase, GameState, MoveRecord, PieceId, TurnError};
use crate::rules::{GameResult, LudoRules, MoveList, RulesEngine};

/// What a roll produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RollOutcome {
    pub color: Color,
    pub value: u8,
    /// No piece could move, so the turn was resolved without a move.
    pub stalled: bool,
    /// The color still holds the turn after this roll.
    pub holds_turn: bool,
}

/// Turn/dice/move state machine.
#[derive(Clone, Debug, Default)]
pub struct GameEngine<R: RulesEngine = LudoRules> {
    rules: R,
}

impl<R: RulesEngine> GameEngine<R> {
    pub fn new(rules: R) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self, state: &GameState) -> GamePhase {
        state.phase()
    }

    /// Why `caller` may not roll right now, if anything.
    pub fn check_roll(&self, state: &GameState, caller: Color) -> Result<(), TurnError> {
        if state.is_over() {
            return Err(TurnError::GameOver);
        }
        if state.phase() == GamePhase::Waiting {
            return Err(TurnError::NoGame);
        }
        if state.current_turn != caller {
            return Err(TurnError::NotYourTurn {
                current: state.current_turn,
            });
        }
        if state.dice_value.is_some() || state.is_rolling {
            return Err(TurnError::AlreadyRolled);
        }
        Ok(())
    }

    /// True iff the match is on, `caller` holds the turn and no die is
    /// committed or rolling.
    #[must_use]
    pub fn can_roll(&self, state: &GameState, caller: Color) -> bool {
        self.check_roll(state, caller).is_ok()
    }

    /// Roll for `caller` and, if nothing can move, resolve the turn.
    ///
    /// The rolling flag, the die value and any stalled-turn resolution are
    /// applied in one call, so no observer sees a die without its resolution.
    pub fn roll_dice(
        &self,
        state: &mut GameState,
        caller: Color,
        dice: &mut dyn DiceSource,
    ) -> Result<RollOutcome, TurnError> {
        self.check_roll(state, caller)?;

        state.is_rolling = true;
        let value = dice.roll();
        state.dice_value = Some(value);
        state.is_rolling = false;
        debug!("{} rolled {}", caller, value);

        let stalled = self.rules.resolve_stalled_roll(state);
        Ok(RollOutcome {
            color: caller,
            value,
            stalled,
            holds_turn: state.current_turn == caller,
        })
    }

    /// Pieces of the color holding the turn that may move with the committed
    /// die.
    #[must_use]
    pub fn valid_moves(&self, state: &GameState) -> MoveList {
        self.rules.legal_moves(state, state.current_turn)
    }

    /// True iff `caller` holds the turn and `piece` is among the valid moves.
    #[must_use]
    pub fn can_move_piece(&self, state: &GameState, caller: Color, piece: PieceId) -> bool {
        state.current_turn == caller && self.rules.is_legal(state, caller, piece)
    }

    /// Move a piece for `caller` and resolve the turn.
    pub fn move_piece(
        &self,
        state: &mut GameState,
        caller: Color,
        piece: PieceId,
    ) -> Result<MoveRecord, TurnError> {
        if !state.is_over()
            && state.current_turn == caller
            && !self.can_move_piece(state, caller, piece)
        {
            return Err(match state.dice_value {
                None => TurnError::NotRolled,
                Some(_) => TurnError::InvalidMove,
            });
        }
        self.rules.apply_move(state, caller, piece)
    }

    /// The match result, once there is one.
    #[must_use]
    pub fn result(&self, state: &GameState) -> Option<GameResult> {
        self.rules.is_terminal(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameStatus, Player, PlayerId, PiecePosition, ScriptedDice};

    fn game(colors: &[Color]) -> GameState {
        GameState::new(
            colors
                .iter()
                .enumerate()
                .map(|(i, &c)| Player::human(PlayerId::new(i as u64), format!("P{i}"), c)),
        )
    }

    #[test]
    fn test_can_roll_conditions() {
        let engine = GameEngine::<LudoRules>::default();
        let mut state = game(&[Color::Red, Color::Blue]);
        assert!(engine.can_roll(&state, Color::Red));
        assert!(!engine.can_roll(&state, Color::Blue));

        state.is_rolling = true;
        assert!(!engine.can_roll(&state, Color::Red));
        state.is_rolling = false;

        state.dice_value = Some(6);
        assert_eq!(engine.check_roll(&state, Color::Red), Err(TurnError::AlreadyRolled));

        state.status = GameStatus::Finished;
        assert_eq!(engine.check_roll(&state, Color::Red), Err(TurnError::GameOver));
    }

    #[test]
    fn test_roll_six_awaits_move() {
        let engine = GameEngine::<LudoRules>::default();
        let mut state = game(&[Color::Red, Color::Blue]);
        let mut dice = ScriptedDice::new(vec![6]);
        let outcome = engine.roll_dice(&mut state, Color::Red, &mut dice).unwrap();
        assert_eq!(outcome.value, 6);
        assert!(!outcome.stalled);
        assert!(outcome.holds_turn);
        assert_eq!(engine.phase(&state), GamePhase::AwaitingMove);
        assert_eq!(engine.valid_moves(&state).len(), 4);
        assert!(!state.is_rolling);
    }

    #[test]
    fn test_roll_without_moves_passes() {
        let engine = GameEngine::<LudoRules>::default();
        let mut state = game(&[Color::Red, Color::Blue]);
        let mut dice = ScriptedDice::new(vec![3]);
        let outcome = engine.roll_dice(&mut state, Color::Red, &mut dice).unwrap();
        assert!(outcome.stalled);
        assert!(!outcome.holds_turn);
        assert_eq!(state.current_turn, Color::Blue);
        assert_eq!(state.dice_value, None);
        assert_eq!(engine.phase(&state), GamePhase::AwaitingRoll);
    }

    #[test]
    fn test_second_roll_refused() {
        let engine = GameEngine::<LudoRules>::default();
        let mut state = game(&[Color::Red, Color::Blue]);
        let mut dice = ScriptedDice::new(vec![6]);
        engine.roll_dice(&mut state, Color::Red, &mut dice).unwrap();
        assert_eq!(
            engine.roll_dice(&mut state, Color::Red, &mut dice),
            Err(TurnError::AlreadyRolled)
        );
        assert_eq!(dice.consumed(), 1);
    }

    #[test]
    fn test_move_before_roll() {
        let engine = GameEngine::<LudoRules>::default();
        let mut state = game(&[Color::Red, Color::Blue]);
        assert_eq!(
            engine.move_piece(&mut state, Color::Red, PieceId(0)),
            Err(TurnError::NotRolled)
        );
        assert_eq!(
            engine.move_piece(&mut state, Color::Blue, PieceId(0)),
            Err(TurnError::NotYourTurn { current: Color::Red })
        );
    }

    #[test]
    fn test_can_move_piece_requires_turn() {
        let engine = GameEngine::<LudoRules>::default();
        let mut state = game(&[Color::Red, Color::Blue]);
        state.set_position(Color::Red, PieceId(2), PiecePosition::OnTrack(4));
        state.dice_value = Some(2);
        assert!(engine.can_move_piece(&state, Color::Red, PieceId(2)));
        assert!(!engine.can_move_piece(&state, Color::Red, PieceId(0)));
        assert!(!engine.can_move_piece(&state, Color::Blue, PieceId(2)));
    }
}
