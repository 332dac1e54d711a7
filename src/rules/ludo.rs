//! Ludo rules.
//!
//! - A 6 is required to leave home; entering is allowed even when the color's
//!   own piece already stands on its start cell.
//! - A piece may only move if it lands on or before the finish cell.
//! - Landing on a non-safe outer-loop cell holding exactly one opposing piece
//!   sends that piece home.
//! - A 6, a capture or a finish keeps the turn; otherwise it passes to the
//!   next color with an active hand.
//! - Four finished pieces win the match.

use tracing::{debug, info};

use super::engine::{GameResult, MoveList, RulesEngine};
use crate::core::{
    Capture, Color, GameState, GameStatus, LudoConfig, MoveRecord, Piece, PieceId,
    PiecePosition, TurnError,
};
use crate::track::{self, ENTRY_ROLL};

/// The standard rule set, parameterised by `LudoConfig` (safe cells).
#[derive(Clone, Debug, Default)]
pub struct LudoRules {
    config: LudoConfig,
}

impl LudoRules {
    #[must_use]
    pub fn new(config: LudoConfig) -> Self {
        Self { config }
    }

    /// Where a piece would land with the committed die.
    #[must_use]
    pub fn target(&self, state: &GameState, color: Color, piece: PieceId) -> Option<PiecePosition> {
        let dice = state.dice_value?;
        let piece = state.piece(color, piece)?;
        track::advance(color, piece.position, dice)
    }

    /// The opposing piece a mover of `color` would capture by landing on
    /// `target`, if any.
    #[must_use]
    pub fn capture_victim(
        &self,
        state: &GameState,
        color: Color,
        target: PiecePosition,
    ) -> Option<Piece> {
        let cell = target.track_cell()?;
        if self.config.is_safe(cell) {
            return None;
        }
        let mut opposing = state
            .occupants(cell)
            .into_iter()
            .filter(|p| p.color != color);
        match (opposing.next(), opposing.next()) {
            (Some(victim), None) => Some(victim),
            _ => None,
        }
    }

    /// Validate that `color` may act now and return the committed die.
    fn check_turn(&self, state: &GameState, color: Color) -> Result<u8, TurnError> {
        match state.status {
            GameStatus::Finished => return Err(TurnError::GameOver),
            GameStatus::Waiting => return Err(TurnError::NoGame),
            GameStatus::Playing => {}
        }
        if state.current_turn != color {
            return Err(TurnError::NotYourTurn {
                current: state.current_turn,
            });
        }
        state.dice_value.ok_or(TurnError::NotRolled)
    }
}

impl RulesEngine for LudoRules {
    fn config(&self) -> &LudoConfig {
        &self.config
    }

    fn legal_moves(&self, state: &GameState, color: Color) -> MoveList {
        if state.is_rolling {
            return MoveList::new();
        }
        let Ok(dice) = self.check_turn(state, color) else {
            return MoveList::new();
        };
        state
            .pieces_of(color)
            .map(|set| {
                set.iter()
                    .filter(|p| track::advance(color, p.position, dice).is_some())
                    .map(|p| p.id)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn apply_move(
        &self,
        state: &mut GameState,
        color: Color,
        piece: PieceId,
    ) -> Result<MoveRecord, TurnError> {
        let dice = self.check_turn(state, color)?;
        let from = state
            .piece(color, piece)
            .map(|p| p.position)
            .ok_or(TurnError::InvalidMove)?;
        let to = track::advance(color, from, dice).ok_or(TurnError::InvalidMove)?;

        // Validated; mutate from here on
        let captured = self.capture_victim(state, color, to).map(|victim| {
            state.set_position(victim.color, victim.id, PiecePosition::AtHome);
            Capture {
                color: victim.color,
                piece: victim.id,
                cell: to.track_cell().unwrap_or_default(),
            }
        });
        state.set_position(color, piece, to);

        let finished = to.is_finished();
        let kept_turn = dice == ENTRY_ROLL || captured.is_some() || finished;
        let record = MoveRecord {
            color,
            piece,
            dice,
            from,
            to,
            captured,
            finished,
            kept_turn,
            turn_number: state.turn_number,
        };
        state.record_move(record.clone());

        if let Some(c) = captured {
            info!("{} captured {} {} on cell {}", color, c.color, c.piece, c.cell);
        }
        debug!("{} moved {} {:?} -> {:?} with {}", color, piece, from, to, dice);

        if state.all_finished(color) {
            state.winner = Some(color);
            state.status = GameStatus::Finished;
            state.retain_turn();
            info!("{} wins on turn {}", color, state.turn_number);
        } else if kept_turn {
            state.retain_turn();
        } else {
            state.advance_turn();
            debug!("Turn passes to {}", state.current_turn);
        }

        Ok(record)
    }

    fn resolve_stalled_roll(&self, state: &mut GameState) -> bool {
        let color = state.current_turn;
        let Ok(dice) = self.check_turn(state, color) else {
            return false;
        };
        if !self.legal_moves(state, color).is_empty() {
            return false;
        }
        if dice == ENTRY_ROLL {
            debug!("{} rolled {} with no legal move; keeps the turn", color, dice);
            state.retain_turn();
        } else {
            debug!("{} rolled {} with no legal move; turn passes", color, dice);
            state.advance_turn();
        }
        true
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        state.winner.map(|winner| GameResult {
            winner,
            turns: state.turn_number,
        })
    }
}
