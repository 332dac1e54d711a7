//! Rules engine trait.
//!
//! Implementations define:
//! - What moves are legal for the color holding the turn
//! - How a move modifies state (captures, finishing, turn resolution)
//! - How a roll with no legal move resolves
//! - When the match is over

use smallvec::SmallVec;

use crate::core::{Color, GameState, LudoConfig, MoveRecord, PieceId, TurnError};

/// Movable pieces for one roll (at most four).
pub type MoveList = SmallVec<[PieceId; 4]>;

/// Result of a completed match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameResult {
    pub winner: Color,
    /// Turn number when the match ended.
    pub turns: u32,
}

impl GameResult {
    /// Check if a color won.
    #[must_use]
    pub fn is_winner(&self, color: Color) -> bool {
        self.winner == color
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: empty unless `color` holds the turn with a committed die
/// - `apply_move`: must validate fully before mutating, so a refused move
///   leaves the state untouched
/// - `resolve_stalled_roll`: called right after a roll; resolves the turn
///   when no piece can move
/// - `is_terminal`: `None` while the match continues
pub trait RulesEngine {
    /// Get the configuration.
    fn config(&self) -> &LudoConfig;

    /// Pieces of `color` that may move with the committed die.
    fn legal_moves(&self, state: &GameState, color: Color) -> MoveList;

    /// Move a piece and resolve the turn.
    fn apply_move(
        &self,
        state: &mut GameState,
        color: Color,
        piece: PieceId,
    ) -> Result<MoveRecord, TurnError>;

    /// Resolve the turn when the committed die allows no move.
    ///
    /// Returns `true` if the turn was resolved.
    fn resolve_stalled_roll(&self, state: &mut GameState) -> bool;

    /// Check if the match is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Is this particular move legal?
    fn is_legal(&self, state: &GameState, color: Color, piece: PieceId) -> bool {
        self.legal_moves(state, color).contains(&piece)
    }
}
