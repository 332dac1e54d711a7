//! Move records for history tracking.
//!
//! Every committed move appends one `MoveRecord` to the game's history.
//! Used for:
//! - The presentation layer's move log
//! - Replay/debugging
//! - Asserting turn resolution in tests

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::piece::{PieceId, PiecePosition};

/// A piece sent home by a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    pub color: Color,
    pub piece: PieceId,
    /// Outer-loop cell where the capture happened.
    pub cell: u8,
}

/// A committed move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// The color that moved.
    pub color: Color,

    /// The piece moved.
    pub piece: PieceId,

    /// Die value used.
    pub dice: u8,

    pub from: PiecePosition,
    pub to: PiecePosition,

    /// Opposing piece captured on landing, if any.
    pub captured: Option<Capture>,

    /// The piece reached the finish cell.
    pub finished: bool,

    /// The mover keeps the turn (6, capture or finish).
    pub kept_turn: bool,

    /// Turn number when the move was made.
    pub turn_number: u32,
}

impl MoveRecord {
    /// Did this move leave the yard?
    #[must_use]
    pub fn left_home(&self) -> bool {
        self.from.is_home() && !self.to.is_home()
    }
}
