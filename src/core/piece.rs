//! Pieces and where they stand.
//!
//! ## Position Encoding
//!
//! A piece is in exactly one of four places, modelled as `PiecePosition`:
//!
//! - `AtHome`: in the color's yard, waiting for a 6
//! - `OnTrack(cell)`: on the shared 52-cell outer loop, `cell` in `0..=51`
//! - `OnHomeStretch(k)`: on the color's private lane, `k` in `0..=3`
//! - `Finished`: on the finish cell
//!
//! Presentation layers that still speak the integer encoding can use
//! [`PiecePosition::encoded`]: track cells map to `0..=51`, the home stretch
//! to `100..=103` and the finish cell to `104`.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Pieces each color owns.
pub const PIECES_PER_COLOR: usize = 4;

/// Encoded index of the first home-stretch cell.
pub const HOME_STRETCH_BASE: u16 = 100;

/// Encoded index of the finish cell.
pub const FINISH_CELL: u16 = 104;

/// Piece identifier within a color (0-3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Create a new piece ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over the four piece IDs of a color.
    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..PIECES_PER_COLOR as u8).map(PieceId)
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Piece {}", self.0)
    }
}

/// Where a piece currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PiecePosition {
    AtHome,
    OnTrack(u8),
    OnHomeStretch(u8),
    Finished,
}

impl PiecePosition {
    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, PiecePosition::AtHome)
    }

    #[must_use]
    pub const fn is_finished(self) -> bool {
        matches!(self, PiecePosition::Finished)
    }

    /// The outer-loop cell, if the piece is on the shared track.
    #[must_use]
    pub const fn track_cell(self) -> Option<u8> {
        match self {
            PiecePosition::OnTrack(cell) => Some(cell),
            _ => None,
        }
    }

    /// Integer encoding used by presentation layers. `None` for home pieces.
    #[must_use]
    pub const fn encoded(self) -> Option<u16> {
        match self {
            PiecePosition::AtHome => None,
            PiecePosition::OnTrack(cell) => Some(cell as u16),
            PiecePosition::OnHomeStretch(k) => Some(HOME_STRETCH_BASE + k as u16),
            PiecePosition::Finished => Some(FINISH_CELL),
        }
    }

    /// Inverse of [`encoded`](Self::encoded). Returns `None` for values outside
    /// `0..=51` and `100..=104`.
    #[must_use]
    pub const fn from_encoded(value: Option<u16>) -> Option<Self> {
        match value {
            None => Some(PiecePosition::AtHome),
            Some(v) if v <= 51 => Some(PiecePosition::OnTrack(v as u8)),
            Some(v) if v >= HOME_STRETCH_BASE && v < FINISH_CELL => {
                Some(PiecePosition::OnHomeStretch((v - HOME_STRETCH_BASE) as u8))
            }
            Some(FINISH_CELL) => Some(PiecePosition::Finished),
            Some(_) => None,
        }
    }
}

/// A single piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub color: Color,
    pub position: PiecePosition,
}

impl Piece {
    /// Create a piece waiting at home.
    #[must_use]
    pub const fn new(id: PieceId, color: Color) -> Self {
        Self {
            id,
            color,
            position: PiecePosition::AtHome,
        }
    }

    /// The four starting pieces of a color.
    #[must_use]
    pub fn starting_set(color: Color) -> [Piece; PIECES_PER_COLOR] {
        [
            Piece::new(PieceId(0), color),
            Piece::new(PieceId(1), color),
            Piece::new(PieceId(2), color),
            Piece::new(PieceId(3), color),
        ]
    }

    #[must_use]
    pub const fn is_home(&self) -> bool {
        self.position.is_home()
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.position.is_finished()
    }

    /// Send a captured piece back to its yard.
    pub fn send_home(&mut self) {
        self.position = PiecePosition::AtHome;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_ids() {
        let ids: Vec<_> = PieceId::all().collect();
        assert_eq!(ids, vec![PieceId(0), PieceId(1), PieceId(2), PieceId(3)]);
        assert_eq!(format!("{}", PieceId(2)), "Piece 2");
    }

    #[test]
    fn test_encoding_ranges() {
        assert_eq!(PiecePosition::AtHome.encoded(), None);
        assert_eq!(PiecePosition::OnTrack(51).encoded(), Some(51));
        assert_eq!(PiecePosition::OnHomeStretch(0).encoded(), Some(100));
        assert_eq!(PiecePosition::OnHomeStretch(3).encoded(), Some(103));
        assert_eq!(PiecePosition::Finished.encoded(), Some(104));
    }

    #[test]
    fn test_from_encoded_rejects_gaps() {
        assert_eq!(PiecePosition::from_encoded(Some(52)), None);
        assert_eq!(PiecePosition::from_encoded(Some(99)), None);
        assert_eq!(PiecePosition::from_encoded(Some(105)), None);
        assert_eq!(PiecePosition::from_encoded(Some(104)), Some(PiecePosition::Finished));
        assert_eq!(PiecePosition::from_encoded(None), Some(PiecePosition::AtHome));
    }

    #[test]
    fn test_exactly_one_state() {
        let positions = [
            PiecePosition::AtHome,
            PiecePosition::OnTrack(7),
            PiecePosition::OnHomeStretch(2),
            PiecePosition::Finished,
        ];
        for pos in positions {
            let on_board = !pos.is_home() && !pos.is_finished();
            let states = [pos.is_home(), pos.is_finished(), on_board];
            assert_eq!(states.iter().filter(|s| **s).count(), 1);
        }
    }

    #[test]
    fn test_starting_set_is_home() {
        let set = Piece::starting_set(Color::Green);
        assert!(set.iter().all(|p| p.is_home() && p.color == Color::Green));
        assert_eq!(set[3].id, PieceId(3));
    }

    #[test]
    fn test_send_home() {
        let mut piece = Piece::new(PieceId(1), Color::Red);
        piece.position = PiecePosition::OnTrack(12);
        piece.send_home();
        assert!(piece.is_home());
    }
}
