//! Track geometry: pure mappings between colors, progress and cells.
//!
//! ## Layout
//!
//! ```text
//! progress  0 ........ 50 | 51  52  53  54 | 55
//! place     outer loop    | home stretch   | finish
//! encoded   start..turn-in| 100 101 102 103| 104
//! ```
//!
//! Each color enters the shared loop on its start cell and walks 50 steps to
//! its turn-in cell (the cell just before its start, wrapping through 51).
//! The next step leaves the loop for the private home stretch.

use crate::core::{Color, PiecePosition};

/// Cells on the shared outer loop.
pub const TRACK_LEN: u8 = 52;

/// Progress of a color's turn-in cell (the last outer-loop cell it visits).
pub const TURN_IN_PROGRESS: u8 = 50;

/// Private home-stretch cells before the finish.
pub const HOME_STRETCH_LEN: u8 = 4;

/// Progress of the finish cell.
pub const FINISH_PROGRESS: u8 = TURN_IN_PROGRESS + HOME_STRETCH_LEN + 1;

/// Start cells plus the four star cells.
pub const DEFAULT_SAFE_CELLS: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

/// Die value needed to leave home.
pub const ENTRY_ROLL: u8 = 6;

/// Outer-loop cell where a color's pieces enter.
#[must_use]
pub const fn start_cell(color: Color) -> u8 {
    match color {
        Color::Red => 0,
        Color::Blue => 13,
        Color::Green => 26,
        Color::Yellow => 39,
    }
}

/// Last outer-loop cell a color visits before turning into its home stretch.
#[must_use]
pub const fn turn_in_cell(color: Color) -> u8 {
    (start_cell(color) + TURN_IN_PROGRESS) % TRACK_LEN
}

/// Steps travelled from the color's start cell. `None` for pieces at home.
///
/// Track cells outside the color's own 51-cell journey cannot be reached by
/// that color; they still map to a progress in `0..=51` by modular distance.
#[must_use]
pub const fn progress(color: Color, position: PiecePosition) -> Option<u8> {
    match position {
        PiecePosition::AtHome => None,
        PiecePosition::OnTrack(cell) => {
            Some((cell + TRACK_LEN - start_cell(color)) % TRACK_LEN)
        }
        PiecePosition::OnHomeStretch(k) => Some(TURN_IN_PROGRESS + 1 + k),
        PiecePosition::Finished => Some(FINISH_PROGRESS),
    }
}

/// Position at a given progress for a color. `None` past the finish.
#[must_use]
pub const fn position_at(color: Color, progress: u8) -> Option<PiecePosition> {
    if progress <= TURN_IN_PROGRESS {
        Some(PiecePosition::OnTrack((start_cell(color) + progress) % TRACK_LEN))
    } else if progress < FINISH_PROGRESS {
        Some(PiecePosition::OnHomeStretch(progress - TURN_IN_PROGRESS - 1))
    } else if progress == FINISH_PROGRESS {
        Some(PiecePosition::Finished)
    } else {
        None
    }
}

/// Where a piece lands after rolling `dice`, or `None` if it cannot move.
///
/// Home pieces need exactly a 6 and land on the start cell. Finished pieces
/// never move. Any target beyond the finish is illegal.
///
/// The stretch is four cells (encoded 100-103) with the finish at 104, so
/// red on cell 50 is five steps from home. See "Home-stretch geometry" in
/// DESIGN.md before changing these distances.
///
/// ```
/// use ludo_core::core::{Color, PiecePosition};
/// use ludo_core::track::advance;
///
/// // Red turns in at cell 50; five steps later it finishes.
/// assert_eq!(
///     advance(Color::Red, PiecePosition::OnTrack(50), 5),
///     Some(PiecePosition::Finished)
/// );
/// assert_eq!(advance(Color::Red, PiecePosition::OnTrack(50), 6), None);
/// ```
#[must_use]
pub const fn advance(color: Color, position: PiecePosition, dice: u8) -> Option<PiecePosition> {
    match position {
        PiecePosition::AtHome => {
            if dice == ENTRY_ROLL {
                Some(PiecePosition::OnTrack(start_cell(color)))
            } else {
                None
            }
        }
        PiecePosition::Finished => None,
        _ => match progress(color, position) {
            Some(p) => position_at(color, p + dice),
            None => None,
        },
    }
}

/// Steps still needed to reach the finish. `None` for home pieces.
#[must_use]
pub const fn steps_to_finish(color: Color, position: PiecePosition) -> Option<u8> {
    match progress(color, position) {
        Some(p) => Some(FINISH_PROGRESS - p),
        None => None,
    }
}

/// Membership test against a safe-cell set.
#[must_use]
pub fn is_safe(cell: u8, safe_cells: &[u8]) -> bool {
    safe_cells.contains(&cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_turn_in_cells() {
        assert_eq!(start_cell(Color::Red), 0);
        assert_eq!(start_cell(Color::Yellow), 39);
        assert_eq!(turn_in_cell(Color::Red), 50);
        assert_eq!(turn_in_cell(Color::Blue), 11);
        assert_eq!(turn_in_cell(Color::Green), 24);
        assert_eq!(turn_in_cell(Color::Yellow), 37);
    }

    #[test]
    fn test_home_needs_six() {
        for dice in 1..=5 {
            assert_eq!(advance(Color::Blue, PiecePosition::AtHome, dice), None);
        }
        assert_eq!(
            advance(Color::Blue, PiecePosition::AtHome, 6),
            Some(PiecePosition::OnTrack(13))
        );
    }

    #[test]
    fn test_wraps_around_loop() {
        // Yellow starts at 39; cell 51 wraps to 0.
        assert_eq!(
            advance(Color::Yellow, PiecePosition::OnTrack(50), 3),
            Some(PiecePosition::OnTrack(1))
        );
    }

    #[test]
    fn test_turns_into_home_stretch() {
        // Blue turns in at 11.
        assert_eq!(
            advance(Color::Blue, PiecePosition::OnTrack(9), 3),
            Some(PiecePosition::OnHomeStretch(0))
        );
        assert_eq!(
            advance(Color::Blue, PiecePosition::OnTrack(11), 4),
            Some(PiecePosition::OnHomeStretch(3))
        );
    }

    #[test]
    fn test_other_colors_pass_turn_in_cells() {
        // Red's turn-in cell 50 is just another cell for blue.
        assert_eq!(
            advance(Color::Blue, PiecePosition::OnTrack(48), 4),
            Some(PiecePosition::OnTrack(0))
        );
    }

    #[test]
    fn test_exact_finish_and_overshoot() {
        let stretch0 = PiecePosition::OnHomeStretch(0);
        assert_eq!(steps_to_finish(Color::Red, stretch0), Some(4));
        assert_eq!(advance(Color::Red, stretch0, 4), Some(PiecePosition::Finished));
        assert_eq!(advance(Color::Red, stretch0, 5), None);
        assert_eq!(advance(Color::Red, PiecePosition::Finished, 1), None);
    }

    #[test]
    fn test_progress_roundtrip() {
        for color in Color::ALL {
            for p in 0..=FINISH_PROGRESS {
                let pos = position_at(color, p).unwrap();
                assert_eq!(progress(color, pos), Some(p));
            }
            assert_eq!(position_at(color, FINISH_PROGRESS + 1), None);
        }
    }

    #[test]
    fn test_never_exceeds_finish() {
        for color in Color::ALL {
            for p in 0..=FINISH_PROGRESS {
                let pos = position_at(color, p).unwrap();
                for dice in 1..=6 {
                    if let Some(target) = advance(color, pos, dice) {
                        let reached = progress(color, target).unwrap();
                        assert!(reached <= FINISH_PROGRESS);
                        assert_eq!(reached, p + dice);
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_safe_cells() {
        for color in Color::ALL {
            assert!(is_safe(start_cell(color), &DEFAULT_SAFE_CELLS));
        }
        assert!(!is_safe(5, &DEFAULT_SAFE_CELLS));
    }
}
