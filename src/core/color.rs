//! Seat colors and their fixed cyclic order.
//!
//! The order red → blue → green → yellow → red drives both the turn
//! rotation and the order in which joining players are seated.

use serde::{Deserialize, Serialize};

/// One of the four Ludo seats.
///
/// `Ord` follows the cyclic order, so the lowest present color is the one
/// that opens a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Green,
    Yellow,
}

impl Color {
    /// All colors in cyclic order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Green, Color::Yellow];

    /// Position in the cyclic order (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Blue => 1,
            Color::Green => 2,
            Color::Yellow => 3,
        }
    }

    /// Color at the given position in the cyclic order.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Color> {
        match index {
            0 => Some(Color::Red),
            1 => Some(Color::Blue),
            2 => Some(Color::Green),
            3 => Some(Color::Yellow),
            _ => None,
        }
    }

    /// The color after this one, wrapping yellow back to red.
    #[must_use]
    pub const fn next(self) -> Color {
        match self {
            Color::Red => Color::Blue,
            Color::Blue => Color::Green,
            Color::Green => Color::Yellow,
            Color::Yellow => Color::Red,
        }
    }

    /// The other three colors followed by this one, in turn order.
    ///
    /// ```
    /// use ludo_core::core::Color;
    ///
    /// let order: Vec<_> = Color::Green.cycle_after().collect();
    /// assert_eq!(order, vec![Color::Yellow, Color::Red, Color::Blue, Color::Green]);
    /// ```
    pub fn cycle_after(self) -> impl Iterator<Item = Color> {
        (1..=4).map(move |step| Color::ALL[(self.index() + step) % 4])
    }

    /// Lowercase name, as used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Yellow => "yellow",
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
