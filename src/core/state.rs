//! Game state for one match.
//!
//! ## GameState
//!
//! Everything every client needs to render and validate a match:
//! - Seated players and whose turn it is
//! - The committed die value and the presentational rolling flag
//! - Four pieces per color that started the match
//! - Winner, status and move history
//!
//! Uses `im` persistent data structures so snapshots clone in O(1) when they
//! are published or pulled.
//!
//! ## Phases
//!
//! `GameState::phase` derives the engine's state-machine phase from the
//! record: `AwaitingRoll → Rolling → AwaitingMove → AwaitingRoll`, with
//! `Finished` terminal.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::MoveRecord;
use super::color::Color;
use super::piece::{Piece, PieceId, PiecePosition, PIECES_PER_COLOR};
use super::player::Player;

/// Colors in a match (at most four).
pub type ColorSet = SmallVec<[Color; 4]>;

/// Lifecycle of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Waiting,
    Playing,
    Finished,
}

/// Engine state-machine phase, derived from the record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GamePhase {
    Waiting,
    AwaitingRoll,
    Rolling,
    AwaitingMove,
    Finished,
}

/// Complete state of one match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Seated players. A player who leaves mid-match is removed here and
    /// their color is skipped from then on.
    pub players: Vector<Player>,

    /// Color allowed to roll or move.
    pub current_turn: Color,

    /// Committed die value, cleared when the turn resolves.
    pub dice_value: Option<u8>,

    /// Presentation-only rolling window.
    pub is_rolling: bool,

    /// Pieces of every color that started the match.
    pub pieces: OrdMap<Color, [Piece; PIECES_PER_COLOR]>,

    pub winner: Option<Color>,

    pub status: GameStatus,

    /// Turn number (starts at 1, increments when the turn passes).
    pub turn_number: u32,

    /// Committed moves, oldest first.
    pub history: Vector<MoveRecord>,
}

impl GameState {
    /// Create the opening state for the given seats.
    ///
    /// All pieces start at home and the lowest color present opens.
    #[must_use]
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        let players: Vector<Player> = players.into_iter().collect();
        let mut pieces = OrdMap::new();
        for player in players.iter() {
            pieces.insert(player.color, Piece::starting_set(player.color));
        }
        let current_turn = players
            .iter()
            .map(|p| p.color)
            .min()
            .unwrap_or(Color::Red);

        Self {
            players,
            current_turn,
            dice_value: None,
            is_rolling: false,
            pieces,
            winner: None,
            status: GameStatus::Playing,
            turn_number: 1,
            history: Vector::new(),
        }
    }

    /// Current state-machine phase.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        match self.status {
            GameStatus::Waiting => GamePhase::Waiting,
            GameStatus::Finished => GamePhase::Finished,
            GameStatus::Playing if self.is_rolling => GamePhase::Rolling,
            GameStatus::Playing if self.dice_value.is_some() => GamePhase::AwaitingMove,
            GameStatus::Playing => GamePhase::AwaitingRoll,
        }
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.status == GameStatus::Finished
    }

    // === Players ===

    /// Colors that started the match, in cyclic order.
    #[must_use]
    pub fn colors(&self) -> ColorSet {
        self.pieces.keys().copied().collect()
    }

    /// The player seated on a color, if still present.
    #[must_use]
    pub fn player_for(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| p.color == color)
    }

    #[must_use]
    pub fn is_seated(&self, color: Color) -> bool {
        self.player_for(color).is_some()
    }

    // === Pieces ===

    #[must_use]
    pub fn pieces_of(&self, color: Color) -> Option<&[Piece; PIECES_PER_COLOR]> {
        self.pieces.get(&color)
    }

    #[must_use]
    pub fn piece(&self, color: Color, id: PieceId) -> Option<&Piece> {
        self.pieces.get(&color).and_then(|set| set.get(id.index()))
    }

    pub fn piece_mut(&mut self, color: Color, id: PieceId) -> Option<&mut Piece> {
        self.pieces
            .get_mut(&color)
            .and_then(|set| set.get_mut(id.index()))
    }

    /// Move a piece without any rule checks.
    pub fn set_position(&mut self, color: Color, id: PieceId, position: PiecePosition) {
        if let Some(piece) = self.piece_mut(color, id) {
            piece.position = position;
        }
    }

    /// Pieces standing on an outer-loop cell.
    #[must_use]
    pub fn occupants(&self, cell: u8) -> SmallVec<[Piece; 4]> {
        self.pieces
            .values()
            .flat_map(|set| set.iter())
            .filter(|p| p.position == PiecePosition::OnTrack(cell))
            .copied()
            .collect()
    }

    /// All four pieces of the color are finished.
    #[must_use]
    pub fn all_finished(&self, color: Color) -> bool {
        self.pieces_of(color)
            .map(|set| set.iter().all(Piece::is_finished))
            .unwrap_or(false)
    }

    /// Seated and still has a non-finished piece.
    #[must_use]
    pub fn has_active_hand(&self, color: Color) -> bool {
        self.is_seated(color)
            && self
                .pieces_of(color)
                .map(|set| set.iter().any(|p| !p.is_finished()))
                .unwrap_or(false)
    }

    // === Turn Advancement ===

    /// Next color in cyclic order with an active hand, wrapping back to the
    /// current color if it is the only one left.
    #[must_use]
    pub fn next_turn_color(&self) -> Option<Color> {
        self.current_turn
            .cycle_after()
            .find(|&c| self.has_active_hand(c))
    }

    /// Pass the turn and clear the die.
    pub fn advance_turn(&mut self) {
        if let Some(next) = self.next_turn_color() {
            self.current_turn = next;
        }
        self.dice_value = None;
        self.is_rolling = false;
        self.turn_number += 1;
    }

    /// Keep the turn with the current color and clear the die.
    pub fn retain_turn(&mut self) {
        self.dice_value = None;
        self.is_rolling = false;
    }

    /// Remove a departed player's seat. Their pieces stay on the board.
    pub fn remove_player(&mut self, color: Color) {
        self.players = self
            .players
            .iter()
            .filter(|p| p.color != color)
            .cloned()
            .collect();
        if self.status == GameStatus::Playing && self.current_turn == color {
            self.advance_turn();
        }
    }

    /// Record a committed move.
    pub fn record_move(&mut self, record: MoveRecord) {
        self.history.push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::player::PlayerId;

    fn seats(colors: &[Color]) -> Vec<Player> {
        colors
            .iter()
            .enumerate()
            .map(|(i, &c)| Player::human(PlayerId::new(i as u64), format!("P{i}"), c))
            .collect()
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(seats(&[Color::Green, Color::Blue]));
        assert_eq!(state.current_turn, Color::Blue);
        assert_eq!(state.colors().as_slice(), &[Color::Blue, Color::Green]);
        assert!(state.pieces_of(Color::Red).is_none());
        assert!(state
            .pieces_of(Color::Green)
            .unwrap()
            .iter()
            .all(Piece::is_home));
        assert_eq!(state.phase(), GamePhase::AwaitingRoll);
        assert_eq!(state.turn_number, 1);
    }

    #[test]
    fn test_phase_derivation() {
        let mut state = GameState::new(seats(&[Color::Red, Color::Blue]));
        state.is_rolling = true;
        assert_eq!(state.phase(), GamePhase::Rolling);
        state.is_rolling = false;
        state.dice_value = Some(3);
        assert_eq!(state.phase(), GamePhase::AwaitingMove);
        state.status = GameStatus::Finished;
        assert_eq!(state.phase(), GamePhase::Finished);
    }

    #[test]
    fn test_advance_turn_skips_finished_colors() {
        let mut state = GameState::new(seats(&[Color::Red, Color::Blue, Color::Green]));
        for id in PieceId::all() {
            state.set_position(Color::Blue, id, PiecePosition::Finished);
        }
        state.advance_turn();
        assert_eq!(state.current_turn, Color::Green);
        assert_eq!(state.turn_number, 2);
        state.advance_turn();
        assert_eq!(state.current_turn, Color::Red);
    }

    #[test]
    fn test_advance_turn_wraps_to_self_when_alone() {
        let mut state = GameState::new(seats(&[Color::Red, Color::Yellow]));
        state.remove_player(Color::Yellow);
        state.dice_value = Some(2);
        state.advance_turn();
        assert_eq!(state.current_turn, Color::Red);
        assert_eq!(state.dice_value, None);
    }

    #[test]
    fn test_remove_current_player_passes_turn() {
        let mut state = GameState::new(seats(&[Color::Red, Color::Blue, Color::Yellow]));
        state.dice_value = Some(4);
        state.remove_player(Color::Red);
        assert_eq!(state.current_turn, Color::Blue);
        assert_eq!(state.dice_value, None);
        assert!(!state.is_seated(Color::Red));
        // Pieces stay on the board
        assert!(state.pieces_of(Color::Red).is_some());
    }

    #[test]
    fn test_occupants() {
        let mut state = GameState::new(seats(&[Color::Red, Color::Blue]));
        state.set_position(Color::Red, PieceId(0), PiecePosition::OnTrack(5));
        state.set_position(Color::Blue, PieceId(2), PiecePosition::OnTrack(5));
        state.set_position(Color::Blue, PieceId(3), PiecePosition::OnTrack(6));
        let here = state.occupants(5);
        assert_eq!(here.len(), 2);
        assert!(here.iter().any(|p| p.color == Color::Blue && p.id == PieceId(2)));
    }

    #[test]
    fn test_state_serialization() {
        let mut state = GameState::new(seats(&[Color::Red, Color::Blue]));
        state.set_position(Color::Red, PieceId(1), PiecePosition::OnHomeStretch(2));
        let json = serde_json::to_string(&state).unwrap();
        let restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, restored);
    }
}
