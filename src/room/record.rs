//! The room record: invite code, seats, host and status.

use serde::{Deserialize, Serialize};

use crate::core::{Color, Player, PlayerId};

/// Seats in a room.
pub const MAX_PLAYERS: usize = 4;

/// Room identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoomId(pub u64);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room_{:016x}", self.0)
    }
}

/// Whether the room is still gathering players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Playing,
}

/// A room of up to four seats.
///
/// `host_id` always names a seated player while the room has any players.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub invite_code: String,
    pub host_id: PlayerId,
    /// Seats in join order.
    pub players: Vec<Player>,
    pub status: RoomStatus,
}

impl Room {
    /// Open a room with its host seated on the first color.
    pub fn new(
        id: RoomId,
        invite_code: impl Into<String>,
        host_id: PlayerId,
        host_name: impl Into<String>,
    ) -> Self {
        let host = Player::human(host_id, host_name, Color::Red).as_host();
        Self {
            id,
            invite_code: invite_code.into(),
            host_id,
            players: vec![host],
            status: RoomStatus::Waiting,
        }
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == id)
    }

    #[must_use]
    pub fn host(&self) -> Option<&Player> {
        self.player(self.host_id)
    }

    #[must_use]
    pub fn is_host(&self, id: PlayerId) -> bool {
        self.host_id == id && self.player(id).is_some()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    #[must_use]
    pub fn is_waiting(&self) -> bool {
        self.status == RoomStatus::Waiting
    }

    /// First color in cyclic order nobody sits on.
    #[must_use]
    pub fn next_free_color(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|c| self.players.iter().all(|p| p.color != *c))
    }

    #[must_use]
    pub fn all_ready(&self) -> bool {
        self.players.iter().all(|p| p.is_ready)
    }

    /// Human players in join order.
    pub fn humans(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_bot)
    }

    /// The seat holding a color.
    #[must_use]
    pub fn player_by_color(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| p.color == color)
    }
}
