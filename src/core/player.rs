//! Player identification and seat data.
//!
//! ## PlayerId
//!
//! Opaque 64-bit identifier, unique across every client talking to the same
//! store. Humans render as `player_<hex>` and bots as `bot_<hex>`.
//!
//! ## Player
//!
//! A seat in a room: name, color, host/ready flags and whether a bot
//! occupies it.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Player identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u64);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A seat in a room.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub color: Color,
    pub is_host: bool,
    pub is_ready: bool,
    /// Bots are driven by the host's client and are always ready.
    pub is_bot: bool,
}

impl Player {
    /// A human player, not ready, not host.
    pub fn human(id: PlayerId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            is_host: false,
            is_ready: false,
            is_bot: false,
        }
    }

    /// A bot seat. Bots are marked ready on creation.
    pub fn bot(id: PlayerId, name: impl Into<String>, color: Color) -> Self {
        Self {
            id,
            name: name.into(),
            color,
            is_host: false,
            is_ready: true,
            is_bot: true,
        }
    }

    /// Mark this player as host.
    #[must_use]
    pub fn as_host(mut self) -> Self {
        self.is_host = true;
        self
    }

    /// Display handle: `player_<id>` or `bot_<id>`.
    #[must_use]
    pub fn handle(&self) -> String {
        if self.is_bot {
            format!("bot_{}", self.id)
        } else {
            format!("player_{}", self.id)
        }
    }
}
