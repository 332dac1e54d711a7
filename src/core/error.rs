//! Error types.
//!
//! Every failed operation leaves the room and game untouched. Callers that
//! want the "silent no-op" behaviour simply ignore the error; presentation
//! layers match on it to show a message.

use super::color::Color;

/// Why a `join_room` call failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JoinError {
    #[error("No room matches invite code {0}")]
    RoomNotFound(String),
    #[error("Room is full")]
    RoomFull,
    #[error("Game already started")]
    AlreadyStarted,
}

/// Why a roll or move was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("No game in progress")]
    NoGame,
    #[error("It is {current}'s turn")]
    NotYourTurn { current: Color },
    #[error("Dice already rolled")]
    AlreadyRolled,
    #[error("Roll the dice first")]
    NotRolled,
    #[error("That piece cannot move")]
    InvalidMove,
    #[error("Game is over")]
    GameOver,
}

/// Why a room operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    #[error("Only the host can do that")]
    NotHost,
    #[error("Not in a room")]
    NotInRoom,
    #[error("Already in a room")]
    AlreadyInRoom,
    #[error("Room is no longer waiting for players")]
    NotWaiting,
    #[error("Need at least 2 players to start")]
    InsufficientPlayers,
    #[error("All players must be ready")]
    NotAllReady,
    #[error("Room is full")]
    RoomFull,
    #[error("Player is not a bot")]
    NotABot,
    #[error("No such player in this room")]
    NoSuchPlayer,
}

/// Store and reconciliation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("Stale write: stored version {stored}, attempted {attempted}")]
    StaleVersion { stored: u64, attempted: u64 },
    #[error("Lost the write race twice; adopted the remote snapshot")]
    Conflict,
    #[error("Room {0} no longer exists")]
    RoomClosed(String),
    #[error("Snapshot codec error: {0}")]
    Codec(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Safe cell {0} is off the 52-cell track")]
    InvalidSafeCell(u8),
    #[error("Poll interval must be positive")]
    ZeroPollInterval,
}

/// Any failure surfaced by `LudoClient`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LudoError {
    #[error(transparent)]
    Join(#[from] JoinError),
    #[error(transparent)]
    Turn(#[from] TurnError),
    #[error(transparent)]
    Room(#[from] RoomError),
    #[error(transparent)]
    Sync(#[from] SyncError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TurnError::NotYourTurn { current: Color::Blue };
        assert_eq!(err.to_string(), "It is blue's turn");

        let err = SyncError::StaleVersion { stored: 4, attempted: 3 };
        assert!(err.to_string().contains("stored version 4"));
    }

    #[test]
    fn test_umbrella_conversion() {
        let err: LudoError = JoinError::RoomFull.into();
        assert_eq!(err, LudoError::Join(JoinError::RoomFull));
        assert_eq!(err.to_string(), "Room is full");
    }
}
