//! Rooms: invite codes, seats, readiness, bots and starting a match.
//!
//! A `Snapshot` (room plus optional match) is the unit the sync layer
//! publishes, so starting a game or leaving mid-match touches both records
//! in one commit.

pub mod code;
pub mod lifecycle;
pub mod record;

pub use code::INVITE_CODE_LEN;
pub use lifecycle::Snapshot;
pub use record::{Room, RoomId, RoomStatus, MAX_PLAYERS};
