//! # ludo-core
//!
//! Rules and synchronization core for four-player Ludo.
//!
//! ## Design Principles
//!
//! 1. **Typed Positions**: A piece is `AtHome`, `OnTrack`, `OnHomeStretch` or
//!    `Finished`. No sentinel integers in the engine.
//!
//! 2. **Whole-Record Transactions**: Every room and match operation is applied
//!    to a private copy of the shared snapshot and published as one unit.
//!
//! 3. **Injected Randomness**: Dice come from a `DiceSource`; the seeded
//!    `GameRng` in production, `ScriptedDice` in tests.
//!
//! ## Architecture
//!
//! - **Shared Record**: Room and match live together in a versioned
//!   `Snapshot` keyed by invite code. Writes are compare-and-set on the
//!   version, so racing clients detect and replay lost writes.
//!
//! - **Persistent Data Structures**: Match state uses `im-rs`, so drafting a
//!   transaction is a cheap clone.
//!
//! ## Modules
//!
//! - `core`: Colors, pieces, players, state, move records, RNG, config, errors
//! - `track`: Board geometry (start cells, progress, home stretch, safe cells)
//! - `rules`: `RulesEngine` trait and the standard Ludo rules
//! - `game`: Turn/dice/move engine and bot policies
//! - `room`: Invite codes, seats, readiness, starting a match
//! - `sync`: Versioned snapshot store, client channel and poll loop
//! - `client`: `LudoClient`, the per-participant entry point

pub mod client;
pub mod core;
pub mod game;
pub mod room;
pub mod rules;
pub mod sync;
pub mod track;

// Re-export commonly used types
pub use crate::core::{
    BotPolicyKind, Capture, Color, DiceSource, GamePhase, GameRng, GameState, GameStatus,
    LudoConfig, MoveRecord, Piece, PieceId, PiecePosition, Player, PlayerId, ScriptedDice,
};

pub use crate::core::{ConfigError, JoinError, LudoError, RoomError, SyncError, TurnError};

pub use crate::rules::{GameResult, LudoRules, MoveList, RulesEngine};

pub use crate::game::{GameEngine, GreedyPolicy, MovePolicy, RandomPolicy, RollOutcome};

pub use crate::room::{Room, RoomId, RoomStatus, Snapshot};

pub use crate::sync::{
    MemoryStore, PollStatus, PollTarget, PollerHandle, Reconciled, SnapshotStore, SyncChannel,
    Version, Versioned,
};

pub use crate::client::{BotStep, LudoClient};
