//! Core types: colors, pieces, players, state, move records, RNG,
//! configuration and errors.
//!
//! Everything the rules, room lifecycle and sync layers share lives here.

pub mod action;
pub mod color;
pub mod config;
pub mod error;
pub mod piece;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Capture, MoveRecord};
pub use color::Color;
pub use config::{BotPolicyKind, LudoConfig, DEFAULT_POLL_INTERVAL_MS};
pub use error::{ConfigError, JoinError, LudoError, RoomError, SyncError, TurnError};
pub use piece::{Piece, PieceId, PiecePosition, FINISH_CELL, HOME_STRETCH_BASE, PIECES_PER_COLOR};
pub use player::{Player, PlayerId};
pub use rng::{DiceSource, GameRng, ScriptedDice, DIE_FACES};
pub use state::{ColorSet, GamePhase, GameState, GameStatus};
