//! Rules engine trait and the Ludo rule set.
//!
//! `RulesEngine` is the seam the game engine and bots call into; `LudoRules`
//! is the standard implementation. Nothing outside this module interprets
//! captures, finishing or turn resolution directly.

pub mod engine;
pub mod ludo;

pub use engine::{GameResult, MoveList, RulesEngine};
pub use ludo::LudoRules;
