//! Match play: the turn/dice/move engine and bot policies.

pub mod bot;
pub mod engine;

pub use bot::{policy_for, GreedyPolicy, MovePolicy, RandomPolicy};
pub use engine::{GameEngine, RollOutcome};
