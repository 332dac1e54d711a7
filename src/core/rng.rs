//! Deterministic random number generation and dice sources.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for dice, invite codes and ids
//! - **Injectable dice**: The engine rolls through `DiceSource`, so tests can
//!   script exact rolls with `ScriptedDice`
//!
//! ```
//! use ludo_core::core::{DiceSource, GameRng};
//!
//! let mut dice = GameRng::new(42).for_context("dice");
//! let roll = dice.roll();
//! assert!((1..=6).contains(&roll));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Faces on a die.
pub const DIE_FACES: u8 = 6;

/// Anything that can produce a die value in `1..=6`.
pub trait DiceSource {
    /// Roll one die.
    fn roll(&mut self) -> u8;
}

/// Deterministic RNG.
///
/// Uses ChaCha8 for speed while keeping uniform, unbiased output.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Create an RNG seeded from operating-system entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Create an independent stream for a specific context.
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        let context_seed = hasher.finish();

        Self::new(context_seed)
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Generate a random 64-bit value.
    pub fn gen_u64(&mut self) -> u64 {
        self.inner.gen()
    }

    /// Choose a random element from a slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.inner)
    }
}

impl DiceSource for GameRng {
    fn roll(&mut self) -> u8 {
        self.inner.gen_range(1..=DIE_FACES)
    }
}

/// Replays a fixed sequence of rolls, cycling when it runs out.
#[derive(Clone, Debug)]
pub struct ScriptedDice {
    rolls: Vec<u8>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create a scripted source. Every roll must be in `1..=6`.
    pub fn new(rolls: impl Into<Vec<u8>>) -> Self {
        let rolls = rolls.into();
        assert!(!rolls.is_empty(), "Script needs at least one roll");
        assert!(
            rolls.iter().all(|r| (1..=DIE_FACES).contains(r)),
            "Scripted rolls must be 1-6"
        );
        Self { rolls, cursor: 0 }
    }

    /// Rolls consumed so far.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let value = self.rolls[self.cursor % self.rolls.len()];
        self.cursor += 1;
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll(), rng2.roll());
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..20).map(|_| rng1.gen_u64()).collect();
        let seq2: Vec<_> = (0..20).map(|_| rng2.gen_u64()).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_rolls_cover_all_faces() {
        let mut rng = GameRng::new(7);
        let mut seen = [0u32; 6];
        for _ in 0..6000 {
            let r = rng.roll();
            assert!((1..=6).contains(&r));
            seen[(r - 1) as usize] += 1;
        }
        // Uniform: each face near 1000
        for count in seen {
            assert!(count > 850 && count < 1150, "face count {count}");
        }
    }

    #[test]
    fn test_context_streams_are_independent() {
        let rng = GameRng::new(42);
        let mut dice = rng.for_context("dice");
        let mut codes = rng.for_context("codes");
        let a: Vec<_> = (0..10).map(|_| dice.gen_u64()).collect();
        let b: Vec<_> = (0..10).map(|_| codes.gen_u64()).collect();
        assert_ne!(a, b);

        let mut dice_again = rng.for_context("dice");
        let c: Vec<_> = (0..10).map(|_| dice_again.gen_u64()).collect();
        assert_eq!(a, c);
    }

    #[test]
    fn test_scripted_dice_cycles() {
        let mut dice = ScriptedDice::new(vec![6, 2]);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.roll(), 2);
        assert_eq!(dice.roll(), 6);
        assert_eq!(dice.consumed(), 3);
    }

    #[test]
    #[should_panic(expected = "Scripted rolls must be 1-6")]
    fn test_scripted_dice_rejects_seven() {
        let _ = ScriptedDice::new(vec![7]);
    }
}
