//! Deterministic random number generation for deck and quiz shuffles.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical sequence
//! - **Context streams**: Independent sequences for deck order vs quiz order
//! - **Serializable**: O(1) state capture and restore
//! - **Injectable**: Engines only see the `Permuter` trait, so tests can
//!   supply a fixed permutation sequence instead of a seeded RNG.
//!
//! ## Usage
//!
//! ```
//! use firm_games::core::{GameRng, Permuter};
//!
//! let mut rng = GameRng::new(42);
//! let order = rng.permutation(4);
//!
//! let mut sorted = order.clone();
//! sorted.sort_unstable();
//! assert_eq!(sorted, vec![0, 1, 2, 3]);
//!
//! // Same seed, same order
//! let mut again = GameRng::new(42);
//! assert_eq!(again.permutation(4), order);
//! ```

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Source of uniformly random permutations.
///
/// `permutation(len)` returns the indices `0..len` in a new order. Slot `i`
/// of the result holds the original index that is now presented at `i`.
pub trait Permuter: Send {
    /// Produce a permutation of `0..len`.
    fn permutation(&mut self, len: usize) -> Vec<usize>;
}

/// Deterministic RNG backed by ChaCha8.
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

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng().gen())
    }

    /// Create an independent stream for a specific context.
    ///
    /// Keeps deck shuffles and quiz shuffles from consuming each other's
    /// randomness. The same context always produces the same stream.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a random usize in the given range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Shuffle a slice in place (Fisher-Yates).
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.gen_range_usize(0..i + 1);
            slice.swap(i, j);
        }
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

impl Permuter for GameRng {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..len).collect();
        self.shuffle(&mut indices);
        indices
    }
}

/// Serializable RNG state for checkpointing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}

/// Replays a fixed list of permutations, then falls back to identity.
///
/// Intended for tests that need to know exactly where each card or quiz
/// option ends up.
#[derive(Clone, Debug, Default)]
pub struct SequencePermuter {
    queued: VecDeque<Vec<usize>>,
}

impl SequencePermuter {
    /// Identity permutations only.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }

    /// Queue permutations to be returned in order.
    #[must_use]
    pub fn new(permutations: impl IntoIterator<Item = Vec<usize>>) -> Self {
        Self {
            queued: permutations.into_iter().collect(),
        }
    }
}

impl Permuter for SequencePermuter {
    fn permutation(&mut self, len: usize) -> Vec<usize> {
        match self.queued.pop_front() {
            Some(p) if p.len() == len => p,
            _ => (0..len).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_permutation(p: &[usize]) -> bool {
        let mut sorted = p.to_vec();
        sorted.sort_unstable();
        sorted == (0..p.len()).collect::<Vec<_>>()
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.gen_range_usize(0..1000), rng2.gen_range_usize(0..1000));
        }
    }

    #[test]
    fn test_different_seeds() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_context_streams_differ() {
        let rng = GameRng::new(42);
        let mut deck = rng.for_context("deck");
        let mut quiz = rng.for_context("quiz");

        let seq1: Vec<_> = (0..10).map(|_| deck.gen_range_usize(0..1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| quiz.gen_range_usize(0..1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_shuffle_keeps_elements() {
        let mut rng = GameRng::new(42);
        let mut data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let original = data.clone();

        rng.shuffle(&mut data);

        assert_ne!(data, original);
        data.sort();
        assert_eq!(data, original);
    }

    #[test]
    fn test_permutation_is_valid() {
        let mut rng = GameRng::new(7);
        for len in 0..12 {
            assert!(is_permutation(&rng.permutation(len)));
        }
    }

    #[test]
    fn test_state_roundtrip() {
        let mut rng = GameRng::new(42);
        for _ in 0..50 {
            rng.gen_range_usize(0..1000);
        }

        let state = rng.state();
        let expected = rng.permutation(8);

        let mut restored = GameRng::from_state(&state);
        assert_eq!(restored.permutation(8), expected);
    }

    #[test]
    fn test_sequence_permuter() {
        let mut p = SequencePermuter::new(vec![vec![3, 2, 1, 0], vec![1, 0]]);
        assert_eq!(p.permutation(4), vec![3, 2, 1, 0]);
        // Length mismatch falls back to identity
        assert_eq!(p.permutation(3), vec![0, 1, 2]);
        assert_eq!(p.permutation(2), vec![0, 1]);
    }
}
