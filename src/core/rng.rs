//! Deterministic random number generation for the AI.
//!
//! The rules engine never draws random numbers; all randomness lives in the
//! AI's probability gates and tie-breaks. Seeding it makes whole AI games
//! reproducible, which the tests rely on.
//!
//! ```
//! use riverstone::core::GameRng;
//!
//! let moves = ["a1", "c3", "f6"];
//! let mut a = GameRng::new(7);
//! let mut b = GameRng::new(7);
//! assert_eq!(a.pick(&moves), b.pick(&moves));
//! ```

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Seeded ChaCha8 stream.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// True with probability `p` (clamped to `[0, 1]`).
    pub fn chance(&mut self, p: f64) -> bool {
        if p <= 0.0 {
            false
        } else if p >= 1.0 {
            true
        } else {
            self.inner.gen_bool(p)
        }
    }

    #[must_use]
    pub fn pick<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        slice.choose(&mut self.inner)
    }

    /// Index drawn proportionally to `weights`.
    ///
    /// Returns `None` if weights are empty or sum to zero. Negative weights
    /// count as zero.
    pub fn pick_weighted(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().map(|w| w.max(0.0)).sum();
        if total <= 0.0 {
            return None;
        }

        let mut threshold = self.inner.gen::<f64>() * total;
        for (i, &weight) in weights.iter().enumerate() {
            threshold -= weight.max(0.0);
            if threshold < 0.0 {
                return Some(i);
            }
        }

        // Rounding left a sliver: take the last positive weight.
        weights.iter().rposition(|&w| w > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let items: Vec<u32> = (0..1000).collect();
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.pick(&items), rng2.pick(&items));
            assert_eq!(rng1.chance(0.5), rng2.chance(0.5));
        }
    }

    #[test]
    fn test_seeds_differ() {
        let items: Vec<u32> = (0..1000).collect();
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(43);

        let seq1: Vec<_> = (0..10).map(|_| rng1.pick(&items)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.pick(&items)).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_chance_edges() {
        let mut rng = GameRng::new(1);
        for _ in 0..50 {
            assert!(!rng.chance(0.0));
            assert!(rng.chance(1.0));
            assert!(!rng.chance(-3.0));
        }
    }

    #[test]
    fn test_pick_weighted() {
        let mut rng = GameRng::new(42);

        for _ in 0..20 {
            assert_eq!(rng.pick_weighted(&[0.0, 5.0, 0.0]), Some(1));
        }
        assert_eq!(rng.pick_weighted(&[]), None);
        assert_eq!(rng.pick_weighted(&[0.0, -1.0]), None);
    }

    #[test]
    fn test_pick() {
        let mut rng = GameRng::new(3);
        let items = [4, 5, 6];
        assert!(items.contains(rng.pick(&items).unwrap()));

        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
    }
}
