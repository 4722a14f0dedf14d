//! Random source.
//!
//! Every stochastic decision in the crate goes through the five primitives of
//! [`RandomExt`], which is implemented for any [`rand::Rng`].
//!
//! # Concurrency
//!
//! Generators are never shared between threads. The engine owns one master
//! generator and, at the start of every generation, [`fork`]s an independent
//! generator for each pipeline stage (or each batch). Seeding the master with
//! [`create_rng`] therefore makes a whole run reproducible.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Creates a seeded generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Derives a new generator from `rng`.
///
/// The child's stream is seeded from the parent's next draw, so a sequence of
/// forks from a seeded parent is itself deterministic.
pub fn fork<R: Rng + ?Sized>(rng: &mut R) -> StdRng {
    StdRng::seed_from_u64(rng.random())
}

/// The random primitives used by initializers and genetic operators.
pub trait RandomExt: Rng {
    /// Uniform float in `[0, 1)`.
    fn percent(&mut self) -> f64 {
        self.random::<f64>()
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n == 0`.
    fn below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.random_range(0..n)
    }

    /// `k` integers drawn with repetition from `[min, max)`, sorted ascending.
    ///
    /// An empty range yields `k` copies of `min`.
    fn ordered_ints(&mut self, min: usize, max: usize, k: usize) -> Vec<usize> {
        if min >= max {
            return vec![min; k];
        }
        let mut result: Vec<usize> = (0..k).map(|_| self.random_range(min..max)).collect();
        result.sort_unstable();
        result
    }

    /// A random permutation of `[0, n)`.
    fn permutation(&mut self, n: usize) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..n).collect();
        perm.shuffle(self);
        perm
    }

    /// Returns true with probability `rate`.
    ///
    /// `rate <= 0` never fires, `rate >= 1` always does.
    fn peek(&mut self, rate: f64) -> bool {
        self.percent() < rate
    }
}

impl<R: Rng + ?Sized> RandomExt for R {}
