//! Mutation operators.
//!
//! Every mutation clones its input and edits the copy; the input chromosome is
//! never modified.

use crate::gene::Chromosome;
use crate::random::RandomExt;
use rand::seq::SliceRandom;
use rand::Rng;

/// Mutation strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Mutation {
    /// Replaces one random base with a fresh value in range.
    ///
    /// # Complexity
    /// O(1) besides the copy
    Unique,

    /// Replaces each base with a fresh value with probability `rate`.
    Uniform(f64),

    /// Exchanges two random positions. A no-op when both draws coincide.
    Swap,

    /// Reverses a random segment `[pos1, pos2]` (2-opt move).
    Inversion,

    /// Shuffles the bases strictly between two random positions.
    Scramble,

    /// Probabilistic chain of mutations.
    Multi(MultiMutation),
}

impl Mutation {
    /// Uniform mutation with an even 0.5 rate.
    pub fn uniform() -> Self {
        Mutation::Uniform(0.5)
    }

    /// Returns a mutated copy of `chromosome`.
    pub fn mutate<R: Rng + ?Sized>(&self, chromosome: &Chromosome, rng: &mut R) -> Chromosome {
        let mut mutant = chromosome.clone();
        let n = mutant.len();
        if n == 0 {
            return mutant;
        }

        match self {
            Mutation::Unique => {
                let i = rng.below(n);
                let value = mutant.random_base(rng);
                mutant.bases_mut()[i] = value;
            }
            Mutation::Uniform(rate) => {
                for i in 0..n {
                    if rng.peek(*rate) {
                        let value = mutant.random_base(rng);
                        mutant.bases_mut()[i] = value;
                    }
                }
            }
            Mutation::Swap => {
                let i = rng.below(n);
                let j = rng.below(n);
                mutant.bases_mut().swap(i, j);
            }
            Mutation::Inversion => {
                let pos = rng.ordered_ints(0, n, 2);
                mutant.bases_mut()[pos[0]..=pos[1]].reverse();
            }
            Mutation::Scramble => {
                let pos = rng.ordered_ints(0, n, 2);
                if pos[1] > pos[0] + 1 {
                    mutant.bases_mut()[pos[0] + 1..pos[1]].shuffle(rng);
                }
            }
            Mutation::Multi(multi) => return multi.mutate(&mutant, rng),
        }

        mutant
    }
}

/// Ordered list of `(rate, mutation)` pairs.
///
/// Each pair whose rate fires is applied, in order, to the running chromosome.
/// With `stop_at_first`, only the first firing pair is applied.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiMutation {
    chain: Vec<(f64, Mutation)>,
    stop_at_first: bool,
}

impl MultiMutation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a mutation applied with probability `rate`.
    pub fn with(mut self, rate: f64, mutation: Mutation) -> Self {
        self.chain.push((rate, mutation));
        self
    }

    /// Stops after the first mutation that fires.
    pub fn stop_at_first(mut self, stop: bool) -> Self {
        self.stop_at_first = stop;
        self
    }

    pub fn mutate<R: Rng + ?Sized>(&self, chromosome: &Chromosome, rng: &mut R) -> Chromosome {
        let mut current = chromosome.clone();
        for (rate, mutation) in &self.chain {
            if rng.peek(*rate) {
                current = mutation.mutate(&current, rng);
                if self.stop_at_first {
                    break;
                }
            }
        }
        current
    }
}
