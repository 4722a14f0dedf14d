//! Chromosome representation.

use crate::error::InitError;
use rand::Rng;
use std::ops::Index;

/// One element of a chromosome.
pub type Base = u8;

/// An ordered, fixed-length sequence of bases, each in `[0, max_value]`.
///
/// Length and `max_value` never change once a chromosome exists, and every
/// chromosome derived from it (clone, crossover, mutation) inherits both.
/// Operators always write into fresh storage: two chromosomes never alias.
///
/// - `max_value = 1` gives a binary chromosome.
/// - `max_value = 255` uses the whole byte range.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromosome {
    bases: Vec<Base>,
    max_value: Base,
}

impl Chromosome {
    /// Creates a zeroed chromosome of `len` bases.
    pub fn new(len: usize, max_value: Base) -> Self {
        Self {
            bases: vec![0; len],
            max_value,
        }
    }

    /// Creates a chromosome whose bases are drawn uniformly in `[0, max_value]`.
    pub fn random<R: Rng + ?Sized>(len: usize, max_value: Base, rng: &mut R) -> Self {
        let bases = (0..len).map(|_| rng.random_range(0..=max_value)).collect();
        Self { bases, max_value }
    }

    /// Wraps existing bases, checking each against `max_value`.
    pub fn from_bases(bases: Vec<Base>, max_value: Base) -> Result<Self, InitError> {
        if let Some((index, &value)) = bases.iter().enumerate().find(|(_, &b)| b > max_value) {
            return Err(InitError::BaseOutOfRange {
                index,
                value,
                max_value,
            });
        }
        Ok(Self { bases, max_value })
    }

    /// A zeroed chromosome with the same length and `max_value`.
    pub fn derive(&self) -> Self {
        Self::new(self.len(), self.max_value)
    }

    /// Draws a fresh base in `[0, max_value]`.
    pub fn random_base<R: Rng + ?Sized>(&self, rng: &mut R) -> Base {
        rng.random_range(0..=self.max_value)
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn max_value(&self) -> Base {
        self.max_value
    }

    pub fn bases(&self) -> &[Base] {
        &self.bases
    }

    pub fn into_bases(self) -> Vec<Base> {
        self.bases
    }

    pub(crate) fn bases_mut(&mut self) -> &mut [Base] {
        &mut self.bases
    }
}

impl Index<usize> for Chromosome {
    type Output = Base;

    fn index(&self, index: usize) -> &Base {
        &self.bases[index]
    }
}

impl AsRef<[Base]> for Chromosome {
    fn as_ref(&self) -> &[Base] {
        &self.bases
    }
}
