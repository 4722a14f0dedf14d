//! Chromosome initializers for generation 0.

use super::chromosome::{Base, Chromosome};
use crate::error::InitError;
use crate::random::RandomExt;
use rand::Rng;

/// Number of distinct values a [`Base`] can hold.
const BASE_VALUES: usize = Base::MAX as usize + 1;

/// Builds the chromosomes of the initial population.
///
/// # Examples
///
/// ```
/// use u_galgo::gene::Initializer;
/// use u_galgo::random::create_rng;
///
/// let mut rng = create_rng(42);
/// let c = Initializer::Permutation.init(5, &mut rng).unwrap();
/// let mut sorted = c.bases().to_vec();
/// sorted.sort();
/// assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Initializer {
    /// Every base drawn uniformly in `[0, max_value]`.
    Random { max_value: Base },

    /// Bases form a random permutation of `[0, chromosome_size)`.
    ///
    /// The resulting chromosome's `max_value` is `chromosome_size - 1`.
    Permutation,
}

impl Initializer {
    /// Validates the initializer against a chromosome size.
    pub fn check(&self, chromosome_size: usize) -> Result<(), InitError> {
        match self {
            Initializer::Random { max_value } => {
                if *max_value == 0 {
                    return Err(InitError::ZeroMaxValue);
                }
            }
            Initializer::Permutation => {
                if chromosome_size == 0 {
                    return Err(InitError::EmptyPermutation);
                }
                if chromosome_size > BASE_VALUES {
                    return Err(InitError::PermutationTooLarge {
                        size: chromosome_size,
                        max: BASE_VALUES,
                    });
                }
            }
        }
        Ok(())
    }

    /// Builds one chromosome of `chromosome_size` bases.
    pub fn init<R: Rng + ?Sized>(
        &self,
        chromosome_size: usize,
        rng: &mut R,
    ) -> Result<Chromosome, InitError> {
        self.check(chromosome_size)?;
        match self {
            Initializer::Random { max_value } => {
                Ok(Chromosome::random(chromosome_size, *max_value, rng))
            }
            Initializer::Permutation => {
                // check() bounds every value below BASE_VALUES
                let bases = rng
                    .permutation(chromosome_size)
                    .into_iter()
                    .map(|v| v as Base)
                    .collect();
                Chromosome::from_bases(bases, (chromosome_size - 1) as Base)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;

    #[test]
    fn test_random_initializer() {
        let mut rng = create_rng(42);
        let c = Initializer::Random { max_value: 3 }
            .init(64, &mut rng)
            .unwrap();
        assert_eq!(c.len(), 64);
        assert_eq!(c.max_value(), 3);
        assert!(c.bases().iter().all(|&b| b <= 3));
    }

    #[test]
    fn test_random_initializer_zero_max_value() {
        let mut rng = create_rng(42);
        let err = Initializer::Random { max_value: 0 }.init(8, &mut rng);
        assert_eq!(err.unwrap_err(), InitError::ZeroMaxValue);
    }

    #[test]
    fn test_permutation_initializer() {
        let mut rng = create_rng(42);
        for size in [1, 2, 9, 256] {
            let c = Initializer::Permutation.init(size, &mut rng).unwrap();
            let mut sorted: Vec<usize> = c.bases().iter().map(|&b| b as usize).collect();
            sorted.sort();
            assert_eq!(sorted, (0..size).collect::<Vec<_>>());
            assert_eq!(c.max_value() as usize, size - 1);
        }
    }

    #[test]
    fn test_permutation_initializer_bounds() {
        let mut rng = create_rng(42);
        assert_eq!(
            Initializer::Permutation.init(0, &mut rng).unwrap_err(),
            InitError::EmptyPermutation
        );
        assert_eq!(
            Initializer::Permutation.init(257, &mut rng).unwrap_err(),
            InitError::PermutationTooLarge { size: 257, max: 256 }
        );
    }
}
