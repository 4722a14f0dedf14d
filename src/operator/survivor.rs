//! Survivor strategies.
//!
//! A survivor strategy decides which individuals, out of the parents and the
//! freshly scored offspring, form the next generation. It never modifies its
//! inputs and always returns a new [`Population`] whose stats are computed.

use crate::error::OperatorError;
use crate::gene::{Individual, Population};
use crate::random::RandomExt;
use rand::seq::SliceRandom;
use rand::Rng;

/// Survivor strategy.
///
/// Every strategy keeps at most `parents.len()` individuals. Merges list the
/// parents before the offspring and sorting is stable, so ties favour parents.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Survivor {
    /// Fittest of parents and offspring.
    #[default]
    Elite,

    /// Lowest ranks of parents and offspring; every survivor's rank is then
    /// incremented.
    Rank,

    /// Uniformly random subset of parents and offspring.
    Random,

    /// Offspring only, in production order.
    ChildrenOnly,

    /// Probabilistic chain with a mandatory fallback.
    Multi(MultiSurvivor),
}

impl Survivor {
    pub fn survive<R: Rng + ?Sized>(
        &self,
        parents: &Population,
        offspring: &Population,
        rng: &mut R,
    ) -> Result<Population, OperatorError> {
        let size = parents.len();
        let survivors = match self {
            Survivor::Elite => {
                let mut merged = merge(parents, offspring);
                merged.sort_by_fitness();
                merged.first(size)
            }
            Survivor::Rank => {
                let mut merged = merge(parents, offspring);
                merged.sort_by_rank();
                let mut kept = merged.first(size);
                kept.add_rank();
                kept
            }
            Survivor::Random => {
                let mut individuals = merge(parents, offspring).into_individuals();
                individuals.shuffle(rng);
                individuals.truncate(size);
                Population::from_individuals(individuals)
            }
            Survivor::ChildrenOnly => offspring.first(size),
            Survivor::Multi(multi) => multi.survive(parents, offspring, rng)?,
        };
        Ok(survivors)
    }
}

/// Ordered list of `(rate, survivor)` pairs plus a default.
///
/// Same shape as [`MultiSelection`](super::MultiSelection): the first pair
/// whose rate fires is used, otherwise the default.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiSurvivor {
    chain: Vec<(f64, Survivor)>,
    default: Option<Box<Survivor>>,
}

impl MultiSurvivor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a survivor strategy tried with probability `rate`.
    pub fn with(mut self, rate: f64, survivor: Survivor) -> Self {
        self.chain.push((rate, survivor));
        self
    }

    /// Sets the fallback used when no chained strategy fires.
    pub fn otherwise(mut self, survivor: Survivor) -> Self {
        self.default = Some(Box::new(survivor));
        self
    }

    pub fn survive<R: Rng + ?Sized>(
        &self,
        parents: &Population,
        offspring: &Population,
        rng: &mut R,
    ) -> Result<Population, OperatorError> {
        for (rate, survivor) in &self.chain {
            if rng.peek(*rate) {
                return survivor.survive(parents, offspring, rng);
            }
        }
        match &self.default {
            Some(survivor) => survivor.survive(parents, offspring, rng),
            None => Err(OperatorError::MissingDefault {
                operator: "multi survivor",
            }),
        }
    }
}

fn merge(parents: &Population, offspring: &Population) -> Population {
    let individuals: Vec<Individual> = parents.iter().chain(offspring).cloned().collect();
    Population::from_individuals(individuals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::testing::{ind, pop};
    use crate::random::create_rng;
    use proptest::prelude::*;

    fn fitnesses(p: &Population) -> Vec<f64> {
        p.iter().map(|i| i.fitness).collect()
    }

    fn ranks(p: &Population) -> Vec<u32> {
        p.iter().map(|i| i.rank).collect()
    }

    #[test]
    fn test_elite_keeps_fittest() {
        let mut rng = create_rng(42);
        let parents = pop(&[0.1, 0.5, 0.3]);
        let offspring = pop(&[0.9, 0.2, 0.4]);
        let next = Survivor::Elite.survive(&parents, &offspring, &mut rng).unwrap();
        assert_eq!(fitnesses(&next), vec![0.9, 0.5, 0.4]);
        assert_eq!(next.elite().map(|e| e.fitness), Some(0.9));
        assert!((next.total_fitness() - 1.8).abs() < 1e-12);
        // Inputs untouched
        assert_eq!(fitnesses(&parents), vec![0.1, 0.5, 0.3]);
        assert_eq!(fitnesses(&offspring), vec![0.9, 0.2, 0.4]);
    }

    #[test]
    fn test_elite_ties_favour_parents() {
        let mut rng = create_rng(42);
        let parents = Population::from_individuals(vec![ind(0.5, 7)]);
        let offspring = Population::from_individuals(vec![ind(0.5, 0)]);
        let next = Survivor::Elite.survive(&parents, &offspring, &mut rng).unwrap();
        assert_eq!(ranks(&next), vec![7]);
    }

    #[test]
    fn test_elite_with_nan_fitness() {
        let mut rng = create_rng(42);
        let scores = |offset: f64| -> Vec<f64> {
            (0..20)
                .map(|i| if i % 3 == 0 { f64::NAN } else { i as f64 + offset })
                .collect()
        };
        let parents = pop(&scores(0.0));
        let offspring = pop(&scores(0.5));
        let next = Survivor::Elite.survive(&parents, &offspring, &mut rng).unwrap();
        assert_eq!(next.len(), 20);
        assert_eq!(next.elite().map(|e| e.fitness), Some(19.5));
        // 26 numeric scores across both sides, so no NaN survives
        assert!(next.iter().all(|i| !i.fitness.is_nan()));
    }

    #[test]
    fn test_rank_sorts_ascending_and_ages() {
        let mut rng = create_rng(42);
        let parents = Population::from_individuals(vec![ind(0.9, 3), ind(0.8, 1)]);
        let offspring = Population::from_individuals(vec![ind(0.1, 0), ind(0.2, 2)]);
        let next = Survivor::Rank.survive(&parents, &offspring, &mut rng).unwrap();
        assert_eq!(ranks(&next), vec![1, 2]);
        assert_eq!(fitnesses(&next), vec![0.1, 0.8]);
        assert_eq!(next.elite().map(|e| e.rank), Some(2));
        // Parents keep their ranks
        assert_eq!(ranks(&parents), vec![3, 1]);
    }

    #[test]
    fn test_random_keeps_size_and_members() {
        let mut rng = create_rng(42);
        let parents = pop(&[1.0, 2.0, 3.0, 4.0]);
        let offspring = pop(&[5.0, 6.0, 7.0, 8.0]);
        let next = Survivor::Random.survive(&parents, &offspring, &mut rng).unwrap();
        assert_eq!(next.len(), 4);
        for i in &next {
            assert!((1.0..=8.0).contains(&i.fitness));
        }
        let sum: f64 = fitnesses(&next).iter().sum();
        assert_eq!(next.total_fitness(), sum);
    }

    #[test]
    fn test_children_only() {
        let mut rng = create_rng(42);
        let parents = pop(&[9.0, 9.0]);
        let offspring = pop(&[1.0, 2.0, 3.0, 4.0]);
        let next = Survivor::ChildrenOnly
            .survive(&parents, &offspring, &mut rng)
            .unwrap();
        assert_eq!(fitnesses(&next), vec![1.0, 2.0]);
    }

    #[test]
    fn test_multi_falls_back_to_default_once() {
        let mut rng = create_rng(42);
        let parents = pop(&[0.1, 0.5]);
        let offspring = pop(&[0.9, 0.2]);
        let multi = Survivor::Multi(
            MultiSurvivor::new()
                .with(0.0, Survivor::ChildrenOnly)
                .otherwise(Survivor::Rank),
        );
        let next = multi.survive(&parents, &offspring, &mut rng).unwrap();
        // Rank ran exactly once: every survivor aged by one
        assert_eq!(ranks(&next), vec![1, 1]);
    }

    #[test]
    fn test_multi_first_firing_wins() {
        let mut rng = create_rng(42);
        let parents = pop(&[0.1, 0.5]);
        let offspring = pop(&[0.9, 0.2]);
        let multi = MultiSurvivor::new()
            .with(1.0, Survivor::ChildrenOnly)
            .otherwise(Survivor::Elite);
        let next = multi.survive(&parents, &offspring, &mut rng).unwrap();
        assert_eq!(fitnesses(&next), vec![0.9, 0.2]);
    }

    #[test]
    fn test_multi_without_default() {
        let mut rng = create_rng(42);
        let p = pop(&[0.1]);
        let multi = MultiSurvivor::new().with(0.0, Survivor::Elite);
        assert_eq!(
            multi.survive(&p, &p, &mut rng),
            Err(OperatorError::MissingDefault {
                operator: "multi survivor"
            })
        );
    }

    proptest! {
        #[test]
        fn prop_elite_never_lowers_total_fitness(
            parents in proptest::collection::vec(-100.0f64..100.0, 1..30),
            offspring in proptest::collection::vec(-100.0f64..100.0, 0..30),
        ) {
            let mut rng = create_rng(0);
            let (parents, offspring) = (pop(&parents), pop(&offspring));
            let next = Survivor::Elite.survive(&parents, &offspring, &mut rng).unwrap();
            prop_assert_eq!(next.len(), parents.len());
            prop_assert!(next.total_fitness() >= parents.total_fitness() - 1e-9);
        }
    }
}
