//! Individuals and populations.

use super::chromosome::Chromosome;
use super::initializer::Initializer;
use crate::error::InitError;
use rand::Rng;
use std::collections::HashSet;
use std::time::Duration;
use uuid::Uuid;

/// User-supplied fitness function. Higher is better.
pub type FitnessFn = dyn Fn(&Chromosome) -> f64 + Send + Sync;

/// A scored chromosome.
///
/// `rank` counts how many generations the individual's lineage has survived.
/// It is incremented by some survivor strategies and is not a population index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Individual {
    /// Unique identifier, for reporting only.
    pub id: Uuid,
    pub chromosome: Chromosome,
    pub fitness: f64,
    pub rank: u32,
}

impl Individual {
    /// Creates a rank-0 individual with an id drawn from `rng`.
    pub fn new<R: Rng + ?Sized>(chromosome: Chromosome, fitness: f64, rng: &mut R) -> Self {
        let id = uuid::Builder::from_random_bytes(rng.random()).into_uuid();
        Self::with_id(id, chromosome, fitness)
    }

    pub fn with_id(id: Uuid, chromosome: Chromosome, fitness: f64) -> Self {
        Self {
            id,
            chromosome,
            fitness,
            rank: 0,
        }
    }
}

/// Aggregate statistics cached on a [`Population`].
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationStats {
    /// Sum of every individual's fitness.
    pub total_fitness: f64,
    /// Wall-clock time spent producing all generations up to this one.
    pub total_duration: Duration,
    /// 0 for the initial population.
    pub generation: usize,
    /// Highest-fitness individual; ties go to the first occurrence.
    /// `None` only for an empty population.
    pub elite: Option<Individual>,
}

/// An ordered collection of individuals with cached statistics.
///
/// The statistics are recomputed whenever the individual set is replaced, so
/// `total_fitness` is always the sum of the individuals' fitness and `elite`
/// the first individual with maximal fitness.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Population {
    individuals: Vec<Individual>,
    stats: PopulationStats,
}

impl Population {
    /// Wraps `individuals` and computes total fitness and elite.
    ///
    /// Generation number and duration start at zero.
    pub fn from_individuals(individuals: Vec<Individual>) -> Self {
        let mut pop = Self {
            individuals,
            stats: PopulationStats::default(),
        };
        pop.compute_stats();
        pop
    }

    /// Builds generation 0: `size` chromosomes from `initializer`, each scored
    /// with `fitness`.
    ///
    /// The initializer's preconditions are checked once, before any
    /// chromosome is built.
    pub fn init<R: Rng + ?Sized>(
        size: usize,
        chromosome_size: usize,
        initializer: &Initializer,
        fitness: &FitnessFn,
        rng: &mut R,
    ) -> Result<Self, InitError> {
        initializer.check(chromosome_size)?;
        let individuals = (0..size)
            .map(|_| {
                let chromosome = initializer.init(chromosome_size, rng)?;
                let score = fitness(&chromosome);
                Ok(Individual::new(chromosome, score, rng))
            })
            .collect::<Result<Vec<_>, InitError>>()?;
        Ok(Self::from_individuals(individuals))
    }

    /// Re-evaluates every individual with `fitness`, then refreshes the stats.
    pub fn rescore(&mut self, fitness: &FitnessFn) {
        for ind in &mut self.individuals {
            ind.fitness = fitness(&ind.chromosome);
        }
        self.compute_stats();
    }

    /// Recomputes total fitness and elite from the current individuals.
    pub fn compute_stats(&mut self) {
        let mut total = 0.0;
        let mut elite: Option<&Individual> = None;
        for ind in &self.individuals {
            total += ind.fitness;
            if elite.map_or(true, |best| ind.fitness > best.fitness) {
                elite = Some(ind);
            }
        }
        self.stats.total_fitness = total;
        self.stats.elite = elite.cloned();
    }

    /// Stamps the generation number and cumulative duration.
    pub(crate) fn with_lineage(mut self, generation: usize, total_duration: Duration) -> Self {
        self.stats.generation = generation;
        self.stats.total_duration = total_duration;
        self
    }

    /// Sorts by descending fitness. Stable: ties keep their current order.
    /// NaN scores rank below every number.
    pub fn sort_by_fitness(&mut self) {
        self.individuals
            .sort_by(|a, b| sort_key(b.fitness).total_cmp(&sort_key(a.fitness)));
    }

    /// Sorts by ascending rank. Stable: ties keep their current order.
    pub fn sort_by_rank(&mut self) {
        self.individuals.sort_by_key(|ind| ind.rank);
    }

    /// Increments every individual's rank.
    pub fn add_rank(&mut self) {
        for ind in &mut self.individuals {
            ind.rank += 1;
        }
        if let Some(elite) = self.stats.elite.as_mut() {
            elite.rank += 1;
        }
    }

    /// A new population made of the first `k` individuals (all if `k > len`).
    pub fn first(&self, k: usize) -> Population {
        let k = k.min(self.len());
        Self::from_individuals(self.individuals[..k].to_vec())
    }

    /// A new population made of the last `k` individuals (all if `k > len`).
    pub fn last(&self, k: usize) -> Population {
        let k = k.min(self.len());
        Self::from_individuals(self.individuals[self.len() - k..].to_vec())
    }

    /// Individuals with distinct chromosomes, first occurrence kept.
    pub fn unique(&self) -> Vec<Individual> {
        let mut seen = HashSet::new();
        self.individuals
            .iter()
            .filter(|ind| seen.insert(ind.chromosome.bases()))
            .cloned()
            .collect()
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn into_individuals(self) -> Vec<Individual> {
        self.individuals
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual> {
        self.individuals.iter()
    }

    pub fn stats(&self) -> &PopulationStats {
        &self.stats
    }

    pub fn elite(&self) -> Option<&Individual> {
        self.stats.elite.as_ref()
    }

    pub fn total_fitness(&self) -> f64 {
        self.stats.total_fitness
    }

    pub fn generation(&self) -> usize {
        self.stats.generation
    }

    pub fn total_duration(&self) -> Duration {
        self.stats.total_duration
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Individual;
    type IntoIter = std::slice::Iter<'a, Individual>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}

fn sort_key(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}
