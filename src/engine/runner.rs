//! Generational loop.
//!
//! [`Engine`] validates its operators, builds generation 0, then repeatedly
//! breeds offspring, merges them through the survivor strategy, and asks the
//! termination condition whether to stop.

use super::config::{EngineConfig, Strategy};
use super::solution::Solution;
use super::{batch, pipeline};
use crate::error::{ConfigError, Result};
use crate::gene::{Chromosome, FitnessFn, Initializer, Population};
use crate::operator::{CrossOver, Mutation, Selection, Survivor, Termination};
use crate::random::create_rng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Callback invoked on the caller's thread after every generation, including
/// generation 0.
pub type OnGenerationFn = dyn Fn(&Population) + Send + Sync;

/// Borrowed view of the operators a generation needs.
#[derive(Clone, Copy)]
pub(crate) struct Operators<'a> {
    pub selection: &'a Selection,
    pub crossover: &'a CrossOver,
    pub mutation: Option<&'a Mutation>,
    pub fitness: &'a FitnessFn,
}

/// Evolutionary engine.
///
/// Every operator except mutation is required; a missing one fails
/// [`run`](Engine::run) with [`ConfigError::MissingOperator`] before any
/// population is built. Without a mutation, children pass through unchanged.
///
/// # Examples
///
/// ```
/// use u_galgo::engine::{Engine, EngineConfig};
/// use u_galgo::gene::{Chromosome, Initializer};
/// use u_galgo::operator::{CrossOver, Mutation, Selection, Survivor, Termination};
///
/// // OneMax over 16 bits
/// let engine = Engine::new()
///     .with_initializer(Initializer::Random { max_value: 1 })
///     .with_selection(Selection::Tournament(3))
///     .with_crossover(CrossOver::uniform())
///     .with_mutation(Mutation::Unique)
///     .with_survivor(Survivor::Elite)
///     .with_termination(Termination::Generation(30))
///     .with_fitness(|c: &Chromosome| c.bases().iter().map(|&b| b as f64).sum())
///     .with_config(EngineConfig::default().with_seed(42));
///
/// let solution = engine.run(20, 20, 16).unwrap();
/// assert_eq!(solution.generations(), 30);
/// assert!(solution.elite().unwrap().fitness >= 11.0);
/// ```
#[derive(Default)]
pub struct Engine {
    initializer: Option<Initializer>,
    selection: Option<Selection>,
    crossover: Option<CrossOver>,
    mutation: Option<Mutation>,
    survivor: Option<Survivor>,
    termination: Option<Termination>,
    fitness: Option<Box<FitnessFn>>,
    on_generation: Option<Box<OnGenerationFn>>,
    config: EngineConfig,
}

impl Engine {
    /// An engine with no operators and the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initializer(mut self, initializer: Initializer) -> Self {
        self.initializer = Some(initializer);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn with_crossover(mut self, crossover: CrossOver) -> Self {
        self.crossover = Some(crossover);
        self
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutation = Some(mutation);
        self
    }

    pub fn with_survivor(mut self, survivor: Survivor) -> Self {
        self.survivor = Some(survivor);
        self
    }

    /// Sets the stopping condition.
    ///
    /// Each run works on its own copy, so stateful conditions such as
    /// [`Termination::Improvement`] start fresh every run.
    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = Some(termination);
        self
    }

    /// Sets the fitness function. Higher is better.
    pub fn with_fitness<F>(mut self, fitness: F) -> Self
    where
        F: Fn(&Chromosome) -> f64 + Send + Sync + 'static,
    {
        self.fitness = Some(Box::new(fitness));
        self
    }

    /// Sets a callback invoked after every generation, including generation 0.
    pub fn with_on_generation<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Population) + Send + Sync + 'static,
    {
        self.on_generation = Some(Box::new(callback));
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Checks that every required operator is set and the configuration is
    /// valid.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.parts().map(|_| ())
    }

    /// Evolves a population until the termination condition fires.
    ///
    /// `population_size` and `offspring_size` are rounded up to even values.
    /// A zero `population_size` becomes 2 and a zero `offspring_size` becomes
    /// `population_size`.
    ///
    /// # Errors
    ///
    /// - [`Error::Config`](crate::Error::Config) when validation fails
    /// - [`Error::Init`](crate::Error::Init) when the initializer rejects
    ///   `chromosome_size`
    /// - [`Error::Operator`](crate::Error::Operator) when a selection or
    ///   survivor strategy fails mid-run
    pub fn run(
        &self,
        population_size: usize,
        offspring_size: usize,
        chromosome_size: usize,
    ) -> Result<Solution> {
        let (initializer, ops, survivor, termination) = self.parts()?;
        let mut termination = termination.clone();

        let population_size = match population_size {
            0 => 2,
            n => even(n),
        };
        let offspring_size = match offspring_size {
            0 => population_size,
            n => even(n),
        };

        let mut rng = match self.config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        info!(
            population_size,
            offspring_size,
            chromosome_size,
            strategy = ?self.config.strategy,
            "starting evolution"
        );

        let mut population =
            Population::init(population_size, chromosome_size, initializer, ops.fitness, &mut rng)?;
        self.notify(&population);

        let mut best_elite = population.clone();
        let mut best_total = population.clone();

        loop {
            population = self
                .next_generation(&population, offspring_size, &ops, survivor, &mut rng)
                .inspect_err(|err| {
                    warn!(generation = population.generation() + 1, %err, "generation aborted");
                })?;

            debug!(
                generation = population.generation(),
                total_fitness = population.total_fitness(),
                elite_fitness = elite_fitness(&population),
                duration = ?population.total_duration(),
                "generation complete"
            );
            self.notify(&population);

            if elite_fitness(&population) > elite_fitness(&best_elite) {
                best_elite = population.clone();
            }
            if population.total_fitness() > best_total.total_fitness() {
                best_total = population.clone();
            }

            if let Some(fired) = termination.end(&population).cloned() {
                info!(
                    generation = population.generation(),
                    termination = ?fired,
                    best_fitness = elite_fitness(&best_elite),
                    "evolution terminated"
                );
                return Ok(Solution {
                    best_elite,
                    best_total_fitness: best_total,
                    last: population,
                    termination: fired,
                });
            }
        }
    }

    /// Required operators, or the first missing one.
    #[allow(clippy::type_complexity)]
    fn parts(
        &self,
    ) -> std::result::Result<(&Initializer, Operators<'_>, &Survivor, &Termination), ConfigError>
    {
        let initializer = required(&self.initializer, "initializer")?;
        let selection = required(&self.selection, "selection")?;
        let crossover = required(&self.crossover, "crossover")?;
        let survivor = required(&self.survivor, "survivor")?;
        let termination = required(&self.termination, "termination")?;
        let fitness = self
            .fitness
            .as_deref()
            .ok_or(ConfigError::MissingOperator("fitness function"))?;
        self.config.validate()?;

        let ops = Operators {
            selection,
            crossover,
            mutation: self.mutation.as_ref(),
            fitness,
        };
        Ok((initializer, ops, survivor, termination))
    }

    fn next_generation(
        &self,
        parents: &Population,
        offspring_size: usize,
        ops: &Operators<'_>,
        survivor: &Survivor,
        rng: &mut StdRng,
    ) -> Result<Population> {
        let start = Instant::now();
        let offspring = match self.config.strategy {
            Strategy::Pipeline => pipeline::offspring(
                parents,
                offspring_size,
                ops,
                self.config.channel_capacity,
                rng,
            )?,
            Strategy::Batch => {
                batch::offspring(parents, offspring_size, ops, self.config.batches, rng)?
            }
        };
        let next = survivor.survive(parents, &offspring, rng)?;
        Ok(next.with_lineage(
            parents.generation() + 1,
            parents.total_duration() + start.elapsed(),
        ))
    }

    fn notify(&self, population: &Population) {
        if let Some(callback) = &self.on_generation {
            callback(population);
        }
    }
}

fn required<'a, T>(
    slot: &'a Option<T>,
    name: &'static str,
) -> std::result::Result<&'a T, ConfigError> {
    slot.as_ref().ok_or(ConfigError::MissingOperator(name))
}

fn even(n: usize) -> usize {
    n + n % 2
}

fn elite_fitness(population: &Population) -> f64 {
    population.elite().map_or(f64::NEG_INFINITY, |e| e.fitness)
}
