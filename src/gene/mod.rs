//! Genetic data model.
//!
//! - [`Chromosome`]: a fixed-length sequence of bounded bases
//! - [`Individual`]: a chromosome with its fitness and lineage rank
//! - [`Population`]: an ordered set of individuals with cached aggregate
//!   statistics ([`PopulationStats`])
//! - [`Initializer`]: builds the chromosomes of generation 0
//!
//! Fitness is maximized: the elite is the individual with the highest fitness.

mod chromosome;
mod initializer;
mod population;

pub use chromosome::{Base, Chromosome};
pub use initializer::Initializer;
pub use population::{FitnessFn, Individual, Population, PopulationStats};

#[cfg(test)]
pub(crate) use population::tests as testing;
