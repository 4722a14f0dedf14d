//! Generational genetic algorithm engine.
//!
//! Candidate solutions are fixed-length chromosomes of bounded integers
//! ([`gene::Chromosome`]). Clients supply a fitness function and pick one
//! strategy per operator family; the [`engine::Engine`] evolves a population
//! until a termination condition fires.
//!
//! - **[`gene`]**: chromosomes, individuals, populations, initializers
//! - **[`operator`]**: selection, crossover, mutation, survivor, and
//!   termination strategies, each with a probabilistic `Multi` combinator
//! - **[`engine`]**: the generational loop, its concurrent breeding pipeline,
//!   and the batch alternative
//! - **[`random`]**: seedable generators and the random primitives every
//!   operator draws from
//! - **[`error`]**: configuration, initialization, and operator errors
//!
//! # Example
//!
//! ```
//! use u_galgo::engine::{Engine, EngineConfig};
//! use u_galgo::gene::{Chromosome, Initializer};
//! use u_galgo::operator::{CrossOver, Mutation, Selection, Survivor, Termination};
//!
//! let target = [1u8, 0, 1, 1, 0, 1, 0, 0];
//! let solution = Engine::new()
//!     .with_initializer(Initializer::Random { max_value: 1 })
//!     .with_selection(Selection::Roulette)
//!     .with_crossover(CrossOver::uniform())
//!     .with_mutation(Mutation::Unique)
//!     .with_survivor(Survivor::Elite)
//!     .with_termination(Termination::Fitness(1.0))
//!     .with_fitness(move |c: &Chromosome| {
//!         let hits = c.bases().iter().zip(target).filter(|&(&b, t)| b == t).count();
//!         hits as f64 / target.len() as f64
//!     })
//!     .with_config(EngineConfig::default().with_seed(7))
//!     .run(50, 50, target.len())
//!     .unwrap();
//!
//! assert_eq!(solution.elite().unwrap().chromosome.bases(), &target);
//! assert!(solution.stopped_by(&Termination::Fitness(1.0)));
//! ```
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

pub mod engine;
pub mod error;
pub mod gene;
pub mod operator;
pub mod random;

pub use error::{Error, Result};
