//! Genetic operators.
//!
//! Each operator family is an enum of concrete strategies plus a `Multi`
//! variant that chains other strategies of the same family with firing
//! probabilities. Multi combinators nest arbitrarily.
//!
//! | Family | Method | Multi shape |
//! |---|---|---|
//! | [`Selection`] | `select(population)` | first firing pair, else mandatory default |
//! | [`CrossOver`] | `mate(c1, c2)` | every firing pair (or first only) |
//! | [`Mutation`] | `mutate(c)` | every firing pair (or first only) |
//! | [`Survivor`] | `survive(parents, offspring)` | first firing pair, else mandatory default |
//! | [`Termination`] | `end(population)` | first firing member |
//!
//! All randomness comes from the generator passed to each call.
//!
//! # References
//!
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Eiben & Smith (2015), *Introduction to Evolutionary Computing*

mod crossover;
mod mutation;
mod selection;
mod survivor;
mod termination;

pub use crossover::{CrossOver, MultiCrossOver};
pub use mutation::{MultiMutation, Mutation};
pub use selection::{MultiSelection, Selection};
pub use survivor::{MultiSurvivor, Survivor};
pub use termination::{Improvement, Termination};
