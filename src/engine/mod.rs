//! Evolutionary engine.
//!
//! - [`Engine`]: operator configuration and the generational loop
//! - [`EngineConfig`]: seed and offspring production [`Strategy`]
//! - [`Solution`]: best populations of a run and the condition that ended it
//!
//! Two offspring production strategies are available. [`Strategy::Pipeline`]
//! streams chromosomes through concurrent selection, crossover, mutation, and
//! fitness stages over bounded channels. [`Strategy::Batch`] splits the
//! offspring into contiguous batches bred in parallel with rayon (see
//! [`batch_ranges`]), then scores them sequentially.
//!
//! Both are deterministic for a seeded [`EngineConfig`].

mod batch;
mod config;
mod pipeline;
mod runner;
mod solution;

pub use batch::batch_ranges;
pub use config::{EngineConfig, Strategy};
pub use runner::{Engine, OnGenerationFn};
pub use solution::Solution;
