//! Engine configuration.
//!
//! [`EngineConfig`] holds the run parameters that are not genetic operators:
//! seeding and how each generation's offspring are produced.

use crate::error::ConfigError;

/// How the engine produces one generation's offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Strategy {
    /// Four concurrent stages (selection, crossover, mutation, fitness)
    /// connected by bounded channels.
    #[default]
    Pipeline,

    /// Contiguous offspring batches processed end-to-end in parallel, followed
    /// by a sequential fitness pass.
    Batch,
}

/// Configuration for the evolutionary engine.
///
/// # Defaults
///
/// ```
/// use u_galgo::engine::{EngineConfig, Strategy};
///
/// let config = EngineConfig::default();
/// assert_eq!(config.strategy, Strategy::Pipeline);
/// assert_eq!(config.channel_capacity, 32);
/// assert!(config.seed.is_none());
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_galgo::engine::{EngineConfig, Strategy};
///
/// let config = EngineConfig::default()
///     .with_seed(42)
///     .with_strategy(Strategy::Batch)
///     .with_batches(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Seed of the master generator.
    ///
    /// `None` seeds from OS entropy; runs are then not reproducible.
    pub seed: Option<u64>,

    /// Offspring production strategy.
    pub strategy: Strategy,

    /// Capacity of every bounded channel between pipeline stages.
    ///
    /// Only used by [`Strategy::Pipeline`].
    pub channel_capacity: usize,

    /// Number of contiguous offspring batches processed in parallel.
    ///
    /// Only used by [`Strategy::Batch`].
    pub batches: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            strategy: Strategy::default(),
            channel_capacity: 32,
            batches: 4,
        }
    }
}

impl EngineConfig {
    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the offspring production strategy.
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the pipeline channel capacity.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Sets the batch count.
    pub fn with_batches(mut self, batches: usize) -> Self {
        self.batches = batches;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "channel_capacity",
                reason: "must be at least 1",
            });
        }
        if self.batches == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "batches",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}
