//! Error types.
//!
//! Failures fall into three classes, each with its own enum:
//!
//! - [`ConfigError`]: the engine is missing a required operator or carries an
//!   out-of-range parameter. Raised before any population exists.
//! - [`InitError`]: an initializer precondition is violated.
//! - [`OperatorError`]: a selection or survivor strategy cannot produce a
//!   result for the population it was handed.
//!
//! [`Error`] wraps all three. Nothing is retried: the engine aborts the run on
//! the first error it observes.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error returned by [`Engine::run`](crate::engine::Engine::run).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("initialization error: {0}")]
    Init(#[from] InitError),

    #[error("operator error: {0}")]
    Operator(#[from] OperatorError),

    /// A pipeline stage hung up before the offspring batch was complete.
    #[error("pipeline error: {0}")]
    Pipeline(String),
}

/// Invalid or incomplete engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    MissingOperator(&'static str),

    #[error("{name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
}

/// Chromosome construction failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("random initializer requires max_value > 0")]
    ZeroMaxValue,

    #[error("permutation initializer requires a non-empty chromosome")]
    EmptyPermutation,

    #[error("permutation of {size} bases exceeds the {max} representable values")]
    PermutationTooLarge { size: usize, max: usize },

    #[error("base {value} at index {index} exceeds max_value {max_value}")]
    BaseOutOfRange {
        index: usize,
        value: u8,
        max_value: u8,
    },
}

/// Runtime failure of a selection or survivor strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    #[error("{operator}: population is empty")]
    EmptyPopulation { operator: &'static str },

    #[error("tournament selection: fighters must be > 0")]
    NoFighters,

    #[error("{operator}: no strategy triggered and no default is set")]
    MissingDefault { operator: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err: Error = ConfigError::MissingOperator("selection").into();
        assert_eq!(err.to_string(), "configuration error: selection must be set");

        let err: Error = InitError::PermutationTooLarge { size: 300, max: 256 }.into();
        assert_eq!(
            err.to_string(),
            "initialization error: permutation of 300 bases exceeds the 256 representable values"
        );

        let err: Error = OperatorError::MissingDefault {
            operator: "multi selection",
        }
        .into();
        assert!(err.to_string().contains("no default"));
    }
}
