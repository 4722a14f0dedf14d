//! Termination conditions.
//!
//! The engine asks its termination after every generation (never after
//! generation 0). [`Termination::end`] returns the condition that fired, or
//! `None` to keep evolving.

use crate::gene::Population;
use std::mem;
use std::time::Duration;

/// Stopping condition of a run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Termination {
    /// Stops once the generation number reaches `K`.
    Generation(usize),

    /// Stops once total fitness has stayed unchanged for `K` consecutive
    /// checks.
    Improvement(Improvement),

    /// Stops as soon as any individual's fitness reaches the threshold.
    Fitness(f64),

    /// Stops once the cumulative duration of all generations reaches the limit.
    Duration(Duration),

    /// Fires with the first listed condition that fires.
    Multi(Vec<Termination>),
}

impl Termination {
    /// Improvement termination with `K = 1`.
    pub fn improvement() -> Self {
        Termination::Improvement(Improvement::new(1))
    }

    /// Checks `population` against the condition.
    ///
    /// Returns the condition that fired: `self` for simple conditions, the
    /// first firing list member for [`Termination::Multi`]. A nested `Multi`
    /// member is returned whole.
    pub fn end(&mut self, population: &Population) -> Option<&Termination> {
        let fired = match self {
            Termination::Generation(k) => population.generation() >= *k,
            Termination::Improvement(state) => state.observe(population.total_fitness()),
            Termination::Fitness(threshold) => population.iter().any(|i| i.fitness >= *threshold),
            Termination::Duration(max) => population.total_duration() >= *max,
            Termination::Multi(terminations) => {
                let i = terminations
                    .iter_mut()
                    .position(|t| t.end(population).is_some())?;
                return terminations.get(i);
            }
        };
        fired.then_some(&*self)
    }

    /// True when both conditions are the same kind, ignoring parameters.
    pub fn same_kind(&self, other: &Termination) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// Private state of [`Termination::Improvement`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Improvement {
    k: usize,
    previous: Option<f64>,
    stale: usize,
}

impl Improvement {
    /// Stops after `k` unchanged checks. `k == 0` behaves like 1.
    pub fn new(k: usize) -> Self {
        Self {
            k: k.max(1),
            previous: None,
            stale: 0,
        }
    }

    pub fn k(&self) -> usize {
        self.k
    }

    fn observe(&mut self, total_fitness: f64) -> bool {
        if self.previous == Some(total_fitness) {
            self.stale += 1;
        } else {
            self.stale = 0;
        }
        self.previous = Some(total_fitness);
        self.stale >= self.k
    }
}
