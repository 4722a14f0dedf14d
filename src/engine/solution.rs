//! Result of an engine run.

use crate::gene::{Individual, Population};
use crate::operator::Termination;

/// What a run produced and why it stopped.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Solution {
    /// Population holding the highest-fitness individual seen during the run.
    pub best_elite: Population,

    /// Population with the highest total fitness seen during the run.
    pub best_total_fitness: Population,

    /// Population of the last generation.
    pub last: Population,

    /// Condition that ended the run.
    pub termination: Termination,
}

impl Solution {
    /// Best individual of the run.
    pub fn elite(&self) -> Option<&Individual> {
        self.best_elite.elite()
    }

    /// Number of generations evolved after generation 0.
    pub fn generations(&self) -> usize {
        self.last.generation()
    }

    /// True when the run stopped on a condition of the same kind as
    /// `termination`, whatever its parameters.
    pub fn stopped_by(&self, termination: &Termination) -> bool {
        self.termination.same_kind(termination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::testing::pop;
    use std::time::Duration;

    fn solution(termination: Termination) -> Solution {
        Solution {
            best_elite: pop(&[0.2, 0.9]),
            best_total_fitness: pop(&[0.6, 0.7]),
            last: pop(&[0.1, 0.3]).with_lineage(12, Duration::ZERO),
            termination,
        }
    }

    #[test]
    fn test_stopped_by() {
        let sol = solution(Termination::improvement());
        assert!(sol.stopped_by(&Termination::improvement()));
        assert!(!sol.stopped_by(&Termination::Generation(12)));
    }

    #[test]
    fn test_accessors() {
        let sol = solution(Termination::Generation(12));
        assert_eq!(sol.elite().map(|e| e.fitness), Some(0.9));
        assert_eq!(sol.generations(), 12);
    }
}
