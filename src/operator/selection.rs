//! Selection strategies.
//!
//! Selection picks the parents that feed crossover. Every strategy reads the
//! current population without modifying it and returns a reference into it.
//!
//! # References
//!
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"

use crate::error::OperatorError;
use crate::gene::{Individual, Population};
use crate::random::RandomExt;
use rand::Rng;

/// Selection strategy for choosing one parent.
///
/// All strategies assume **maximization** (higher fitness = better).
///
/// # Examples
///
/// ```
/// use u_galgo::operator::{MultiSelection, Selection};
///
/// // Tournament with 3 fighters
/// let sel = Selection::Tournament(3);
///
/// // Roulette half of the time, tournament otherwise
/// let sel = Selection::Multi(
///     MultiSelection::new()
///         .with(0.5, Selection::Roulette)
///         .otherwise(Selection::Tournament(3)),
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Fitness-proportionate (roulette wheel) selection.
    ///
    /// Draws `r` in `[0, total_fitness)` and returns the first individual
    /// whose cumulative fitness reaches `r`. With a total fitness of zero the
    /// first individual is always returned.
    ///
    /// # Complexity
    /// O(n) per selection (linear scan)
    Roulette,

    /// Tournament selection: draw `k` indices with repetition, return the
    /// fittest of them (lowest drawn index wins ties).
    ///
    /// Fails when `k == 0`.
    ///
    /// # Complexity
    /// O(k log k) per selection
    Tournament(usize),

    /// Always returns the population's cached elite.
    Elite,

    /// Probabilistic chain with a mandatory fallback.
    Multi(MultiSelection),
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects one individual from `population`.
    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        population: &'a Population,
        rng: &mut R,
    ) -> Result<&'a Individual, OperatorError> {
        match self {
            Selection::Roulette => roulette(population, rng),
            Selection::Tournament(k) => tournament(population, *k, rng),
            Selection::Elite => population.elite().ok_or(OperatorError::EmptyPopulation {
                operator: "elite selection",
            }),
            Selection::Multi(multi) => multi.select(population, rng),
        }
    }
}

/// Ordered list of `(rate, selection)` pairs plus a default.
///
/// Pairs are tried in order; the first whose rate fires is used. When none
/// fires, the default is used. Selecting without a default fails with
/// [`OperatorError::MissingDefault`] whenever no pair fires.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiSelection {
    chain: Vec<(f64, Selection)>,
    default: Option<Box<Selection>>,
}

impl MultiSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a selection tried with probability `rate`.
    pub fn with(mut self, rate: f64, selection: Selection) -> Self {
        self.chain.push((rate, selection));
        self
    }

    /// Sets the fallback used when no chained selection fires.
    pub fn otherwise(mut self, selection: Selection) -> Self {
        self.default = Some(Box::new(selection));
        self
    }

    pub fn select<'a, R: Rng + ?Sized>(
        &self,
        population: &'a Population,
        rng: &mut R,
    ) -> Result<&'a Individual, OperatorError> {
        for (rate, selection) in &self.chain {
            if rng.peek(*rate) {
                return selection.select(population, rng);
            }
        }
        match &self.default {
            Some(selection) => selection.select(population, rng),
            None => Err(OperatorError::MissingDefault {
                operator: "multi selection",
            }),
        }
    }
}

fn roulette<'a, R: Rng + ?Sized>(
    population: &'a Population,
    rng: &mut R,
) -> Result<&'a Individual, OperatorError> {
    let individuals = population.individuals();
    let last = individuals.last().ok_or(OperatorError::EmptyPopulation {
        operator: "roulette selection",
    })?;

    let threshold = rng.percent() * population.total_fitness();
    let mut cumulative = 0.0;
    for ind in individuals {
        cumulative += ind.fitness;
        if cumulative >= threshold {
            return Ok(ind);
        }
    }

    Ok(last) // floating-point fallback
}

fn tournament<'a, R: Rng + ?Sized>(
    population: &'a Population,
    k: usize,
    rng: &mut R,
) -> Result<&'a Individual, OperatorError> {
    if k == 0 {
        return Err(OperatorError::NoFighters);
    }
    let individuals = population.individuals();
    if individuals.is_empty() {
        return Err(OperatorError::EmptyPopulation {
            operator: "tournament selection",
        });
    }

    let fighters = rng.ordered_ints(0, individuals.len(), k);
    let mut best = &individuals[fighters[0]];
    for &idx in &fighters[1..] {
        if individuals[idx].fitness > best.fitness {
            best = &individuals[idx];
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::testing::{ind, pop};
    use crate::random::create_rng;

    fn position(population: &Population, selected: &Individual) -> usize {
        population
            .iter()
            .position(|i| std::ptr::eq(i, selected))
            .expect("selected individual belongs to the population")
    }

    fn ranked_pop() -> Population {
        Population::from_individuals(vec![
            ind(0.1, 1),
            ind(0.5, 5),
            ind(0.6, 6),
            ind(0.9, 9),
        ])
    }

    #[test]
    fn test_tournament_favors_best() {
        let p = pop(&[1.0, 5.0, 10.0, 8.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        let n = 10000;
        for _ in 0..n {
            let selected = Selection::Tournament(4).select(&p, &mut rng).unwrap();
            counts[position(&p, selected)] += 1;
        }
        // Index 2 (fitness=10.0) should dominate
        let best_count = counts[2];
        assert!(
            best_count > 6000,
            "expected best to be selected >60% of the time, got {best_count}/{n}"
        );
    }

    #[test]
    fn test_tournament_size_1_is_random() {
        let p = pop(&[10.0, 5.0, 1.0, 8.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let selected = Selection::Tournament(1).select(&p, &mut rng).unwrap();
            counts[position(&p, selected)] += 1;
        }
        for &c in &counts {
            assert!(c > 1500, "expected uniform, got counts: {counts:?}");
        }
    }

    #[test]
    fn test_tournament_tie_goes_to_lowest_index() {
        let p = pop(&[0.5; 8]);
        for seed in 0..20 {
            let mut rng = create_rng(seed);
            let selected = Selection::Tournament(3).select(&p, &mut rng).unwrap();
            let lowest = create_rng(seed).ordered_ints(0, p.len(), 3)[0];
            assert_eq!(position(&p, selected), lowest);
        }
    }

    #[test]
    fn test_tournament_zero_fighters() {
        let p = pop(&[1.0, 2.0]);
        let mut rng = create_rng(42);
        assert_eq!(
            Selection::Tournament(0).select(&p, &mut rng),
            Err(OperatorError::NoFighters)
        );
    }

    #[test]
    fn test_roulette_favors_best() {
        let p = pop(&[1.0, 50.0, 100.0, 20.0]);
        let mut rng = create_rng(42);

        let mut counts = [0u32; 4];
        for _ in 0..10000 {
            let selected = Selection::Roulette.select(&p, &mut rng).unwrap();
            counts[position(&p, selected)] += 1;
        }
        let best_count = counts[2];
        let worst_count = counts[0];
        assert!(
            best_count > worst_count,
            "best should be selected more often: best={best_count}, worst={worst_count}"
        );
    }

    #[test]
    fn test_roulette_zero_total_returns_first() {
        let p = pop(&[0.0, 0.0, 0.0]);
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let selected = Selection::Roulette.select(&p, &mut rng).unwrap();
            assert_eq!(position(&p, selected), 0);
        }
    }

    #[test]
    fn test_roulette_partial_total() {
        // Cumulative fitness reaches 0.5 by the second individual
        let p = ranked_pop();
        let mut rng = create_rng(42);
        for _ in 0..100 {
            let selected = Selection::Roulette.select(&p, &mut rng).unwrap();
            assert!(position(&p, selected) <= 3);
        }
    }

    #[test]
    fn test_elite_selection() {
        let p = ranked_pop();
        let mut rng = create_rng(42);
        let selected = Selection::Elite.select(&p, &mut rng).unwrap();
        assert_eq!(selected.fitness, 0.9);
        assert_eq!(selected.rank, 9);
    }

    #[test]
    fn test_empty_population() {
        let p = pop(&[]);
        let mut rng = create_rng(42);
        for sel in [
            Selection::Roulette,
            Selection::Tournament(3),
            Selection::Elite,
        ] {
            assert!(
                matches!(
                    sel.select(&p, &mut rng),
                    Err(OperatorError::EmptyPopulation { .. })
                ),
                "{sel:?} should fail on an empty population"
            );
        }
    }

    #[test]
    fn test_multi_falls_back_to_default_once() {
        let p = ranked_pop();
        let multi = Selection::Multi(
            MultiSelection::new()
                .with(0.0, Selection::Roulette)
                .with(0.0, Selection::Tournament(2))
                .otherwise(Selection::Tournament(3)),
        );
        for seed in 0..50 {
            let mut rng = create_rng(seed);
            let selected = position(&p, multi.select(&p, &mut rng).unwrap());

            // Two rate checks, then a single tournament
            let mut replay = create_rng(seed);
            replay.percent();
            replay.percent();
            let expected = position(&p, Selection::Tournament(3).select(&p, &mut replay).unwrap());

            assert_eq!(selected, expected);
            assert_eq!(rng.percent(), replay.percent());
        }
    }

    #[test]
    fn test_multi_default_errors_propagate() {
        let p = ranked_pop();
        let mut rng = create_rng(42);
        let multi = MultiSelection::new()
            .with(0.0, Selection::Elite)
            .otherwise(Selection::Tournament(0));
        assert_eq!(multi.select(&p, &mut rng), Err(OperatorError::NoFighters));
    }

    #[test]
    fn test_multi_first_firing_wins() {
        let p = ranked_pop();
        let mut rng = create_rng(42);
        let multi = MultiSelection::new()
            .with(1.0, Selection::Elite)
            .otherwise(Selection::Tournament(0));
        for _ in 0..50 {
            assert_eq!(multi.select(&p, &mut rng).unwrap().fitness, 0.9);
        }
    }

    #[test]
    fn test_multi_without_default() {
        let p = ranked_pop();
        let mut rng = create_rng(42);
        let multi = MultiSelection::new().with(0.0, Selection::Elite);
        assert_eq!(
            multi.select(&p, &mut rng),
            Err(OperatorError::MissingDefault {
                operator: "multi selection"
            })
        );
    }
}
