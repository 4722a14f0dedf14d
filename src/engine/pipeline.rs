//! Concurrent breeding pipeline.
//!
//! One generation's offspring flow through four scoped worker threads joined
//! by bounded FIFO channels:
//!
//! ```text
//! selection ──codes──▶ crossover ──codes──▶ mutation ──codes──▶ fitness ──individuals──▶ assembly
//!     │                                                                                    ▲
//!     └──────────────────────────────── errors ────────────────────────────────────────────┘
//! ```
//!
//! Selection emits two parent codes per iteration and crossover consumes them
//! two at a time, so pairs stay aligned. Assembly runs on the caller's thread
//! and races the individual channel against the error channel; on the first
//! error it returns, dropping its receivers, and every upstream worker exits
//! on its next failed send.
//!
//! Each worker owns a generator forked from the engine's master generator, so
//! no generator is shared across threads.

use super::runner::Operators;
use crate::error::{Error, OperatorError, Result};
use crate::gene::{Chromosome, Individual, Population};
use crate::random::fork;
use crossbeam_channel::{bounded, select, Receiver, Sender};
use rand::rngs::StdRng;
use rand::Rng;
use std::thread;
use tracing::trace;

/// Breeds `size` scored offspring from `parents`.
///
/// `size` must be even.
pub(crate) fn offspring<R: Rng + ?Sized>(
    parents: &Population,
    size: usize,
    ops: &Operators<'_>,
    capacity: usize,
    rng: &mut R,
) -> Result<Population> {
    let select_rng = fork(rng);
    let mate_rng = fork(rng);
    let mutate_rng = fork(rng);
    let id_rng = fork(rng);

    thread::scope(|s| {
        let (parent_tx, parent_rx) = bounded(capacity);
        let (child_tx, child_rx) = bounded(capacity);
        let (mutant_tx, mutant_rx) = bounded(capacity);
        let (scored_tx, scored_rx) = bounded(capacity);
        // Held here so the channel stays open while assembly runs
        let (err_tx, err_rx) = bounded(1);

        let selection_err_tx = err_tx.clone();
        s.spawn(move || {
            selection_stage(parents, size / 2, ops, parent_tx, selection_err_tx, select_rng)
        });
        s.spawn(move || crossover_stage(ops, parent_rx, child_tx, mate_rng));
        s.spawn(move || mutation_stage(ops, child_rx, mutant_tx, mutate_rng));
        s.spawn(move || fitness_stage(ops, mutant_rx, scored_tx, id_rng));

        let result = assemble(size, scored_rx, err_rx);
        drop(err_tx);
        result
    })
}

fn selection_stage(
    parents: &Population,
    pairs: usize,
    ops: &Operators<'_>,
    out: Sender<Chromosome>,
    errors: Sender<OperatorError>,
    mut rng: StdRng,
) {
    for _ in 0..pairs {
        let (a, b) = match select_pair(parents, ops, &mut rng) {
            Ok(pair) => pair,
            Err(err) => {
                let _ = errors.send(err);
                trace!("selection worker stopped on error");
                return;
            }
        };
        if out.send(a.chromosome.clone()).is_err() || out.send(b.chromosome.clone()).is_err() {
            break;
        }
    }
    trace!("selection worker exited");
}

fn select_pair<'p>(
    parents: &'p Population,
    ops: &Operators<'_>,
    rng: &mut StdRng,
) -> std::result::Result<(&'p Individual, &'p Individual), OperatorError> {
    let a = ops.selection.select(parents, rng)?;
    let b = ops.selection.select(parents, rng)?;
    Ok((a, b))
}

fn crossover_stage(
    ops: &Operators<'_>,
    input: Receiver<Chromosome>,
    out: Sender<Chromosome>,
    mut rng: StdRng,
) {
    while let (Ok(a), Ok(b)) = (input.recv(), input.recv()) {
        let (c1, c2) = ops.crossover.mate(&a, &b, &mut rng);
        if out.send(c1).is_err() || out.send(c2).is_err() {
            break;
        }
    }
    trace!("crossover worker exited");
}

fn mutation_stage(
    ops: &Operators<'_>,
    input: Receiver<Chromosome>,
    out: Sender<Chromosome>,
    mut rng: StdRng,
) {
    for code in input {
        let code = match ops.mutation {
            Some(mutation) => mutation.mutate(&code, &mut rng),
            None => code,
        };
        if out.send(code).is_err() {
            break;
        }
    }
    trace!("mutation worker exited");
}

fn fitness_stage(
    ops: &Operators<'_>,
    input: Receiver<Chromosome>,
    out: Sender<Individual>,
    mut rng: StdRng,
) {
    for code in input {
        let score = (ops.fitness)(&code);
        if out.send(Individual::new(code, score, &mut rng)).is_err() {
            break;
        }
    }
    trace!("fitness worker exited");
}

/// Collects exactly `size` individuals, or the first operator error.
fn assemble(
    size: usize,
    scored: Receiver<Individual>,
    errors: Receiver<OperatorError>,
) -> Result<Population> {
    let mut individuals = Vec::with_capacity(size);
    while individuals.len() < size {
        select! {
            recv(scored) -> msg => match msg {
                Ok(ind) => individuals.push(ind),
                // An error is always sent before the stages downstream hang up
                Err(_) => {
                    return Err(match errors.try_recv() {
                        Ok(err) => err.into(),
                        Err(_) => Error::Pipeline(format!(
                            "fitness stage closed after {} of {size} offspring",
                            individuals.len()
                        )),
                    });
                }
            },
            recv(errors) -> msg => {
                if let Ok(err) = msg {
                    return Err(err.into());
                }
            }
        }
    }
    Ok(Population::from_individuals(individuals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{FitnessFn, Initializer};
    use crate::operator::{CrossOver, Mutation, Selection};
    use crate::random::create_rng;

    fn ones(c: &Chromosome) -> f64 {
        c.bases().iter().map(|&b| b as f64).sum()
    }

    fn parents(rng: &mut StdRng) -> Population {
        let fitness: &FitnessFn = &ones;
        Population::init(10, 12, &Initializer::Random { max_value: 1 }, fitness, rng).unwrap()
    }

    fn ops<'a>(selection: &'a Selection, mutation: Option<&'a Mutation>) -> Operators<'a> {
        static CROSSOVER: CrossOver = CrossOver::TwoPoints;
        Operators {
            selection,
            crossover: &CROSSOVER,
            mutation,
            fitness: &ones,
        }
    }

    #[test]
    fn test_produces_scored_offspring() {
        let mut rng = create_rng(42);
        let parents = parents(&mut rng);
        let selection = Selection::Tournament(2);
        let mutation = Mutation::Unique;
        for capacity in [1, 3, 32] {
            let pop = offspring(&parents, 24, &ops(&selection, Some(&mutation)), capacity, &mut rng)
                .unwrap();
            assert_eq!(pop.len(), 24);
            for ind in &pop {
                assert_eq!(ind.chromosome.len(), 12);
                assert_eq!(ind.fitness, ones(&ind.chromosome));
                assert_eq!(ind.rank, 0);
            }
        }
    }

    #[test]
    fn test_without_mutation_children_recombine_parents() {
        let mut rng = create_rng(7);
        let parents = parents(&mut rng);
        let selection = Selection::Elite;
        let elite = parents.elite().unwrap().chromosome.clone();
        let pop = offspring(&parents, 8, &ops(&selection, None), 4, &mut rng).unwrap();
        // Mating the elite with itself reproduces it
        for ind in &pop {
            assert_eq!(ind.chromosome, elite);
        }
    }

    #[test]
    fn test_same_seed_same_offspring() {
        let selection = Selection::Roulette;
        let mutation = Mutation::uniform();
        let run = || {
            let mut rng = create_rng(99);
            let parents = parents(&mut rng);
            offspring(&parents, 20, &ops(&selection, Some(&mutation)), 2, &mut rng).unwrap()
        };
        assert_eq!(run().individuals(), run().individuals());
    }

    #[test]
    fn test_selection_error_aborts() {
        let mut rng = create_rng(42);
        let parents = parents(&mut rng);
        let selection = Selection::Tournament(0);
        for capacity in [1, 32] {
            let err = offspring(&parents, 100, &ops(&selection, None), capacity, &mut rng);
            assert_eq!(err.unwrap_err(), Error::Operator(OperatorError::NoFighters));
        }
    }

    #[test]
    fn test_assemble_reports_short_batch() {
        let (tx, scored) = bounded(4);
        let (_err_tx, errors) = bounded::<OperatorError>(1);
        let mut rng = create_rng(1);
        tx.send(Individual::new(Chromosome::new(2, 1), 0.0, &mut rng)).unwrap();
        drop(tx);
        assert!(matches!(
            assemble(2, scored, errors),
            Err(Error::Pipeline(_))
        ));
    }
}
