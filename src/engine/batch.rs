//! Batch breeding.
//!
//! The offspring pairs of one generation are split into contiguous batches.
//! Each batch runs selection, crossover, and mutation end-to-end on its own
//! rayon task with its own forked generator. A sequential pass then scores the
//! children in batch order.

use super::runner::Operators;
use crate::error::{OperatorError, Result};
use crate::gene::{Chromosome, Individual, Population};
use crate::random::fork;
use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;
use std::ops::Range;

/// Splits `0..total` into contiguous ranges of `round(total / n)` items.
///
/// The last range is shorter when `total` is not a multiple of the batch
/// size, and there may be fewer or more than `n` ranges.
///
/// ```
/// use u_galgo::engine::batch_ranges;
///
/// assert_eq!(batch_ranges(15, 2), vec![0..8, 8..15]);
/// assert_eq!(batch_ranges(15, 4), vec![0..4, 4..8, 8..12, 12..15]);
/// ```
pub fn batch_ranges(total: usize, n: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let n = n.max(1);
    // Round half up, never below one item
    let batch = ((total + n / 2) / n).max(1);
    (0..total)
        .step_by(batch)
        .map(|from| from..(from + batch).min(total))
        .collect()
}

/// Breeds `size` scored offspring from `parents`.
///
/// `size` must be even.
pub(crate) fn offspring<R: Rng + ?Sized>(
    parents: &Population,
    size: usize,
    ops: &Operators<'_>,
    batches: usize,
    rng: &mut R,
) -> Result<Population> {
    let ranges = batch_ranges(size / 2, batches);
    let rngs: Vec<StdRng> = ranges.iter().map(|_| fork(&mut *rng)).collect();

    let children = ranges
        .into_par_iter()
        .zip(rngs)
        .map(|(pairs, mut rng)| breed(parents, pairs.len(), ops, &mut rng))
        .collect::<std::result::Result<Vec<_>, OperatorError>>()?;

    let mut id_rng = fork(rng);
    let individuals = children
        .into_iter()
        .flatten()
        .map(|code| {
            let score = (ops.fitness)(&code);
            Individual::new(code, score, &mut id_rng)
        })
        .collect();
    Ok(Population::from_individuals(individuals))
}

/// Selection, crossover, and mutation for `pairs` offspring pairs.
fn breed(
    parents: &Population,
    pairs: usize,
    ops: &Operators<'_>,
    rng: &mut StdRng,
) -> std::result::Result<Vec<Chromosome>, OperatorError> {
    let mut children = Vec::with_capacity(2 * pairs);
    for _ in 0..pairs {
        let a = ops.selection.select(parents, rng)?;
        let b = ops.selection.select(parents, rng)?;
        let (c1, c2) = ops.crossover.mate(&a.chromosome, &b.chromosome, rng);
        for child in [c1, c2] {
            children.push(match ops.mutation {
                Some(mutation) => mutation.mutate(&child, rng),
                None => child,
            });
        }
    }
    Ok(children)
}
