//! Crossover operators.
//!
//! A crossover mates two parent chromosomes of equal length into two children
//! of that same length. Parents are never modified; children are built in
//! fresh storage and inherit the first parent's `max_value`.
//!
//! # Value-recombining operators
//!
//! - [`CrossOver::OnePoint`], [`CrossOver::TwoPoints`], [`CrossOver::KPoints`]:
//!   alternate the source parent after every sorted cut point
//! - [`CrossOver::Uniform`]: per-position swap
//!
//! # Order-preserving operators (permutation chromosomes)
//!
//! - [`CrossOver::DavisOrder`] (OX): Davis (1985)
//! - [`CrossOver::UniformOrder`]: OX driven by a random mask
//! - [`CrossOver::PartiallyMatched`] (PMX): Goldberg & Lingle (1985)
//!
//! The order-preserving operators keep each child's multiset of values equal
//! to its template parent's, including chromosomes with repeated values.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman Problem"

use crate::gene::{Base, Chromosome};
use crate::random::RandomExt;
use rand::Rng;

const BASE_VALUES: usize = Base::MAX as usize + 1;

/// Crossover strategy.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossOver {
    /// One random cut point.
    OnePoint,

    /// Two random cut points.
    TwoPoints,

    /// `k` random cut points.
    KPoints(usize),

    /// For each position, keep the parents' alignment with probability
    /// `rate`, otherwise swap the two values between the children.
    Uniform(f64),

    /// Davis' order crossover.
    ///
    /// Copies the slice `[pos1, pos2]` from one parent, then fills the other
    /// positions in chromosome order with the next unused value found by
    /// scanning the other parent from its start.
    DavisOrder,

    /// Order crossover driven by a random mask instead of a contiguous slice.
    UniformOrder,

    /// Partially-matched crossover.
    ///
    /// Copies the other parent's slice `[pos1, pos2)`; outside it, a value
    /// already present in the slice is replaced through the slice mapping
    /// until a free value is reached.
    PartiallyMatched,

    /// Probabilistic chain of crossovers.
    Multi(MultiCrossOver),
}

impl CrossOver {
    /// Uniform crossover with an even 0.5 rate.
    pub fn uniform() -> Self {
        CrossOver::Uniform(0.5)
    }

    /// Mates two parents into two children.
    ///
    /// # Panics
    /// Panics if the parents have different lengths.
    pub fn mate<R: Rng + ?Sized>(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        assert_eq!(
            parent1.len(),
            parent2.len(),
            "parents must have equal length"
        );
        let n = parent1.len();
        if n == 0 {
            return (parent1.clone(), parent2.clone());
        }

        match self {
            CrossOver::OnePoint => k_point(parent1, parent2, 1, rng),
            CrossOver::TwoPoints => k_point(parent1, parent2, 2, rng),
            CrossOver::KPoints(k) => k_point(parent1, parent2, *k, rng),
            CrossOver::Uniform(rate) => uniform(parent1, parent2, *rate, rng),
            CrossOver::DavisOrder => {
                let (start, end) = random_segment(n, rng);
                (
                    davis_order_child(parent1, parent2, start, end),
                    davis_order_child(parent2, parent1, start, end),
                )
            }
            CrossOver::UniformOrder => {
                let (mut fill, mut keep) = (Vec::new(), Vec::new());
                for i in 0..n {
                    if rng.peek(0.5) {
                        keep.push(i);
                    } else {
                        fill.push(i);
                    }
                }
                (
                    uniform_order_child(parent1, parent2, &fill, &keep),
                    uniform_order_child(parent2, parent1, &fill, &keep),
                )
            }
            CrossOver::PartiallyMatched => {
                let (start, end) = random_segment(n, rng);
                (
                    pmx_child(parent1, parent2, start, end),
                    pmx_child(parent2, parent1, start, end),
                )
            }
            CrossOver::Multi(multi) => multi.mate(parent1, parent2, rng),
        }
    }
}

/// Ordered list of `(rate, crossover)` pairs.
///
/// Each pair whose rate fires is applied, in order, to the running pair of
/// chromosomes. With `stop_at_first`, only the first firing pair is applied.
/// When nothing fires, the children are copies of the parents.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiCrossOver {
    chain: Vec<(f64, CrossOver)>,
    stop_at_first: bool,
}

impl MultiCrossOver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a crossover applied with probability `rate`.
    pub fn with(mut self, rate: f64, crossover: CrossOver) -> Self {
        self.chain.push((rate, crossover));
        self
    }

    /// Stops after the first crossover that fires.
    pub fn stop_at_first(mut self, stop: bool) -> Self {
        self.stop_at_first = stop;
        self
    }

    pub fn mate<R: Rng + ?Sized>(
        &self,
        parent1: &Chromosome,
        parent2: &Chromosome,
        rng: &mut R,
    ) -> (Chromosome, Chromosome) {
        let mut pair = (parent1.clone(), parent2.clone());
        for (rate, crossover) in &self.chain {
            if rng.peek(*rate) {
                pair = crossover.mate(&pair.0, &pair.1, rng);
                if self.stop_at_first {
                    break;
                }
            }
        }
        pair
    }
}

// ============================================================================
// Value-recombining operators
// ============================================================================

fn k_point<R: Rng + ?Sized>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    k: usize,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let cuts = rng.ordered_ints(0, parent1.len(), k);
    exchange_segments(parent1, parent2, &cuts)
}

/// Copies contiguous segments into two children, swapping the source parent
/// at every cut.
///
/// ```text
/// cuts:     [    2   4   6  ]
/// parent1:  [0 0 0 0 0 0 0 0]
/// parent2:  [1 1 1 1 1 1 1 1]
/// child1:   [0 0 1 1 0 0 1 1]
/// child2:   [1 1 0 0 1 1 0 0]
/// ```
///
/// `cuts` must be sorted ascending; repeated cuts produce empty segments.
fn exchange_segments(
    parent1: &Chromosome,
    parent2: &Chromosome,
    cuts: &[usize],
) -> (Chromosome, Chromosome) {
    let n = parent1.len();
    let mut child1 = parent1.derive();
    let mut child2 = parent1.derive();
    let (mut src1, mut src2) = (parent1, parent2);

    let mut start = 0;
    for &end in cuts.iter().chain(std::iter::once(&n)) {
        child1.bases_mut()[start..end].copy_from_slice(&src1.bases()[start..end]);
        child2.bases_mut()[start..end].copy_from_slice(&src2.bases()[start..end]);
        std::mem::swap(&mut src1, &mut src2);
        start = end;
    }

    (child1, child2)
}

fn uniform<R: Rng + ?Sized>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    rate: f64,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let mut child1 = parent1.derive();
    let mut child2 = parent1.derive();
    for i in 0..parent1.len() {
        let (v1, v2) = if rng.peek(rate) {
            (parent1[i], parent2[i])
        } else {
            (parent2[i], parent1[i])
        };
        child1.bases_mut()[i] = v1;
        child2.bases_mut()[i] = v2;
    }
    (child1, child2)
}

// ============================================================================
// Order-preserving operators
// ============================================================================

/// Copies still owed to a child, per value.
///
/// Starts from the template parent's multiset so that a child can never hold a
/// value more often than its template does.
struct Budget {
    owed: [usize; BASE_VALUES],
}

impl Budget {
    fn of(template: &Chromosome) -> Self {
        let mut owed = [0; BASE_VALUES];
        for &v in template.bases() {
            owed[v as usize] += 1;
        }
        Self { owed }
    }

    fn take(&mut self, value: Base) -> bool {
        let slot = &mut self.owed[value as usize];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Smallest value still owed, if any.
    fn take_smallest(&mut self) -> Option<Base> {
        let value = self.owed.iter().position(|&c| c > 0)?;
        self.owed[value] -= 1;
        Some(value as Base)
    }
}

/// Scans a donor parent from its start, yielding values still owed.
struct Filler<'a> {
    donor: &'a [Base],
    idx: usize,
}

impl<'a> Filler<'a> {
    fn new(donor: &'a Chromosome) -> Self {
        Self {
            donor: donor.bases(),
            idx: 0,
        }
    }

    fn next_unused(&mut self, budget: &mut Budget) -> Base {
        while self.idx < self.donor.len() {
            let value = self.donor[self.idx];
            self.idx += 1;
            if budget.take(value) {
                return value;
            }
        }
        // Donor exhausted: parents do not share a multiset
        budget.take_smallest().unwrap_or_default()
    }
}

/// Build one OX child: copy `[start, end]` from `template`, fill from `donor`.
fn davis_order_child(
    template: &Chromosome,
    donor: &Chromosome,
    start: usize,
    end: usize,
) -> Chromosome {
    let n = template.len();
    let mut child = template.derive();
    let mut budget = Budget::of(template);

    for i in start..=end {
        let value = template[i];
        child.bases_mut()[i] = value;
        budget.take(value);
    }

    let mut filler = Filler::new(donor);
    for i in (0..start).chain(end + 1..n) {
        child.bases_mut()[i] = filler.next_unused(&mut budget);
    }

    child
}

/// Build one uniform-order child: copy `keep` positions from `template`, fill
/// `fill` positions (ascending) from `donor`.
fn uniform_order_child(
    template: &Chromosome,
    donor: &Chromosome,
    fill: &[usize],
    keep: &[usize],
) -> Chromosome {
    let mut child = template.derive();
    let mut budget = Budget::of(template);

    for &i in keep {
        let value = template[i];
        child.bases_mut()[i] = value;
        budget.take(value);
    }

    let mut filler = Filler::new(donor);
    for &i in fill {
        child.bases_mut()[i] = filler.next_unused(&mut budget);
    }

    child
}

/// Build one PMX child: copy `donor[start..end]`, then place `template`
/// values outside the slice, following the slice mapping on conflicts.
fn pmx_child(template: &Chromosome, donor: &Chromosome, start: usize, end: usize) -> Chromosome {
    let n = template.len();
    let mut child = template.derive();

    // slot[v] = first index of value v inside the donor slice
    let mut slot = [None; BASE_VALUES];
    for i in start..end {
        let value = donor[i];
        if slot[value as usize].is_none() {
            slot[value as usize] = Some(i);
        }
        child.bases_mut()[i] = value;
    }

    for i in (0..start).chain(end..n) {
        let mut value = template[i];
        // A valid permutation resolves in at most `end - start` hops
        for _ in 0..=(end - start) {
            match slot[value as usize] {
                Some(j) => value = template[j],
                None => break,
            }
        }
        child.bases_mut()[i] = value;
    }

    child
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick a random segment `[start, end]` within `0..n` where `start <= end`.
fn random_segment<R: Rng + ?Sized>(n: usize, rng: &mut R) -> (usize, usize) {
    let pos = rng.ordered_ints(0, n, 2);
    (pos[0], pos[1])
}

// ============================================================================
// Tests
// ============================================================================
