//! Exact search for the best cut of a single stock unit.
//!
//! Every multiset of pool pieces that fits the unit is visited once, in
//! depth-first order over the pool's distinct lengths. The selection leaving
//! the smallest leftover wins; on ties the first one found is kept.

use crate::config::{DEADLINE_CHECK_INTERVAL, EPS};
use crate::deadline::Deadline;
use crate::error::Result;
use crate::pool::PiecePool;

/// Subset of `pool` that leaves the smallest leftover on a unit of
/// `stock_length`, each piece charged `kerf`.
///
/// A piece is a candidate while it fits the remaining length; its kerf is
/// charged afterwards, so the last cut may run off the end of the unit.
/// Returns an empty selection when no piece fits. `pool` is not modified.
pub fn min_waste(
    stock_length: f64,
    pool: &PiecePool,
    kerf: f64,
    deadline: &Deadline,
) -> Result<Vec<f64>> {
    let (lengths, counts): (Vec<f64>, Vec<usize>) = pool
        .distinct()
        .filter(|&(length, count)| count > 0 && fits(length, stock_length))
        .unzip();
    let n = lengths.len();

    let mut taken = vec![0usize; n];
    // Each frame holds the distinct index taken and the budget before taking it.
    let mut path: Vec<(usize, f64)> = Vec::new();
    let mut cursor = 0usize;
    let mut budget = stock_length;

    let mut best_leftover = stock_length;
    let mut best: Vec<usize> = Vec::new();
    let mut steps = 0u64;

    loop {
        if steps % DEADLINE_CHECK_INTERVAL == 0 {
            deadline.check()?;
        }
        steps += 1;

        let next = (cursor..n).find(|&j| taken[j] < counts[j] && fits(lengths[j], budget));
        match next {
            Some(j) => {
                path.push((j, budget));
                taken[j] += 1;
                budget -= lengths[j] + kerf;

                if budget + EPS < best_leftover {
                    best_leftover = budget;
                    best = path.iter().map(|&(idx, _)| idx).collect();
                    if best_leftover <= EPS {
                        break;
                    }
                }
                // Same length may be taken again at the next depth.
                cursor = j;
            }
            None => match path.pop() {
                Some((j, previous)) => {
                    taken[j] -= 1;
                    budget = previous;
                    cursor = j + 1;
                }
                None => break,
            },
        }
    }

    tracing::trace!(stock_length, steps, best_leftover, "min waste search finished");
    Ok(best.into_iter().map(|idx| lengths[idx]).collect())
}

/// Whether a piece fits into what is left of a unit.
pub(crate) fn fits(piece: f64, budget: f64) -> bool {
    piece <= budget + EPS
}
