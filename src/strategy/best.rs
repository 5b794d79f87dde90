use crate::deadline::Deadline;
use crate::error::Result;
use crate::pool::PiecePool;
use crate::types::StockKey;

use super::{Outcome, usable, walk};

/// Tries every order in which the distinct stock lengths can be consumed
/// and keeps the order with the lowest waste percentage. Factorial in the
/// number of distinct usable lengths.
pub(super) fn cut(
    pool: PiecePool,
    keys: &[StockKey],
    kerf: f64,
    deadline: &Deadline,
) -> Result<Outcome> {
    let mut usable_keys: Vec<StockKey> = keys
        .iter()
        .copied()
        .filter(|key| usable(key.length, &pool))
        .collect();
    usable_keys.sort();

    let piece_total = pool.total_length();
    let mut order: Vec<usize> = (0..usable_keys.len()).collect();
    let mut best: Option<(f64, Vec<usize>)> = None;
    let mut evaluated = 0u64;

    loop {
        let sequence: Vec<StockKey> = order.iter().map(|&i| usable_keys[i]).collect();
        let trial = walk(&sequence, pool.clone(), kerf, deadline)?;
        evaluated += 1;

        if trial.pool.is_empty() && trial.consumed > 0.0 {
            let percent = (trial.consumed - piece_total) / trial.consumed * 100.0;
            if best.as_ref().is_none_or(|(min, _)| percent < *min) {
                tracing::debug!(?sequence, percent, "new best stock order");
                best = Some((percent, order.clone()));
            }
        }

        if !next_permutation(&mut order) {
            break;
        }
    }

    tracing::debug!(evaluated, feasible = best.is_some(), "stock orders evaluated");

    // Without a feasible order the ascending walk is reported as the partial.
    let winner = best.map(|(_, order)| order).unwrap_or_else(|| (0..usable_keys.len()).collect());
    let sequence: Vec<StockKey> = winner.iter().map(|&i| usable_keys[i]).collect();
    walk(&sequence, pool, kerf, deadline)
}

/// Rearranges `items` into the next lexicographic permutation.
/// Returns `false` once the last permutation has been reached.
fn next_permutation(items: &mut [usize]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let Some(pivot) = (0..items.len() - 1).rev().find(|&i| items[i] < items[i + 1]) else {
        return false;
    };
    let Some(swap) = (pivot + 1..items.len()).rev().find(|&j| items[j] > items[pivot]) else {
        return false;
    };
    items.swap(pivot, swap);
    items[pivot + 1..].reverse();
    true
}
