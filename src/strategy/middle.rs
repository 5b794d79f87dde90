use crate::deadline::Deadline;
use crate::error::Result;
use crate::pool::PiecePool;
use crate::search::{self, fits};
use crate::types::StockKey;

use super::{Outcome, usable};

struct Candidate {
    key: StockKey,
    remaining: usize,
}

/// Every step searches all remaining stock lengths and cuts the unit whose
/// best selection leaves the smallest leftover. Ties go to the shorter key.
pub(super) fn cut(
    pool: PiecePool,
    keys: &[StockKey],
    kerf: f64,
    deadline: &Deadline,
) -> Result<Outcome> {
    let mut candidates: Vec<Candidate> = keys
        .iter()
        .filter(|key| usable(key.length, &pool))
        .map(|&key| Candidate {
            key,
            remaining: key.count,
        })
        .collect();
    candidates.sort_by(|a, b| a.key.cmp(&b.key));

    let mut outcome = Outcome::new(pool);
    let mut step = 0usize;

    while let Some(longest) = outcome.pool.max_length() {
        deadline.check()?;

        if !candidates.iter().any(|c| fits(longest, c.key.length)) {
            tracing::debug!(
                step,
                longest,
                candidates = candidates.len(),
                "no remaining stock takes the longest piece"
            );
            break;
        }

        let mut best: Option<(usize, f64, Vec<f64>)> = None;
        for (idx, candidate) in candidates.iter().enumerate() {
            let selection =
                search::min_waste(candidate.key.length, &outcome.pool, kerf, deadline)?;
            let used: f64 = selection.iter().map(|p| p + kerf).sum();
            let leftover = candidate.key.length - used;
            if best.as_ref().is_none_or(|(_, min, _)| leftover < *min) {
                best = Some((idx, leftover, selection));
            }
        }

        let Some((idx, leftover, selection)) = best else {
            break;
        };
        if selection.is_empty() {
            break;
        }

        let key = candidates[idx].key;
        tracing::debug!(step, length = key.length, leftover, ?selection, "cut unit");
        outcome.record(key, selection)?;

        candidates[idx].remaining -= 1;
        let pool = &outcome.pool;
        candidates.retain(|c| c.remaining > 0 && usable(c.key.length, pool));
        step += 1;
    }

    Ok(outcome)
}
