use crate::deadline::Deadline;
use crate::error::Result;
use crate::pool::PiecePool;
use crate::types::StockKey;

use super::{Outcome, walk};

/// Shortest stock first, so small remnants are used up before longer
/// stock gets fragmented.
pub(super) fn cut(
    pool: PiecePool,
    keys: &[StockKey],
    kerf: f64,
    deadline: &Deadline,
) -> Result<Outcome> {
    let mut order = keys.to_vec();
    order.sort();
    walk(&order, pool, kerf, deadline)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CutAssignment;

    fn run(pieces: &[f64], keys: &[StockKey], kerf: f64) -> Outcome {
        cut(PiecePool::from_lengths(pieces), keys, kerf, &Deadline::none()).unwrap()
    }

    #[test]
    fn test_smallest_stock_used_first() {
        let keys = [StockKey::new(6.0, 1), StockKey::new(3.0, 1)];
        let outcome = run(&[3.0], &keys, 0.0);
        assert_eq!(outcome.allocation.len(), 1);
        assert_eq!(
            outcome.allocation[&StockKey::new(3.0, 1)],
            vec![CutAssignment::new(vec![3.0])]
        );
    }

    #[test]
    fn test_ascending_walk_commits_to_order() {
        // The 5 takes the 4; the 3 ends up alone on the 7.
        let keys = [StockKey::new(5.0, 1), StockKey::new(7.0, 1)];
        let outcome = run(&[4.0, 3.0], &keys, 0.0);
        assert!(outcome.pool.is_empty());
        assert_eq!(
            outcome.allocation[&keys[0]],
            vec![CutAssignment::new(vec![4.0])]
        );
        assert_eq!(
            outcome.allocation[&keys[1]],
            vec![CutAssignment::new(vec![3.0])]
        );
        assert_eq!(outcome.consumed, 12.0);
    }

    #[test]
    fn test_uses_every_unit_of_a_key() {
        let keys = [StockKey::new(6.0, 3)];
        let outcome = run(&[4.0, 4.0, 4.0, 4.0], &keys, 0.0);
        assert_eq!(outcome.allocation[&keys[0]].len(), 3);
        assert_eq!(outcome.pool.to_vec(), vec![4.0]);
    }
}
