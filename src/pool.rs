//! Multiset of piece lengths still waiting for a stock unit.

use crate::error::{CutError, Result};

/// Distinct lengths in first-seen order, each with a remaining count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiecePool {
    lengths: Vec<f64>,
    counts: Vec<usize>,
    total: usize,
}

impl PiecePool {
    pub fn from_lengths(pieces: &[f64]) -> Self {
        let mut pool = Self::default();
        for &piece in pieces {
            match pool.lengths.iter().position(|&l| l == piece) {
                Some(idx) => pool.counts[idx] += 1,
                None => {
                    pool.lengths.push(piece);
                    pool.counts.push(1);
                }
            }
            pool.total += 1;
        }
        pool
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct lengths with their remaining counts, zero counts included.
    pub fn distinct(&self) -> impl Iterator<Item = (f64, usize)> + '_ {
        self.lengths.iter().copied().zip(self.counts.iter().copied())
    }

    fn present(&self) -> impl Iterator<Item = f64> + '_ {
        self.distinct().filter(|&(_, c)| c > 0).map(|(l, _)| l)
    }

    pub fn min_length(&self) -> Option<f64> {
        self.present().min_by(f64::total_cmp)
    }

    pub fn max_length(&self) -> Option<f64> {
        self.present().max_by(f64::total_cmp)
    }

    pub fn total_length(&self) -> f64 {
        self.distinct().map(|(l, c)| l * c as f64).sum()
    }

    /// Removes one occurrence per entry of `selection`.
    ///
    /// The pool is left untouched when any length is missing.
    pub fn remove(&mut self, selection: &[f64]) -> Result<()> {
        let mut counts = self.counts.clone();
        for &piece in selection {
            match self.lengths.iter().position(|&l| l == piece) {
                Some(idx) if counts[idx] > 0 => counts[idx] -= 1,
                _ => return Err(CutError::UnknownPiece { length: piece }),
            }
        }
        self.counts = counts;
        self.total -= selection.len();
        Ok(())
    }

    /// Remaining pieces, grouped by length in first-seen order.
    pub fn to_vec(&self) -> Vec<f64> {
        self.distinct()
            .flat_map(|(l, c)| std::iter::repeat_n(l, c))
            .collect()
    }
}
