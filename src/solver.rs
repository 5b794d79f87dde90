use crate::deadline::Deadline;
use crate::error::{CutError, Result};
use crate::pool::PiecePool;
use crate::scheme::Scheme;
use crate::strategy::Strategy;
use crate::types::StockKey;

pub struct Solver {
    strategy: Strategy,
    kerf: f64,
    min_rest_length: f64,
    deadline: Deadline,
}

impl Solver {
    pub fn new(strategy: Strategy, kerf: f64, min_rest_length: f64) -> Self {
        Self {
            strategy,
            kerf,
            min_rest_length,
            deadline: Deadline::none(),
        }
    }

    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = deadline;
        self
    }

    /// Cuts `pieces` from `stock`.
    ///
    /// Either every piece is assigned, or the run fails with
    /// [`CutError::InsufficientStock`] carrying what was achieved.
    pub fn solve(&self, pieces: &[f64], stock: &[StockKey]) -> Result<Scheme> {
        if pieces.is_empty() {
            return Ok(Scheme::empty(self.kerf, self.min_rest_length));
        }

        let keys = StockKey::normalize(stock.to_vec());
        let pool = PiecePool::from_lengths(pieces);
        tracing::info!(
            strategy = %self.strategy,
            pieces = pieces.len(),
            stock_lengths = keys.len(),
            kerf = self.kerf,
            "cutting"
        );

        let outcome = self
            .strategy
            .allocate(pool, &keys, self.kerf, &self.deadline)?;
        let scheme = Scheme::reconciled(outcome.allocation, self.kerf, self.min_rest_length)
            .map_err(|e| e.with_inputs(pieces, stock))?;

        if !outcome.pool.is_empty() {
            let unassigned = outcome.pool.to_vec();
            tracing::warn!(
                strategy = %self.strategy,
                unassigned = unassigned.len(),
                units_used = scheme.unit_count(),
                "not enough stock"
            );
            return Err(CutError::InsufficientStock {
                partial: scheme,
                unassigned,
                pieces: pieces.to_vec(),
                stock: stock.to_vec(),
            });
        }

        let waste = scheme.waste();
        tracing::info!(
            strategy = %self.strategy,
            units = scheme.unit_count(),
            waste = waste.absolute,
            waste_percent = waste.percent,
            "cut finished"
        );
        Ok(scheme)
    }
}
