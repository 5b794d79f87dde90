//! Error types for the cutting engine.

use thiserror::Error;

use crate::scheme::Scheme;
use crate::types::StockKey;

/// Stable error codes, used by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request violates the input contract.
    InvalidRequest = 1,
    /// Not enough remnants and whole profiles for the piece list.
    InsufficientStock = 2,
    /// Deadline passed before the computation finished.
    DeadlineExceeded = 3,
    /// Computation cancelled by the caller.
    Cancelled = 4,
    /// A strategy produced an inconsistent allocation.
    WrongScheme = 10,
}

#[derive(Debug, Error)]
pub enum CutError {
    #[error(
        "not enough remnants and whole profiles: {} of {} pieces left unassigned",
        .unassigned.len(),
        .pieces.len()
    )]
    InsufficientStock {
        /// Reconciled allocation built before stock ran out.
        partial: Scheme,
        /// Pieces no stock unit could take.
        unassigned: Vec<f64>,
        /// Pieces as passed to the solver.
        pieces: Vec<f64>,
        /// Stock keys as passed to the solver.
        stock: Vec<StockKey>,
    },

    #[error("more cuts than stock units for length {length}: {used} cuts, {declared} units")]
    WrongScheme {
        length: f64,
        declared: usize,
        used: usize,
        /// Allocation as the strategy produced it, before reconciliation.
        scheme: Scheme,
        /// Pieces as passed to the solver.
        pieces: Vec<f64>,
        /// Stock keys as passed to the solver.
        stock: Vec<StockKey>,
    },

    #[error("piece of length {length} is not in the pool")]
    UnknownPiece { length: f64 },

    #[error("computation exceeded its time limit of {limit_ms} ms")]
    DeadlineExceeded { limit_ms: u64 },

    #[error("computation cancelled")]
    Cancelled,

    #[error("invalid request: {message}")]
    InvalidRequest { message: String },
}

impl CutError {
    pub fn code(&self) -> ErrorCode {
        match self {
            CutError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CutError::WrongScheme { .. } | CutError::UnknownPiece { .. } => ErrorCode::WrongScheme,
            CutError::DeadlineExceeded { .. } => ErrorCode::DeadlineExceeded,
            CutError::Cancelled => ErrorCode::Cancelled,
            CutError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
        }
    }

    /// Attaches the solver inputs to errors that carry them.
    pub(crate) fn with_inputs(mut self, input_pieces: &[f64], input_stock: &[StockKey]) -> Self {
        if let CutError::InsufficientStock { pieces, stock, .. }
        | CutError::WrongScheme { pieces, stock, .. } = &mut self
        {
            *pieces = input_pieces.to_vec();
            *stock = input_stock.to_vec();
        }
        self
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        CutError::InvalidRequest {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CutError>;
