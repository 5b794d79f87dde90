//! Typed request contract shared by the CLI and the HTTP server.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::{
    DEFAULT_KERF, DEFAULT_MIN_REST_LENGTH, DEFAULT_TIME_LIMIT_MS, DEFAULT_WHOLE_PROFILE_LENGTH,
    round_length,
};
use crate::deadline::Deadline;
use crate::error::{CutError, Result};
use crate::scheme::Scheme;
use crate::solver::Solver;
use crate::strategy::Strategy;
use crate::types::{StockKey, deserialize_count_from_number};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutRequest {
    /// Ordered widths, before correction.
    pub pieces: Vec<f64>,
    /// Remnant lengths; repeats encode multiplicity.
    #[serde(default)]
    pub stock: Vec<f64>,
    #[serde(default = "default_whole_profile_length")]
    pub whole_profile_length: f64,
    #[serde(default, deserialize_with = "deserialize_count_from_number")]
    pub whole_profile_count: usize,
    #[serde(default = "default_kerf")]
    pub kerf: f64,
    #[serde(default = "default_min_rest_length")]
    pub min_rest_length: f64,
    /// Subtracted from every ordered width.
    #[serde(default)]
    pub correction: f64,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}

fn default_whole_profile_length() -> f64 {
    DEFAULT_WHOLE_PROFILE_LENGTH
}

fn default_kerf() -> f64 {
    DEFAULT_KERF
}

fn default_min_rest_length() -> f64 {
    DEFAULT_MIN_REST_LENGTH
}

impl CutRequest {
    pub fn new(pieces: Vec<f64>, stock: Vec<f64>) -> Self {
        Self {
            pieces,
            stock,
            whole_profile_length: DEFAULT_WHOLE_PROFILE_LENGTH,
            whole_profile_count: 0,
            kerf: DEFAULT_KERF,
            min_rest_length: DEFAULT_MIN_REST_LENGTH,
            correction: 0.0,
            strategy: Strategy::default(),
            time_limit_ms: None,
        }
    }

    /// The best strategy is factorial in the number of stock lengths, so it
    /// never runs unbounded.
    pub fn with_default_time_limit(mut self) -> Self {
        if self.strategy == Strategy::Best && self.time_limit_ms.is_none() {
            self.time_limit_ms = Some(DEFAULT_TIME_LIMIT_MS);
        }
        self
    }

    /// Applies `limit_ms` when the request asks for more time, or for none.
    pub fn cap_time_limit(&mut self, limit_ms: u64) {
        self.time_limit_ms = Some(self.time_limit_ms.map_or(limit_ms, |ms| ms.min(limit_ms)));
    }

    /// Piece lengths after the correction, rounded to the working precision.
    pub fn corrected_pieces(&self) -> Vec<f64> {
        if self.correction == 0.0 {
            return self.pieces.clone();
        }
        self.pieces
            .iter()
            .map(|&width| round_length(width - self.correction))
            .collect()
    }

    /// Remnants and whole profiles as one ascending key set.
    pub fn stock_keys(&self) -> Vec<StockKey> {
        let mut keys = StockKey::histogram(&self.stock);
        if self.whole_profile_count > 0 {
            keys.push(StockKey::new(
                self.whole_profile_length,
                self.whole_profile_count,
            ));
        }
        StockKey::normalize(keys)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.kerf.is_finite() && self.kerf >= 0.0) {
            return Err(CutError::invalid(format!("kerf must be non-negative, got {}", self.kerf)));
        }
        if !(self.min_rest_length.is_finite() && self.min_rest_length >= 0.0) {
            return Err(CutError::invalid(format!(
                "minimum rest length must be non-negative, got {}",
                self.min_rest_length
            )));
        }
        if !self.correction.is_finite() {
            return Err(CutError::invalid("correction must be a finite number"));
        }
        if self.whole_profile_count > 0
            && !(self.whole_profile_length.is_finite() && self.whole_profile_length > 0.0)
        {
            return Err(CutError::invalid(format!(
                "whole profile length must be positive, got {}",
                self.whole_profile_length
            )));
        }
        if let Some(&length) = self.stock.iter().find(|l| !(l.is_finite() && **l > 0.0)) {
            return Err(CutError::invalid(format!(
                "stock lengths must be positive, got {length}"
            )));
        }
        for (&width, piece) in self.pieces.iter().zip(self.corrected_pieces()) {
            if !(piece.is_finite() && piece > 0.0) {
                return Err(CutError::invalid(format!(
                    "piece {width} is not positive after a correction of {}",
                    self.correction
                )));
            }
        }
        Ok(())
    }

    pub fn solver(&self) -> Solver {
        let deadline = match self.time_limit_ms {
            Some(ms) => Deadline::after(Duration::from_millis(ms)),
            None => Deadline::none(),
        };
        Solver::new(self.strategy, self.kerf, self.min_rest_length).with_deadline(deadline)
    }

    pub fn solve(&self) -> Result<Scheme> {
        self.validate()?;
        self.solver()
            .solve(&self.corrected_pieces(), &self.stock_keys())
    }
}
