//! Scheduling strategies that drive the single-unit search across the stock.

mod best;
mod middle;
mod quick;

use serde::{Deserialize, Serialize};

use crate::config::EPS;
use crate::deadline::Deadline;
use crate::error::Result;
use crate::pool::PiecePool;
use crate::search;
use crate::types::{Allocation, CutAssignment, StockKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Walk the stock from the shortest length up, one search per unit.
    #[default]
    Quick,
    /// At every step cut the unit whose best selection leaves the least.
    Middle,
    /// Try every consumption order of the distinct stock lengths.
    Best,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Quick, Strategy::Middle, Strategy::Best];

    /// Allocates `pool` over `keys` (sorted ascending, lengths distinct).
    ///
    /// Pieces that could not be placed stay in the returned pool.
    pub(crate) fn allocate(
        self,
        pool: PiecePool,
        keys: &[StockKey],
        kerf: f64,
        deadline: &Deadline,
    ) -> Result<Outcome> {
        match self {
            Strategy::Quick => quick::cut(pool, keys, kerf, deadline),
            Strategy::Middle => middle::cut(pool, keys, kerf, deadline),
            Strategy::Best => best::cut(pool, keys, kerf, deadline),
        }
    }
}

impl std::str::FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quick" => Ok(Strategy::Quick),
            "middle" => Ok(Strategy::Middle),
            "best" => Ok(Strategy::Best),
            _ => Err(format!(
                "invalid strategy '{s}', expected: quick, middle, or best"
            )),
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Quick => write!(f, "quick"),
            Strategy::Middle => write!(f, "middle"),
            Strategy::Best => write!(f, "best"),
        }
    }
}

/// Raw result of a strategy run.
#[derive(Debug, Clone, Default)]
pub(crate) struct Outcome {
    pub allocation: Allocation,
    /// Pieces left without a unit.
    pub pool: PiecePool,
    /// Summed length of every unit that received a cut.
    pub consumed: f64,
}

impl Outcome {
    fn new(pool: PiecePool) -> Self {
        Self {
            pool,
            ..Self::default()
        }
    }

    fn record(&mut self, key: StockKey, selection: Vec<f64>) -> Result<()> {
        self.pool.remove(&selection)?;
        self.consumed += key.length;
        self.allocation
            .entry(key)
            .or_default()
            .push(CutAssignment::new(selection));
        Ok(())
    }
}

/// A unit can still take a piece: it is not shorter than the shortest one.
pub(crate) fn usable(length: f64, pool: &PiecePool) -> bool {
    pool.min_length().is_some_and(|min| length + EPS >= min)
}

/// Consumes keys in the given order, every unit of a key before the next
/// key, running one search per unit against the shrinking pool.
pub(crate) fn walk(
    order: &[StockKey],
    pool: PiecePool,
    kerf: f64,
    deadline: &Deadline,
) -> Result<Outcome> {
    let mut outcome = Outcome::new(pool);

    'keys: for &key in order {
        for unit in 0..key.count {
            if outcome.pool.is_empty() {
                break 'keys;
            }
            if !usable(key.length, &outcome.pool) {
                tracing::trace!(length = key.length, unit, "stock length below shortest piece");
                continue 'keys;
            }
            deadline.check()?;
            let selection = search::min_waste(key.length, &outcome.pool, kerf, deadline)?;
            tracing::debug!(length = key.length, unit, ?selection, "cut unit");
            outcome.record(key, selection)?;
        }
    }

    Ok(outcome)
}
