use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// One distinct stock length and how many physical units of it exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StockKey {
    pub length: f64,
    #[serde(deserialize_with = "deserialize_count_from_number")]
    pub count: usize,
}

impl StockKey {
    pub fn new(length: f64, count: usize) -> Self {
        Self { length, count }
    }

    /// Collapses a list of lengths into keys; repeats become the count.
    /// The result is sorted by ascending length.
    pub fn histogram(lengths: &[f64]) -> Vec<StockKey> {
        let keys = lengths.iter().map(|&length| StockKey::new(length, 1)).collect();
        Self::normalize(keys)
    }

    /// Merges keys that share a length and drops keys without units.
    pub fn normalize(mut keys: Vec<StockKey>) -> Vec<StockKey> {
        keys.sort_by(|a, b| a.length.total_cmp(&b.length));
        let mut merged: Vec<StockKey> = Vec::with_capacity(keys.len());
        for key in keys.into_iter().filter(|k| k.count > 0) {
            match merged.last_mut() {
                Some(last) if last.length == key.length => last.count += key.count,
                _ => merged.push(key),
            }
        }
        merged
    }

    /// Total material across all units.
    pub fn material(&self) -> f64 {
        self.length * self.count as f64
    }
}

impl PartialEq for StockKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StockKey {}

impl PartialOrd for StockKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StockKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.length
            .total_cmp(&other.length)
            .then(self.count.cmp(&other.count))
    }
}

impl std::fmt::Display for StockKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} x{}", self.length, self.count)
    }
}

/// Pieces assigned to one physical stock unit, in cutting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CutAssignment {
    pub pieces: Vec<f64>,
}

impl CutAssignment {
    pub fn new(pieces: Vec<f64>) -> Self {
        Self { pieces }
    }

    pub fn total(&self) -> f64 {
        self.pieces.iter().sum()
    }

    pub fn count(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Kerf is charged once per piece.
    pub fn kerf_loss(&self, kerf: f64) -> f64 {
        kerf * self.count() as f64
    }

    /// Length the pieces occupy on the unit. The kerf of the last cut may
    /// fall past the end of the unit, so it is not counted.
    pub fn span(&self, kerf: f64) -> f64 {
        self.total() + kerf * self.count().saturating_sub(1) as f64
    }

    /// Unused length after the pieces and their kerf, never negative.
    pub fn leftover(&self, stock_length: f64, kerf: f64) -> f64 {
        (stock_length - self.total() - self.kerf_loss(kerf)).max(0.0)
    }
}

impl std::fmt::Display for CutAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, piece) in self.pieces.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{piece:.3}")?;
        }
        write!(f, "]")
    }
}

/// Raw strategy output: declared stock key to one assignment per used unit.
pub type Allocation = BTreeMap<StockKey, Vec<CutAssignment>>;

/// Accepts counts sent as JSON integers or as integral floats (`3.0`).
pub fn deserialize_count_from_number<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {value}"
        )));
    }
    Ok(value as usize)
}
