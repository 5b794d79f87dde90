//! Reconciled cutting scheme and its waste metrics.

use serde::Serialize;

use crate::error::{CutError, Result};
use crate::types::{Allocation, CutAssignment, StockKey};

/// Absolute waste and its share of the stock consumed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Waste {
    pub absolute: f64,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scheme {
    cuts: Allocation,
    kerf: f64,
    min_rest_length: f64,
}

impl Scheme {
    pub fn new(cuts: Allocation, kerf: f64, min_rest_length: f64) -> Self {
        Self {
            cuts,
            kerf,
            min_rest_length,
        }
    }

    pub fn empty(kerf: f64, min_rest_length: f64) -> Self {
        Self::new(Allocation::new(), kerf, min_rest_length)
    }

    /// Builds the scheme and rewrites its keys to the units actually used.
    pub fn reconciled(cuts: Allocation, kerf: f64, min_rest_length: f64) -> Result<Self> {
        let mut scheme = Self::new(cuts, kerf, min_rest_length);
        scheme.restore_order()?;
        Ok(scheme)
    }

    /// Makes every key's count equal to its number of assignments.
    ///
    /// Keys without assignments are dropped. A key with more assignments
    /// than declared units is a [`CutError::WrongScheme`].
    pub fn restore_order(&mut self) -> Result<()> {
        if let Some((key, cuts)) = self.cuts.iter().find(|(key, cuts)| cuts.len() > key.count) {
            tracing::error!(
                length = key.length,
                declared = key.count,
                used = cuts.len(),
                "more cuts than stock units"
            );
            return Err(CutError::WrongScheme {
                length: key.length,
                declared: key.count,
                used: cuts.len(),
                scheme: self.clone(),
                pieces: Vec::new(),
                stock: Vec::new(),
            });
        }

        // Keys are ordered by length, so entries sharing a length are adjacent.
        let mut merged: Vec<(f64, Vec<CutAssignment>)> = Vec::new();
        for (key, cuts) in std::mem::take(&mut self.cuts) {
            if cuts.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some((length, existing)) if *length == key.length => existing.extend(cuts),
                _ => merged.push((key.length, cuts)),
            }
        }
        self.cuts = merged
            .into_iter()
            .map(|(length, cuts)| (StockKey::new(length, cuts.len()), cuts))
            .collect();
        Ok(())
    }

    /// Kerf of every cut counts as waste; a leftover counts only when it is
    /// too short to keep as a remnant.
    pub fn waste(&self) -> Waste {
        let mut total_stock = 0.0;
        let mut absolute = 0.0;

        for (key, cuts) in &self.cuts {
            total_stock += key.material();
            for cut in cuts {
                absolute += cut.kerf_loss(self.kerf);
                let leftover = cut.leftover(key.length, self.kerf).max(0.0);
                if leftover < self.min_rest_length {
                    absolute += leftover;
                }
            }
        }

        let percent = if total_stock > 0.0 {
            absolute / total_stock * 100.0
        } else {
            0.0
        };
        Waste { absolute, percent }
    }

    pub fn entries(&self) -> impl Iterator<Item = (&StockKey, &[CutAssignment])> {
        self.cuts.iter().map(|(key, cuts)| (key, cuts.as_slice()))
    }

    pub fn get(&self, key: &StockKey) -> Option<&[CutAssignment]> {
        self.cuts.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &StockKey> {
        self.cuts.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.cuts.is_empty()
    }

    /// Physical stock units cut.
    pub fn unit_count(&self) -> usize {
        self.cuts.values().map(Vec::len).sum()
    }

    pub fn piece_count(&self) -> usize {
        self.cuts.values().flatten().map(CutAssignment::count).sum()
    }

    /// Every assigned piece, in key then unit order.
    pub fn pieces(&self) -> Vec<f64> {
        self.cuts
            .values()
            .flatten()
            .flat_map(|cut| cut.pieces.iter().copied())
            .collect()
    }

    pub fn kerf(&self) -> f64 {
        self.kerf
    }

    pub fn min_rest_length(&self) -> f64 {
        self.min_rest_length
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, cuts) in &self.cuts {
            writeln!(f, "{key}:")?;
            for cut in cuts {
                writeln!(
                    f,
                    "\t{cut} = {:.3} ({:.3}, rest: {:.3})",
                    cut.total(),
                    key.length,
                    cut.leftover(key.length, self.kerf)
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allocation(entries: &[(f64, usize, &[&[f64]])]) -> Allocation {
        entries
            .iter()
            .map(|&(length, count, cuts)| {
                (
                    StockKey::new(length, count),
                    cuts.iter().map(|c| CutAssignment::new(c.to_vec())).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_restore_order_shrinks_counts() {
        let scheme = Scheme::reconciled(allocation(&[(6.0, 3, &[&[4.0], &[4.0]])]), 0.0, 1.0).unwrap();
        let keys: Vec<_> = scheme.keys().copied().collect();
        assert_eq!(keys, vec![StockKey::new(6.0, 2)]);
        assert_eq!(scheme.unit_count(), 2);
    }

    #[test]
    fn test_restore_order_drops_empty_keys() {
        let scheme = Scheme::reconciled(
            allocation(&[(2.0, 4, &[]), (6.0, 1, &[&[5.0]])]),
            0.0,
            1.0,
        )
        .unwrap();
        assert_eq!(scheme.keys().count(), 1);
        assert!(scheme.get(&StockKey::new(2.0, 4)).is_none());
        assert!(scheme.get(&StockKey::new(6.0, 1)).is_some());
    }

    #[test]
    fn test_restore_order_rejects_overused_key() {
        let cuts = allocation(&[(6.0, 1, &[&[1.0], &[2.0]])]);
        let err = Scheme::reconciled(cuts.clone(), 0.0, 1.0)
            .unwrap_err()
            .with_inputs(&[1.0, 2.0], &[StockKey::new(6.0, 1)]);
        match err {
            CutError::WrongScheme {
                length,
                declared,
                used,
                scheme,
                pieces,
                stock,
            } => {
                assert_eq!((length, declared, used), (6.0, 1, 2));
                assert_eq!(scheme, Scheme::new(cuts, 0.0, 1.0));
                assert_eq!(scheme.pieces(), vec![1.0, 2.0]);
                assert_eq!(pieces, vec![1.0, 2.0]);
                assert_eq!(stock, vec![StockKey::new(6.0, 1)]);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_waste_keeps_long_leftovers() {
        let scheme = Scheme::reconciled(allocation(&[(6.0, 2, &[&[4.0], &[4.0]])]), 0.0, 1.0).unwrap();
        let waste = scheme.waste();
        assert_eq!(waste.absolute, 0.0);
        assert_eq!(waste.percent, 0.0);
    }

    #[test]
    fn test_waste_counts_short_leftovers() {
        let scheme = Scheme::reconciled(allocation(&[(6.0, 2, &[&[4.0], &[4.0]])]), 0.0, 3.0).unwrap();
        let waste = scheme.waste();
        assert!((waste.absolute - 4.0).abs() < 1e-9);
        assert!((waste.percent - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_waste_charges_kerf_on_every_piece() {
        // Leftover 10 - 6 - 0.3 = 3.7 is a remnant, only the kerf is lost.
        let scheme = Scheme::reconciled(allocation(&[(10.0, 1, &[&[1.0, 2.0, 3.0]])]), 0.1, 1.0).unwrap();
        let waste = scheme.waste();
        assert!((waste.absolute - 0.3).abs() < 1e-9);
        assert!((waste.percent - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_scheme() {
        let scheme = Scheme::empty(0.003, 1.0);
        assert!(scheme.is_empty());
        assert_eq!(scheme.waste(), Waste { absolute: 0.0, percent: 0.0 });
        assert_eq!(scheme.to_string(), "");
    }

    #[test]
    fn test_display() {
        let scheme = Scheme::reconciled(
            allocation(&[(6.0, 3, &[&[4.0, 1.5], &[2.0]]), (2.5, 1, &[&[2.0]])]),
            0.0,
            1.0,
        )
        .unwrap();
        assert_eq!(
            scheme.to_string(),
            "2.500 x1:\n\
             \t[2.000] = 2.000 (2.500, rest: 0.500)\n\
             6.000 x2:\n\
             \t[4.000, 1.500] = 5.500 (6.000, rest: 0.500)\n\
             \t[2.000] = 2.000 (6.000, rest: 4.000)\n"
        );
        assert_eq!(scheme.piece_count(), 4);
        assert_eq!(scheme.pieces(), vec![2.0, 4.0, 1.5, 2.0]);
    }
}
