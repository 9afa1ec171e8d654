//! Correction values and the ordered tables storing them.

use super::category::CategoryKey;
use super::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Correction parameters of one category. Scale tables fill the `scale*` members, smearing
/// tables the remaining ones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CorrectionValue {
    /// Energy-scale correction.
    pub scale: f64,
    /// Statistical uncertainty of `scale`.
    pub scale_err: f64,
    /// Systematic uncertainty of `scale`.
    pub scale_err_syst: f64,
    /// Uncertainty of `scale` due to the gain switch.
    pub scale_err_gain: f64,
    /// Amplitude of the smearing.
    pub rho: f64,
    /// Uncertainty of `rho`.
    pub rho_err: f64,
    /// Angle splitting the smearing into constant and stochastic terms.
    pub phi: f64,
    /// Uncertainty of `phi`.
    pub phi_err: f64,
    /// Mean energy at which the smearing was determined.
    pub e_mean: f64,
    /// Uncertainty of `e_mean`.
    pub e_mean_err: f64,
}

impl CorrectionValue {
    /// Creates a scale correction.
    #[must_use]
    pub fn scale(scale: f64, stat: f64, syst: f64, gain: f64) -> Self {
        Self {
            scale,
            scale_err: stat,
            scale_err_syst: syst,
            scale_err_gain: gain,
            ..Self::default()
        }
    }

    /// Creates a smearing correction from `(value, error)` pairs.
    #[must_use]
    pub fn smearing(rho: (f64, f64), phi: (f64, f64), e_mean: (f64, f64)) -> Self {
        Self {
            rho: rho.0,
            rho_err: rho.1,
            phi: phi.0,
            phi_err: phi.1,
            e_mean: e_mean.0,
            e_mean_err: e_mean.1,
            ..Self::default()
        }
    }
}

impl Display for CorrectionValue {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "( {} +/- {} +/- {} +/- {} ) rho = {} +/- {} phi = {} +/- {} Emean = {} +/- {}",
            self.scale,
            self.scale_err,
            self.scale_err_syst,
            self.scale_err_gain,
            self.rho,
            self.rho_err,
            self.phi,
            self.phi_err,
            self.e_mean,
            self.e_mean_err
        )
    }
}

/// Append-only map from categories to corrections. Lookups match a point category against
/// every stored category that contains it.
#[derive(Clone, Debug, Default)]
pub struct CorrectionTable {
    entries: BTreeMap<CategoryKey, CorrectionValue>,
}

impl CorrectionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new correction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateCategory`] if `key` is equivalent to a category already in the
    /// table; the table is left unchanged.
    pub fn insert(&mut self, key: CategoryKey, value: CorrectionValue) -> Result<()> {
        if let Some((existing, _)) = self.entries.get_key_value(&key) {
            return Err(Error::DuplicateCategory {
                new: Box::new(key),
                existing: Box::new(*existing),
            });
        }

        self.entries.insert(key, value);

        Ok(())
    }

    /// Returns the correction for the category equivalent to `key`, if any.
    #[must_use]
    pub fn get(&self, key: &CategoryKey) -> Option<&CorrectionValue> {
        self.entries.get(key)
    }

    /// Returns the stored category and correction equivalent to `key`, if any.
    #[must_use]
    pub fn get_key_value(&self, key: &CategoryKey) -> Option<(&CategoryKey, &CorrectionValue)> {
        self.entries.get_key_value(key)
    }

    /// Number of categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no categories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over the categories in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (&CategoryKey, &CorrectionValue)> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::category::Interval;

    fn key(runs: (u32, u32), position: (f64, f64)) -> CategoryKey {
        CategoryKey::new(
            Interval::new(runs.0, runs.1),
            Interval::new(position.0, position.1),
            Interval::new(-1.0, f64::INFINITY),
            Interval::new(0.0, 1000.0),
            0,
        )
    }

    #[test]
    fn insert_and_round_trip() {
        let mut table = CorrectionTable::new();
        let entries = [
            (key((0, 99), (0.0, 1.0)), CorrectionValue::scale(1.01, 0.1, 0.0, 0.0)),
            (key((0, 99), (1.0, 1.479)), CorrectionValue::scale(0.99, 0.2, 0.0, 0.0)),
            (key((100, 200), (0.0, 1.0)), CorrectionValue::scale(1.02, 0.3, 0.1, 0.0)),
        ];

        for (key, value) in entries {
            table.insert(key, value).unwrap();
        }

        assert_eq!(table.len(), 3);

        for (key, value) in entries {
            assert_eq!(table.get(&key), Some(&value));
        }

        let runs: Vec<_> = table.iter().map(|(key, _)| key.runs().min).collect();
        assert_eq!(runs, vec![0, 0, 100]);
    }

    #[test]
    fn duplicate_is_rejected() {
        let mut table = CorrectionTable::new();
        table
            .insert(key((0, 99), (0.0, 1.0)), CorrectionValue::scale(1.01, 0.1, 0.0, 0.0))
            .unwrap();

        let result = table.insert(
            key((0, 99), (0.0, 1.0)),
            CorrectionValue::scale(2.0, 0.0, 0.0, 0.0),
        );

        assert!(matches!(result, Err(Error::DuplicateCategory { .. })));
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(&key((0, 99), (0.0, 1.0))).unwrap().scale, 1.01);
    }

    #[test]
    fn point_lookup() {
        let mut table = CorrectionTable::new();
        table
            .insert(key((100, 200), (0.0, 1.0)), CorrectionValue::scale(1.02, 0.0, 0.0, 0.0))
            .unwrap();

        assert!(table.get(&CategoryKey::from_point(150, 0.4, 0.9, 40.0, 12)).is_some());
        assert!(table.get(&CategoryKey::from_point(250, 0.4, 0.9, 40.0, 12)).is_none());
    }
}
