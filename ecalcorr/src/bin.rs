//! Module that contains helpers for binning observables

use super::convert::{f64_from_usize, usize_from_f64};
use super::error::{Error, Result};
use float_cmp::approx_eq;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
enum Limits {
    Equal { left: f64, right: f64, bins: usize },
    Unequal { limits: Vec<f64> },
}

/// Structure representing bin limits. Bins are half-open, `[low, high)`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct BinLimits(Limits);

impl BinLimits {
    /// Constructor for `BinLimits`. The limits are sorted; if all bins have the same width the
    /// limits are stored compactly.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two limits are given.
    pub fn new(mut limits: Vec<f64>) -> Result<Self> {
        if limits.len() < 2 {
            return Err(Error::InvalidBinLimits(limits.len()));
        }

        limits.sort_by(f64::total_cmp);

        if limits
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect::<Vec<f64>>()
            .windows(2)
            .all(|val| approx_eq!(f64, val[0], val[1], ulps = 8))
        {
            Ok(Self(Limits::Equal {
                left: limits[0],
                right: limits[limits.len() - 1],
                bins: limits.len() - 1,
            }))
        } else {
            Ok(Self(Limits::Unequal { limits }))
        }
    }

    /// Constructor for `bins` bins of equal width between `left` and `right`.
    ///
    /// # Errors
    ///
    /// Returns an error if `bins` is zero.
    pub fn with_equal_bins(bins: usize, left: f64, right: f64) -> Result<Self> {
        if bins == 0 {
            return Err(Error::InvalidBinLimits(1));
        }

        Ok(Self(Limits::Equal { left, right, bins }))
    }

    /// Returns the number of bins.
    #[must_use]
    pub fn bins(&self) -> usize {
        match &self.0 {
            Limits::Equal { bins, .. } => *bins,
            Limits::Unequal { limits } => limits.len() - 1,
        }
    }

    /// Returns the bin index for observable `value`. If the value over- or underflows, the return
    /// value is `None`.
    #[must_use]
    pub fn index(&self, value: f64) -> Option<usize> {
        match &self.0 {
            Limits::Equal { left, right, bins } => {
                if value < *left || value >= *right {
                    None
                } else {
                    Some(
                        usize_from_f64((value - left) / (right - left) * f64_from_usize(*bins))
                            .min(bins - 1),
                    )
                }
            }
            Limits::Unequal { limits } => {
                match limits.binary_search_by(|left| left.total_cmp(&value)) {
                    Err(0) => None,
                    Err(index) if index == limits.len() => None,
                    Ok(index) if index == (limits.len() - 1) => None,
                    Ok(index) => Some(index),
                    Err(index) => Some(index - 1),
                }
            }
        }
    }

    /// Returns the left-most bin limit
    #[must_use]
    pub fn left(&self) -> f64 {
        match &self.0 {
            Limits::Unequal { limits } => limits[0],
            Limits::Equal { left, .. } => *left,
        }
    }

    /// Returns the right-most bin limit
    #[must_use]
    pub fn right(&self) -> f64 {
        match &self.0 {
            Limits::Unequal { limits } => limits[limits.len() - 1],
            Limits::Equal { right, .. } => *right,
        }
    }

    /// Returns the lower edge of bin `bin`.
    #[must_use]
    pub fn low_edge(&self, bin: usize) -> f64 {
        match &self.0 {
            Limits::Equal { left, right, bins } => {
                (*right - *left).mul_add(f64_from_usize(bin) / f64_from_usize(*bins), *left)
            }
            Limits::Unequal { limits } => limits[bin],
        }
    }

    /// Returns the upper edge of bin `bin`.
    #[must_use]
    pub fn up_edge(&self, bin: usize) -> f64 {
        self.low_edge(bin + 1)
    }

    /// Returns the center of bin `bin`.
    #[must_use]
    pub fn center(&self, bin: usize) -> f64 {
        0.5 * (self.low_edge(bin) + self.up_edge(bin))
    }

    /// Returns the limits in a `Vec`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ecalcorr::bin::BinLimits;
    ///
    /// // example with equally sized bins
    /// let equal_bins = BinLimits::new(vec![0.25, 0.5, 0.75, 1.0]).unwrap();
    /// assert_eq!(equal_bins.limits(), vec![0.25, 0.5, 0.75, 1.0]);
    ///
    /// // example with unequally sized bins
    /// let unequal_bins = BinLimits::new(vec![0.125, 0.25, 1.0, 1.5]).unwrap();
    /// assert_eq!(unequal_bins.limits(), vec![0.125, 0.25, 1.0, 1.5]);
    /// ```
    #[must_use]
    pub fn limits(&self) -> Vec<f64> {
        match &self.0 {
            Limits::Equal { bins, .. } => (0..=*bins).map(|b| self.low_edge(b)).collect(),
            Limits::Unequal { limits } => limits.clone(),
        }
    }

    /// Returns the size for each bin.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ecalcorr::bin::BinLimits;
    ///
    /// let unequal_bins = BinLimits::new(vec![0.125, 0.25, 1.0, 1.5]).unwrap();
    /// assert_eq!(unequal_bins.bin_sizes(), vec![0.125, 0.75, 0.5]);
    /// ```
    #[must_use]
    pub fn bin_sizes(&self) -> Vec<f64> {
        match &self.0 {
            Limits::Equal { left, right, bins } => {
                vec![(*right - *left) / f64_from_usize(*bins); *bins]
            }
            Limits::Unequal { limits } => limits.windows(2).map(|x| x[1] - x[0]).collect(),
        }
    }

    /// Returns the limits of the bins `first..=last`, keeping their original edges.
    ///
    /// # Panics
    ///
    /// Panics if `first > last` or `last` is not a valid bin index.
    #[must_use]
    pub fn slice(&self, first: usize, last: usize) -> Self {
        assert!(first <= last && last < self.bins());

        match &self.0 {
            Limits::Equal { .. } => Self(Limits::Equal {
                left: self.low_edge(first),
                right: self.up_edge(last),
                bins: last - first + 1,
            }),
            Limits::Unequal { limits } => Self(Limits::Unequal {
                limits: limits[first..=last + 1].to_vec(),
            }),
        }
    }
}
