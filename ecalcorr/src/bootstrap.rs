//! Bootstrap uncertainties of distribution statistics.

use super::convert::u64_from_f64_ceil;
use super::histogram::Histogram;
use super::statistic::{self, Statistic};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use std::fmt::{self, Display, Formatter};

/// A central value with asymmetric uncertainties. Both uncertainties are given as distances
/// from `value`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Estimate {
    /// Central value.
    pub value: f64,
    /// Distance to the lower end of the interval.
    pub err_low: f64,
    /// Distance to the upper end of the interval.
    pub err_high: f64,
}

impl Estimate {
    /// Constructor.
    #[must_use]
    pub const fn new(value: f64, err_low: f64, err_high: f64) -> Self {
        Self {
            value,
            err_low,
            err_high,
        }
    }
}

impl Display for Estimate {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} -{} +{}", self.value, self.err_low, self.err_high)
    }
}

/// Settings of the bootstrap resampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bootstrap {
    /// Number of resampled distributions.
    pub resamples: usize,
    /// Confidence level of the interval in per cent.
    pub confidence_level: f64,
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self {
            resamples: 1000,
            confidence_level: 68.0,
        }
    }
}

impl Bootstrap {
    /// Constructor.
    #[must_use]
    pub const fn new(resamples: usize, confidence_level: f64) -> Self {
        Self {
            resamples,
            confidence_level,
        }
    }

    /// Computes `kind` of `histogram` trimmed to `percent` per cent and its confidence interval.
    /// Each resample draws as many unit-weight entries from the shape of `histogram` as the
    /// rounded-up integral of `histogram`. Resamples without statistic are ignored.
    ///
    /// Returns `None` if `histogram` has no statistic or no resample has one.
    pub fn estimate<R: Rng>(
        &self,
        histogram: &Histogram,
        kind: Statistic,
        percent: f64,
        rng: &mut R,
    ) -> Option<Estimate> {
        let value = statistic::statistic(histogram, kind, percent)?;
        let entries = u64_from_f64_ceil(histogram.integral());

        let deviations: Vec<_> = (0..self.resamples)
            .filter_map(|_| {
                let mut resample = histogram.empty_clone();
                resample.fill_random(histogram, entries, rng);
                statistic::statistic(&resample, kind, percent).map(|result| result - value)
            })
            .collect();

        if deviations.len() < self.resamples {
            log::debug!(
                "{} of {} resamples have no {kind}",
                self.resamples - deviations.len(),
                self.resamples
            );
        }

        let half_width = 0.5 * self.confidence_level;

        Some(Estimate {
            value,
            err_low: -statistic::percentile(&deviations, 50.0 - half_width)?,
            err_high: statistic::percentile(&deviations, 50.0 + half_width)?,
        })
    }

    /// Like [`Self::estimate`], using a [`Pcg64`] generator seeded with `seed`.
    #[must_use]
    pub fn estimate_seeded(
        &self,
        histogram: &Histogram,
        kind: Statistic,
        percent: f64,
        seed: u64,
    ) -> Option<Estimate> {
        self.estimate(histogram, kind, percent, &mut Pcg64::seed_from_u64(seed))
    }
}
