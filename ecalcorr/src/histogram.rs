//! Weighted one- and two-dimensional histograms.

use super::bin::BinLimits;
use super::error::{Error, Result};
use rand::Rng;

/// A weighted one-dimensional histogram with under- and overflow.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    limits: BinLimits,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
    underflow: f64,
    overflow: f64,
}

impl Histogram {
    /// Creates an empty histogram with the given binning.
    #[must_use]
    pub fn new(limits: BinLimits) -> Self {
        let bins = limits.bins();

        Self {
            limits,
            contents: vec![0.0; bins],
            sumw2: vec![0.0; bins],
            underflow: 0.0,
            overflow: 0.0,
        }
    }

    /// Creates a histogram with the given binning and bin contents. The squared weights are set
    /// to the contents, as if each bin had been filled with unit weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of contents does not match the number of bins.
    pub fn from_contents(limits: BinLimits, contents: Vec<f64>) -> Result<Self> {
        if contents.len() != limits.bins() {
            return Err(Error::General(format!(
                "{} bin contents given for {} bins",
                contents.len(),
                limits.bins()
            )));
        }

        Ok(Self {
            limits,
            sumw2: contents.iter().map(|c| c.abs()).collect(),
            contents,
            underflow: 0.0,
            overflow: 0.0,
        })
    }

    /// Returns the bin limits.
    #[must_use]
    pub const fn limits(&self) -> &BinLimits {
        &self.limits
    }

    /// Returns the number of bins, excluding under- and overflow.
    #[must_use]
    pub fn bins(&self) -> usize {
        self.contents.len()
    }

    /// Adds `weight` to the bin containing `x`.
    pub fn fill(&mut self, x: f64, weight: f64) {
        if let Some(bin) = self.limits.index(x) {
            self.contents[bin] += weight;
            self.sumw2[bin] += weight * weight;
        } else if x < self.limits.left() {
            self.underflow += weight;
        } else {
            self.overflow += weight;
        }
    }

    /// Returns the content of every bin.
    #[must_use]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Returns the content of bin `bin`.
    #[must_use]
    pub fn bin_content(&self, bin: usize) -> f64 {
        self.contents[bin]
    }

    /// Overwrites the content of bin `bin`.
    pub fn set_bin_content(&mut self, bin: usize, content: f64) {
        self.contents[bin] = content;
    }

    /// Returns the statistical error of bin `bin`.
    #[must_use]
    pub fn bin_error(&self, bin: usize) -> f64 {
        self.sumw2[bin].sqrt()
    }

    /// Returns the underflow content.
    #[must_use]
    pub const fn underflow(&self) -> f64 {
        self.underflow
    }

    /// Returns the overflow content.
    #[must_use]
    pub const fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Sum of all bin contents, excluding under- and overflow.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Running sums of the bin contents; element `i` is the sum of bins `0..=i`.
    #[must_use]
    pub fn cumulative(&self) -> Vec<f64> {
        self.contents
            .iter()
            .scan(0.0, |sum, &content| {
                *sum += content;
                Some(*sum)
            })
            .collect()
    }

    /// Running sums from the right; element `i` is the sum of bins `i..`.
    #[must_use]
    pub fn reverse_cumulative(&self) -> Vec<f64> {
        let mut result: Vec<_> = self
            .contents
            .iter()
            .rev()
            .scan(0.0, |sum, &content| {
                *sum += content;
                Some(*sum)
            })
            .collect();
        result.reverse();
        result
    }

    // normalized cumulative distribution with a leading zero, `bins + 1` entries
    fn normalized_cumulative(&self) -> Option<Vec<f64>> {
        let integral = self.integral();

        if integral <= 0.0 {
            return None;
        }

        Some(
            std::iter::once(0.0)
                .chain(self.cumulative().into_iter().map(|sum| sum / integral))
                .collect(),
        )
    }

    /// Returns the `probability`-quantile, interpolating linearly inside the bin where the
    /// cumulative distribution crosses `probability`. Returns `None` for histograms without
    /// positive integral.
    #[must_use]
    pub fn quantile(&self, probability: f64) -> Option<f64> {
        let cumulative = self.normalized_cumulative()?;
        let bins = self.bins();
        let bin = cumulative[..bins]
            .partition_point(|&sum| sum <= probability)
            .saturating_sub(1);

        let mut result = self.limits.low_edge(bin);
        let delta = cumulative[bin + 1] - cumulative[bin];

        if delta > 0.0 {
            let width = self.limits.up_edge(bin) - self.limits.low_edge(bin);
            result += width * (probability - cumulative[bin]) / delta;
        }

        Some(result)
    }

    /// Weighted mean of the bin centers.
    #[must_use]
    pub fn mean(&self) -> f64 {
        let integral = self.integral();

        if integral == 0.0 {
            return 0.0;
        }

        self.contents
            .iter()
            .enumerate()
            .map(|(bin, content)| content * self.limits.center(bin))
            .sum::<f64>()
            / integral
    }

    /// Weighted standard deviation of the bin centers.
    #[must_use]
    pub fn std_dev(&self) -> f64 {
        let integral = self.integral();

        if integral == 0.0 {
            return 0.0;
        }

        let mean = self.mean();
        let second_moment = self
            .contents
            .iter()
            .enumerate()
            .map(|(bin, content)| content * self.limits.center(bin).powi(2))
            .sum::<f64>()
            / integral;

        mean.mul_add(-mean, second_moment).max(0.0).sqrt()
    }

    /// Returns a new histogram restricted to the bins `first..=last`, keeping their edges,
    /// contents and errors.
    #[must_use]
    pub fn window(&self, first: usize, last: usize) -> Self {
        Self {
            limits: self.limits.slice(first, last),
            contents: self.contents[first..=last].to_vec(),
            sumw2: self.sumw2[first..=last].to_vec(),
            underflow: 0.0,
            overflow: 0.0,
        }
    }

    /// Returns an empty histogram with the same binning.
    #[must_use]
    pub fn empty_clone(&self) -> Self {
        Self::new(self.limits.clone())
    }

    /// Fills `entries` unit-weight entries drawn from the shape of `source`, which must have the
    /// same binning as `self`. Nothing is filled if `source` has no positive integral.
    pub fn fill_random<R: Rng>(&mut self, source: &Self, entries: u64, rng: &mut R) {
        debug_assert_eq!(self.bins(), source.bins());

        let Some(cumulative) = source.normalized_cumulative() else {
            return;
        };
        let bins = self.bins();

        for _ in 0..entries {
            let random: f64 = rng.gen_range(0.0..1.0);
            let bin = cumulative[1..]
                .partition_point(|&sum| sum <= random)
                .min(bins - 1);

            self.contents[bin] += 1.0;
            self.sumw2[bin] += 1.0;
        }
    }
}

/// A weighted two-dimensional histogram. Entries outside of the binning are discarded.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram2 {
    x: BinLimits,
    y: BinLimits,
    contents: Vec<f64>,
    sumw2: Vec<f64>,
}

impl Histogram2 {
    /// Creates an empty histogram with the given binnings.
    #[must_use]
    pub fn new(x: BinLimits, y: BinLimits) -> Self {
        let size = x.bins() * y.bins();

        Self {
            x,
            y,
            contents: vec![0.0; size],
            sumw2: vec![0.0; size],
        }
    }

    /// Returns the binning along x.
    #[must_use]
    pub const fn x_limits(&self) -> &BinLimits {
        &self.x
    }

    /// Returns the binning along y.
    #[must_use]
    pub const fn y_limits(&self) -> &BinLimits {
        &self.y
    }

    /// Adds `weight` to the bin containing `(x, y)`.
    pub fn fill(&mut self, x: f64, y: f64, weight: f64) {
        if let (Some(ix), Some(iy)) = (self.x.index(x), self.y.index(y)) {
            let index = ix * self.y.bins() + iy;
            self.contents[index] += weight;
            self.sumw2[index] += weight * weight;
        }
    }

    /// Returns the content of bin `(ix, iy)`.
    #[must_use]
    pub fn bin_content(&self, ix: usize, iy: usize) -> f64 {
        self.contents[ix * self.y.bins() + iy]
    }

    /// Returns the distribution of y for the x bin `ix`.
    #[must_use]
    pub fn projection_y(&self, ix: usize) -> Histogram {
        let ny = self.y.bins();
        let range = ix * ny..(ix + 1) * ny;

        Histogram {
            limits: self.y.clone(),
            contents: self.contents[range.clone()].to_vec(),
            sumw2: self.sumw2[range].to_vec(),
            underflow: 0.0,
            overflow: 0.0,
        }
    }
}
