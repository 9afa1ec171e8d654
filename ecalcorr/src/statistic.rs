//! Robust statistics of one-dimensional distributions.

use super::convert::{f64_from_usize, usize_from_f64};
use super::error::{Error, Result};
use super::histogram::Histogram;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Distributions with an integral below this value have no statistic, except for
/// [`Statistic::Integral`].
pub const MIN_INTEGRAL: f64 = 1e-5;

/// The statistic computed from a distribution.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Statistic {
    /// The 50% quantile.
    Median,
    /// The weighted mean of the bin centers.
    Mean,
    /// The root mean square, `sqrt(mean² + stddev²)`.
    Rms,
    /// The standard deviation.
    StdDev,
    /// The sum of all bin contents.
    Integral,
}

impl Statistic {
    /// Evaluates the statistic for `histogram`. Returns `None` if `histogram` is empty, i.e. its
    /// integral is smaller than [`MIN_INTEGRAL`], unless `self` is [`Statistic::Integral`].
    #[must_use]
    pub fn evaluate(self, histogram: &Histogram) -> Option<f64> {
        let integral = histogram.integral();

        match self {
            Self::Integral => Some(integral),
            _ if integral < MIN_INTEGRAL => None,
            Self::Median => histogram.quantile(0.5),
            Self::Mean => Some(histogram.mean()),
            Self::Rms => Some(histogram.mean().hypot(histogram.std_dev())),
            Self::StdDev => Some(histogram.std_dev()),
        }
    }
}

impl FromStr for Statistic {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "median" => Ok(Self::Median),
            "mean" => Ok(Self::Mean),
            "rms" => Ok(Self::Rms),
            "stddev" => Ok(Self::StdDev),
            "stats" => Ok(Self::Integral),
            _ => Err(Error::General(format!("unknown statistic `{s}`"))),
        }
    }
}

impl Display for Statistic {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Median => "median",
                Self::Mean => "mean",
                Self::Rms => "rms",
                Self::StdDev => "stddev",
                Self::Integral => "stats",
            }
        )
    }
}

/// Returns the narrowest contiguous range of bins of `histogram` containing at least `percent`
/// per cent of its integral. The bins keep their edges and contents. If `percent` is (almost) 100
/// the histogram is returned unchanged.
#[must_use]
pub fn narrowest_window(histogram: &Histogram, percent: f64) -> Histogram {
    if 100.0 - percent < MIN_INTEGRAL {
        return histogram.clone();
    }

    let limits = histogram.limits();
    let cumulative = histogram.cumulative();
    let reverse = histogram.reverse_cumulative();
    let integral = histogram.integral();
    let fraction = percent / 100.0;

    let mut width = limits.right() - limits.left();
    let mut window = (0, histogram.bins() - 1);

    for (first, &remainder) in reverse.iter().enumerate() {
        // the remaining bins cannot reach the required fraction any more
        if fraction * integral > remainder {
            break;
        }

        let before = first.checked_sub(1).map_or(0.0, |bin| cumulative[bin]);

        for (last, &sum) in cumulative.iter().enumerate().skip(first) {
            let candidate = limits.up_edge(last) - limits.low_edge(first);

            if (sum - before) / integral >= fraction && candidate < width {
                window = (first, last);
                width = candidate;
                break;
            }
        }
    }

    histogram.window(window.0, window.1)
}

/// Evaluates `statistic` on the narrowest window of `histogram` containing `percent` per cent of
/// its integral.
#[must_use]
pub fn statistic(histogram: &Histogram, statistic: Statistic, percent: f64) -> Option<f64> {
    statistic.evaluate(&narrowest_window(histogram, percent))
}

/// Returns the nearest-rank `percent`-percentile of `values`. A percentage of zero gives the
/// minimum. Returns `None` if `values` is empty or `percent` is outside `[0, 100]`.
#[must_use]
pub fn percentile(values: &[f64], percent: f64) -> Option<f64> {
    if values.is_empty() {
        log::error!("percentile of an empty list requested");
        return None;
    }

    if !(0.0..=100.0).contains(&percent) {
        log::error!("invalid percentage {percent} requested");
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let rank = usize_from_f64((percent * f64_from_usize(sorted.len()) / 100.0).ceil());

    Some(sorted[rank.saturating_sub(1)])
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bin::BinLimits;
    use float_cmp::assert_approx_eq;

    fn peaked() -> Histogram {
        Histogram::from_contents(
            BinLimits::with_equal_bins(10, 0.0, 10.0).unwrap(),
            vec![0.0, 0.0, 1.0, 1.0, 10.0, 10.0, 1.0, 1.0, 0.0, 0.0],
        )
        .unwrap()
    }

    #[test]
    fn statistic_names() {
        for name in ["median", "mean", "rms", "stddev", "stats"] {
            assert_eq!(name.parse::<Statistic>().unwrap().to_string(), name);
        }

        assert_eq!("stats".parse::<Statistic>().unwrap(), Statistic::Integral);
        assert!("mode".parse::<Statistic>().is_err());
    }

    #[test]
    fn narrowest_window_of_peak() {
        let window = narrowest_window(&peaked(), 80.0);

        assert_eq!(window.limits().limits(), vec![4.0, 5.0, 6.0]);
        assert_eq!(window.contents(), &[10.0, 10.0]);
    }

    #[test]
    fn narrowest_window_is_idempotent_for_full_range() {
        let histogram = peaked();

        assert_eq!(narrowest_window(&histogram, 100.0), histogram);

        for kind in [
            Statistic::Median,
            Statistic::Mean,
            Statistic::Rms,
            Statistic::StdDev,
            Statistic::Integral,
        ] {
            assert_eq!(statistic(&histogram, kind, 100.0), kind.evaluate(&histogram));
        }
    }

    #[test]
    fn statistics_of_trimmed_peak() {
        let histogram = peaked();

        assert_eq!(statistic(&histogram, Statistic::Median, 80.0), Some(5.0));
        assert_eq!(statistic(&histogram, Statistic::Mean, 80.0), Some(5.0));
        assert_eq!(statistic(&histogram, Statistic::StdDev, 80.0), Some(0.5));
        assert_approx_eq!(
            f64,
            statistic(&histogram, Statistic::Rms, 80.0).unwrap(),
            25.25_f64.sqrt(),
            ulps = 4
        );
        assert_eq!(statistic(&histogram, Statistic::Integral, 80.0), Some(20.0));
        assert_eq!(statistic(&histogram, Statistic::Integral, 100.0), Some(24.0));
    }

    #[test]
    fn statistics_of_empty_histogram() {
        let histogram = Histogram::new(BinLimits::with_equal_bins(4, 0.0, 1.0).unwrap());

        assert_eq!(statistic(&histogram, Statistic::Median, 68.0), None);
        assert_eq!(statistic(&histogram, Statistic::Mean, 100.0), None);
        assert_eq!(statistic(&histogram, Statistic::Integral, 100.0), Some(0.0));
    }

    #[test]
    fn nearest_rank_percentile() {
        let values = [5.0, 3.0, 1.0, 4.0, 2.0];

        assert_eq!(percentile(&values, 50.0), Some(3.0));
        assert_eq!(percentile(&values, 100.0), Some(5.0));
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 16.0), Some(1.0));
        assert_eq!(percentile(&values, 84.0), Some(5.0));
        assert_eq!(percentile(&values, 100.5), None);
        assert_eq!(percentile(&values, -1.0), None);
        assert_eq!(percentile(&[], 50.0), None);
    }
}
