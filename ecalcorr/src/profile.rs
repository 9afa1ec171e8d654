//! Statistics of y for every x bin of a two-dimensional distribution.

use super::bootstrap::{Bootstrap, Estimate};
use super::error::{Error, Result};
use super::histogram::{Histogram, Histogram2};
use super::statistic::{self, Statistic, MIN_INTEGRAL};
use rand::SeedableRng;
use rand_pcg::Pcg64;
use rayon::prelude::*;

/// Points with asymmetric errors in both coordinates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    x: Vec<Estimate>,
    y: Vec<Estimate>,
}

impl Graph {
    /// Creates a graph from the coordinates `x` and `y`. If they differ in length, the error is
    /// logged and the graph is empty.
    #[must_use]
    pub fn new(x: Vec<Estimate>, y: Vec<Estimate>) -> Self {
        if x.len() != y.len() {
            log::error!(
                "unequal coordinate lists: {} x values, {} y values",
                x.len(),
                y.len()
            );
            return Self::default();
        }

        Self { x, y }
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if the graph has no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// The x coordinates.
    #[must_use]
    pub fn x(&self) -> &[Estimate] {
        &self.x
    }

    /// The y coordinates.
    #[must_use]
    pub fn y(&self) -> &[Estimate] {
        &self.y
    }

    /// Iterates over the `(x, y)` points.
    pub fn points(&self) -> impl Iterator<Item = (&Estimate, &Estimate)> {
        self.x.iter().zip(&self.y)
    }
}

fn check_percent(percent: f64) -> Result<()> {
    if (0.0..=100.0).contains(&percent) {
        Ok(())
    } else {
        Err(Error::InvalidPercentage(percent))
    }
}

/// Returns a histogram with the binning of the x axis of `histogram` whose bins contain
/// `kind` of the y distribution of the corresponding x bin, trimmed to `percent` per cent. Bins
/// with empty y distributions stay at zero.
///
/// # Errors
///
/// Returns [`Error::InvalidPercentage`] if `percent` is outside `[0, 100]`.
pub fn profile(histogram: &Histogram2, kind: Statistic, percent: f64) -> Result<Histogram> {
    check_percent(percent)?;

    let mut result = Histogram::new(histogram.x_limits().clone());

    for bin in 0..result.bins() {
        let projection = histogram.projection_y(bin);

        if projection.integral() < MIN_INTEGRAL {
            continue;
        }

        if let Some(value) = statistic::statistic(&projection, kind, percent) {
            result.set_bin_content(bin, value);
        }
    }

    Ok(result)
}

/// Like [`profile`], but returns a graph with bootstrap uncertainties. The x coordinates are the
/// bin centers with the bin edges as errors; x bins with empty y distributions are left out. The
/// bins are processed in parallel, each with a [`Pcg64`] generator seeded from `seed` and the bin
/// index.
///
/// # Errors
///
/// Returns [`Error::InvalidPercentage`] if `percent` is outside `[0, 100]`.
pub fn profile_with_errors(
    histogram: &Histogram2,
    kind: Statistic,
    percent: f64,
    bootstrap: &Bootstrap,
    seed: u64,
) -> Result<Graph> {
    check_percent(percent)?;

    let limits = histogram.x_limits();

    let (x, y): (Vec<_>, Vec<_>) = (0..limits.bins())
        .into_par_iter()
        .filter_map(|bin| {
            let projection = histogram.projection_y(bin);

            if projection.integral() < MIN_INTEGRAL {
                return None;
            }

            let mut rng = Pcg64::seed_from_u64(seed.wrapping_add(bin as u64));
            let y = bootstrap.estimate(&projection, kind, percent, &mut rng)?;
            let center = limits.center(bin);
            let x = Estimate::new(
                center,
                center - limits.low_edge(bin),
                limits.up_edge(bin) - center,
            );

            Some((x, y))
        })
        .unzip();

    Ok(Graph::new(x, y))
}
