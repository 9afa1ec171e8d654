use super::GlobalConfiguration;
use anyhow::{bail, Context, Result};
use clap::Args;
use ecalcorr::bin::BinLimits;
use ecalcorr::bootstrap::Bootstrap;
use ecalcorr::histogram::{Histogram, Histogram2};
use ecalcorr::service::{EnergyScaleCorrection, Measurement};
use ecalcorr::statistic::Statistic;
use prettytable::format::{FormatBuilder, LinePosition, LineSeparator};
use prettytable::Table;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub fn create_table() -> Table {
    let mut table = Table::new();
    table.set_format(
        FormatBuilder::new()
            .column_separator(' ')
            .separator(LinePosition::Title, LineSeparator::new('-', '+', ' ', ' '))
            .build(),
    );
    table
}

pub fn read_service(stem: &Path, cfg: &GlobalConfiguration) -> Result<EnergyScaleCorrection> {
    let config = cfg.reader_configuration()?;

    log::debug!(
        "scale layout `{}`, smearing layout `{}`",
        config.scale_format,
        config.smearing_format
    );

    EnergyScaleCorrection::from_files(stem, &config)
        .with_context(|| format!("unable to load corrections '{}'", stem.display()))
}

/// The quantities of an electron as given on the command line.
#[derive(Args)]
pub struct MeasurementArgs {
    /// Run number.
    #[arg(long)]
    run: u32,
    /// Pseudo-rapidity of the supercluster, -999 if unknown.
    #[arg(allow_hyphen_values = true, long)]
    eta: f64,
    /// Shower-shape variable R9, -999 if unknown.
    #[arg(allow_hyphen_values = true, long)]
    r9: f64,
    /// Transverse energy, negative if unknown.
    #[arg(allow_hyphen_values = true, long)]
    et: f64,
    /// Gain of the seed crystal.
    #[arg(default_value_t = 12, long)]
    gain: u32,
    /// Mark the electron as being in the barrel.
    #[arg(long)]
    barrel: bool,
}

impl MeasurementArgs {
    pub fn measurement(&self) -> Measurement {
        Measurement::from_raw(self.run, self.barrel, self.r9, self.eta, self.et, self.gain)
    }
}

/// Options selecting the statistic and its uncertainty.
#[derive(Args)]
pub struct StatisticArgs {
    /// Statistic to compute: median, mean, rms, stddev or stats.
    #[arg(default_value = "median", long, short)]
    pub statistic: Statistic,
    /// Trim the distribution to its narrowest range containing this per cent of the entries.
    #[arg(default_value_t = 100.0, long, short)]
    pub percent: f64,
    /// Number of bootstrap resamples; without it no uncertainties are computed.
    #[arg(long, short)]
    pub resamples: Option<usize>,
    /// Confidence level in per cent of the bootstrap interval.
    #[arg(default_value_t = 68.0, long)]
    pub cl: f64,
    /// Seed of the random number generator.
    #[arg(default_value_t = 0, long)]
    pub seed: u64,
    /// Set the number of fractional digits shown.
    #[arg(default_value_t = 4, long)]
    pub digits: usize,
}

impl StatisticArgs {
    pub fn bootstrap(&self) -> Option<Bootstrap> {
        self.resamples.map(|resamples| Bootstrap::new(resamples, self.cl))
    }
}

// non-empty, non-comment lines split into numbers; `columns` numbers are required
fn read_rows(path: &Path, columns: usize) -> Result<Vec<Vec<f64>>> {
    let file =
        File::open(path).with_context(|| format!("unable to open '{}'", path.display()))?;
    let mut rows = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line?;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row = line
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<f64>, _>>()
            .with_context(|| format!("invalid number in line {}", index + 1))?;

        if row.len() != columns {
            bail!(
                "line {} has {} columns, expected {columns}",
                index + 1,
                row.len()
            );
        }

        rows.push(row);
    }

    Ok(rows)
}

/// Reads a histogram from a file with `low high content` per line. The bins must be
/// contiguous.
#[allow(clippy::float_cmp)]
pub fn read_histogram(path: &Path) -> Result<Histogram> {
    let rows = read_rows(path, 3)?;

    let Some(last) = rows.last() else {
        bail!("'{}' contains no bins", path.display());
    };

    if let Some(pair) = rows.windows(2).find(|pair| pair[0][1] != pair[1][0]) {
        bail!("bins are not contiguous: {} != {}", pair[0][1], pair[1][0]);
    }

    let limits = rows
        .iter()
        .map(|row| row[0])
        .chain(std::iter::once(last[1]))
        .collect();
    let contents = rows.iter().map(|row| row[2]).collect();

    Ok(Histogram::from_contents(BinLimits::new(limits)?, contents)?)
}

fn edges(rows: &[Vec<f64>], low: usize) -> Result<BinLimits> {
    let mut edges: Vec<_> = rows.iter().flat_map(|row| [row[low], row[low + 1]]).collect();
    edges.sort_by(f64::total_cmp);
    edges.dedup();

    Ok(BinLimits::new(edges)?)
}

/// Reads a two-dimensional histogram from a file with `xlow xhigh ylow yhigh content` per line.
pub fn read_histogram2(path: &Path) -> Result<Histogram2> {
    let rows = read_rows(path, 5)?;

    if rows.is_empty() {
        bail!("'{}' contains no bins", path.display());
    }

    let mut histogram = Histogram2::new(edges(&rows, 0)?, edges(&rows, 2)?);

    for row in &rows {
        histogram.fill(0.5 * (row[0] + row[1]), 0.5 * (row[2] + row[3]), row[4]);
    }

    Ok(histogram)
}
