use anyhow::Result;
use ecalcorr::bin::BinLimits;
use ecalcorr::bootstrap::Bootstrap;
use ecalcorr::config::{ScaleFormat, SmearingFormat};
use ecalcorr::histogram::{Histogram, Histogram2};
use ecalcorr::profile;
use ecalcorr::reader;
use ecalcorr::service::{EnergyScaleCorrection, Measurement};
use ecalcorr::statistic::{self, Statistic};
use rand::Rng;
use rand_pcg::Pcg64;
use std::f64::consts::PI;

const Z_MASS: f64 = 91.1876;

const SCALES: &str = "\
# category region runMin runMax deltaP errBin errStat errSyst
EBlowEta runNumber 1 999999 1.010 0.5 0.001 0.002
EBhighEta runNumber 1 999999 0.990 0.5 0.002 0.003
EElowEta runNumber 1 999999 1.020 0.5 0.003 0.004
EEhighEta runNumber 1 999999 0.980 0.5 0.004 0.005
";

const SMEARINGS: &str = "\
# category Emean err rho err phi err
EBlowEta-gold 0 0 0.008 0.001 M_PI_2 0.1
EBlowEta-bad 0 0 0.010 0.001 M_PI_2 0.1
EBhighEta-gold 0 0 0.010 0.001 M_PI_2 0.1
EBhighEta-bad 0 0 0.012 0.001 M_PI_2 0.1
EElowEta-gold 0 0 0.012 0.001 M_PI_2 0.1
EElowEta-bad 0 0 0.014 0.001 M_PI_2 0.1
EEhighEta-gold 0 0 0.014 0.001 M_PI_2 0.1
EEhighEta-bad 0 0 0.016 0.001 M_PI_2 0.1
";

// standard normal number, Box-Muller
fn gauss(rng: &mut impl Rng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);

    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn service() -> Result<EnergyScaleCorrection> {
    Ok(EnergyScaleCorrection::new(
        reader::read_scales(SCALES.as_bytes(), ScaleFormat::Label)?,
        reader::read_smearings(SMEARINGS.as_bytes(), SmearingFormat::Compact)?,
    )?)
}

fn fill_z_peak(
    rng: &mut impl Rng,
    service: &EnergyScaleCorrection,
    events: usize,
) -> Result<Histogram2> {
    let mut histogram = Histogram2::new(
        BinLimits::new(vec![0.0, 1.0, 1.479, 2.0, 2.5])?,
        BinLimits::with_equal_bins(80, 80.0, 100.0)?,
    );

    for _ in 0..events {
        let eta: f64 = rng.gen_range(-2.5..2.5);
        let electron = Measurement::from_raw(
            rng.gen_range(1000..2000),
            eta.abs() < 1.479,
            rng.gen_range(0.5..1.0),
            eta,
            rng.gen_range(25.0..80.0),
            12,
        );

        let scale = service.scale(&electron)?;
        let sigma = service.smearing_sigma(&electron, 0.0, 0.0)?;
        let mass = Z_MASS * scale * (1.0 + 0.02 * gauss(rng)) * sigma.mul_add(gauss(rng), 1.0);

        histogram.fill(eta.abs(), mass, 1.0);
    }

    Ok(histogram)
}

#[test]
fn corrected_z_peak_per_region() -> Result<()> {
    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
    let service = service()?;
    let histogram = fill_z_peak(&mut rng, &service, 40_000)?;

    let medians = profile::profile(&histogram, Statistic::Median, 100.0)?;

    for (median, scale) in medians.contents().iter().zip([1.01, 0.99, 1.02, 0.98]) {
        assert!(
            (median - Z_MASS * scale).abs() < 0.3,
            "median {median} for scale {scale}"
        );
    }

    let graph = profile::profile_with_errors(
        &histogram,
        Statistic::Median,
        100.0,
        &Bootstrap::new(100, 68.0),
        0x5eed,
    )?;

    assert_eq!(graph.len(), 4);

    for ((x, y), median) in graph.points().zip(medians.contents()) {
        assert!(x.err_low > 0.0 && x.err_high > 0.0);
        assert_eq!(y.value, *median);
        assert!(y.err_low >= 0.0 && y.err_low < 0.2, "{y}");
        assert!(y.err_high >= 0.0 && y.err_high < 0.2, "{y}");
    }

    Ok(())
}

#[test]
fn missing_inputs_are_not_corrected() -> Result<()> {
    let service = service()?;

    for electron in [
        Measurement::from_raw(1500, true, -999.0, 0.3, 40.0, 12),
        Measurement::from_raw(1500, true, 0.9, -999.0, 40.0, 12),
        Measurement::from_raw(1500, true, 0.9, 0.3, -1.0, 12),
    ] {
        assert_eq!(service.scale(&electron)?, 0.0);
        assert_eq!(service.smearing_sigma(&electron, 0.0, 0.0)?, 0.0);
    }

    Ok(())
}

#[test]
fn trimming_suppresses_tails() -> Result<()> {
    let mut rng = Pcg64::new(0xcafef00dd15ea5e5, 0xa02bdbf7bb3c0a7ac28fa16a64abf96);
    let mut histogram = Histogram::new(BinLimits::with_equal_bins(100, 60.0, 120.0)?);

    for _ in 0..10_000 {
        histogram.fill(Z_MASS + 1.5 * gauss(&mut rng), 1.0);
    }

    // flat background
    for _ in 0..2_000 {
        histogram.fill(rng.gen_range(60.0..120.0), 1.0);
    }

    let full = statistic::statistic(&histogram, Statistic::StdDev, 100.0).unwrap();
    let trimmed = statistic::statistic(&histogram, Statistic::StdDev, 68.0).unwrap();

    assert!(trimmed < 0.5 * full, "{trimmed} vs {full}");
    assert!(
        (statistic::statistic(&histogram, Statistic::Mean, 68.0).unwrap() - Z_MASS).abs() < 0.5
    );

    Ok(())
}
