//! Energy-scale and smearing corrections for single electrons.

use super::category::CategoryKey;
use super::config::Configuration;
use super::correction::{CorrectionTable, CorrectionValue};
use super::error::{Error, Result, TableKind};
use super::reader;
use bitflags::bitflags;
use std::f64::consts::FRAC_PI_2;
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Value used by ntuples to mark a missing R9 or η.
const MISSING: f64 = -999.0;

bitflags! {
    /// Selects the components entering the combined scale uncertainty.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct UncertaintyComponents: u8 {
        /// Statistical uncertainty.
        const STAT = 0b001;
        /// Systematic uncertainty.
        const SYST = 0b010;
        /// Gain-switch uncertainty.
        const GAIN = 0b100;
    }
}

/// Smearing parameter that is varied by [`EnergyScaleCorrection::smearing_sigma_shifted`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SmearingParameter {
    /// The amplitude `rho`.
    Rho,
    /// The angle `phi`.
    Phi,
    /// Neither, giving the nominal smearing.
    None,
}

/// The quantities of one electron needed to look up its corrections.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    /// Run number.
    pub run: u32,
    /// Whether the electron is in the barrel.
    pub is_barrel: bool,
    /// Shower-shape variable R9.
    pub shape: Option<f64>,
    /// Pseudo-rapidity of the supercluster.
    pub position: Option<f64>,
    /// Transverse energy.
    pub energy: Option<f64>,
    /// Gain of the seed crystal.
    pub gain: u32,
}

impl Measurement {
    /// Converts raw ntuple values, where R9 or η equal to `-999` and a negative transverse energy
    /// mark missing values.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn from_raw(run: u32, is_barrel: bool, r9: f64, eta: f64, et: f64, gain: u32) -> Self {
        Self {
            run,
            is_barrel,
            shape: (r9 != MISSING).then_some(r9),
            position: (eta != MISSING).then_some(eta),
            energy: (et >= 0.0).then_some(et),
            gain,
        }
    }

    // `None` if any of the inputs is missing
    fn category(&self, gain: u32) -> Option<CategoryKey> {
        Some(CategoryKey::from_point(
            self.run,
            self.position?,
            self.shape?,
            self.energy?,
            gain,
        ))
    }
}

/// Scale and smearing corrections read from a pair of tables.
#[derive(Clone, Debug)]
pub struct EnergyScaleCorrection {
    scales: CorrectionTable,
    smearings: CorrectionTable,
}

fn with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(stem.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn read_table(
    path: &Path,
    kind: TableKind,
    read: impl FnOnce(BufReader<File>) -> Result<CorrectionTable>,
) -> Result<CorrectionTable> {
    log::info!("reading {kind} corrections from {}", path.display());

    let table = match File::open(path) {
        Ok(file) => read(BufReader::new(file))?,
        Err(err) => {
            log::warn!("file {} not readable: {err}", path.display());
            CorrectionTable::new()
        }
    };

    if table.is_empty() {
        log::warn!("{kind} correction map empty");
    }

    Ok(table)
}

impl EnergyScaleCorrection {
    /// Creates the corrections from already loaded tables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTables`] if both tables are empty.
    pub fn new(scales: CorrectionTable, smearings: CorrectionTable) -> Result<Self> {
        log::info!(
            "scales size {} smearings size {}",
            scales.len(),
            smearings.len()
        );

        if scales.is_empty() && smearings.is_empty() {
            return Err(Error::EmptyTables);
        }

        Ok(Self { scales, smearings })
    }

    /// Reads `<stem>_scales.dat` and `<stem>_smearings.dat` with the layouts given in `config`.
    /// A file that cannot be opened leaves its table empty.
    ///
    /// # Errors
    ///
    /// Returns an error if a table is inconsistent, see [`reader::read_scales`] and
    /// [`reader::read_smearings`], or if both tables are empty.
    pub fn from_files(stem: &Path, config: &Configuration) -> Result<Self> {
        let scales = read_table(&with_suffix(stem, "_scales.dat"), TableKind::Scale, |file| {
            reader::read_scales(file, config.scale_format)
        })?;
        let smearings = read_table(
            &with_suffix(stem, "_smearings.dat"),
            TableKind::Smearing,
            |file| reader::read_smearings(file, config.smearing_format),
        )?;

        Self::new(scales, smearings)
    }

    /// Table of scale corrections.
    #[must_use]
    pub const fn scales(&self) -> &CorrectionTable {
        &self.scales
    }

    /// Table of smearing corrections.
    #[must_use]
    pub const fn smearings(&self) -> &CorrectionTable {
        &self.smearings
    }

    /// Returns the scale correction stored for the category of `measurement`, or the default
    /// (all zero) correction if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTable`] if there are no scale corrections.
    pub fn scale_correction(&self, measurement: &Measurement) -> Result<CorrectionValue> {
        if self.scales.is_empty() {
            return Err(Error::EmptyTable(TableKind::Scale));
        }

        let Some(category) = measurement.category(measurement.gain) else {
            return Ok(CorrectionValue::default());
        };

        Ok(self.scales.get(&category).copied().unwrap_or_else(|| {
            log::debug!("scale category not found: {category}");
            CorrectionValue::default()
        }))
    }

    /// Returns the scale correction of `measurement`, or `0` if one of its inputs is missing or
    /// its category is not in the table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTable`] if there are no scale corrections and no input is missing.
    pub fn scale(&self, measurement: &Measurement) -> Result<f64> {
        if measurement.category(0).is_none() {
            return Ok(0.0);
        }

        Ok(self.scale_correction(measurement)?.scale)
    }

    /// Returns the statistical uncertainty of the scale correction. The `components` are
    /// accepted for compatibility but do not change the result; use
    /// [`Self::scale_uncertainty_combined`] for the quadrature sum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTable`] if there are no scale corrections.
    pub fn scale_uncertainty(
        &self,
        measurement: &Measurement,
        _components: UncertaintyComponents,
    ) -> Result<f64> {
        Ok(self.scale_correction(measurement)?.scale_err)
    }

    /// Returns the quadrature sum of the selected components of the scale uncertainty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTable`] if there are no scale corrections.
    pub fn scale_uncertainty_combined(
        &self,
        measurement: &Measurement,
        components: UncertaintyComponents,
    ) -> Result<f64> {
        Ok(combine(&self.scale_correction(measurement)?, components))
    }

    /// Returns the relative smearing of `measurement`, with `rho` and `phi` shifted by
    /// `n_sigma_rho` and `n_sigma_phi` times their uncertainties. Categories missing from the
    /// table get a smearing of about three per cent. Returns `0` if an input is missing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTable`] if there are no smearing corrections.
    pub fn smearing_sigma(
        &self,
        measurement: &Measurement,
        n_sigma_rho: f64,
        n_sigma_phi: f64,
    ) -> Result<f64> {
        if self.smearings.is_empty() {
            return Err(Error::EmptyTable(TableKind::Smearing));
        }

        let (Some(category), Some(energy)) = (measurement.category(0), measurement.energy) else {
            return Ok(0.0);
        };

        let correction = self.smearings.get(&category).copied().unwrap_or_else(|| {
            log::warn!("smearing category not found, applying 3% smearing: {category}");
            CorrectionValue::smearing((FRAC_PI_2, FRAC_PI_2), (0.03, 0.03), (0.0, 0.0))
        });

        let rho = correction.rho_err.mul_add(n_sigma_rho, correction.rho);
        let phi = correction.phi_err.mul_add(n_sigma_phi, correction.phi);

        let constant = rho * phi.sin();
        let alpha = rho * correction.e_mean * phi.cos();

        Ok(constant.hypot(alpha / energy.sqrt()))
    }

    /// Like [`Self::smearing_sigma`], shifting only `parameter` by `n_sigma`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyTable`] if there are no smearing corrections.
    pub fn smearing_sigma_shifted(
        &self,
        measurement: &Measurement,
        parameter: SmearingParameter,
        n_sigma: f64,
    ) -> Result<f64> {
        match parameter {
            SmearingParameter::Rho => self.smearing_sigma(measurement, n_sigma, 0.0),
            SmearingParameter::Phi => self.smearing_sigma(measurement, 0.0, n_sigma),
            SmearingParameter::None => self.smearing_sigma(measurement, 0.0, 0.0),
        }
    }
}

fn combine(correction: &CorrectionValue, components: UncertaintyComponents) -> f64 {
    [
        (UncertaintyComponents::STAT, correction.scale_err),
        (UncertaintyComponents::SYST, correction.scale_err_syst),
        (UncertaintyComponents::GAIN, correction.scale_err_gain),
    ]
    .into_iter()
    .filter(|(component, _)| components.contains(*component))
    .map(|(_, error)| error * error)
    .sum::<f64>()
    .sqrt()
}
