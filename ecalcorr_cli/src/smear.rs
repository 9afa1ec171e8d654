use super::helpers::{self, MeasurementArgs};
use super::{GlobalConfiguration, Subcommand};
use anyhow::{Error, Result};
use clap::{Parser, ValueHint};
use ecalcorr::service::SmearingParameter;
use prettytable::{cell, row};
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute the relative smearing of an electron and its variations.
#[derive(Parser)]
pub struct Opts {
    /// Path and file-name prefix of the `_scales.dat` and `_smearings.dat` tables.
    #[arg(value_hint = ValueHint::AnyPath)]
    stem: PathBuf,
    #[command(flatten)]
    electron: MeasurementArgs,
    /// Shift rho by this many standard deviations.
    #[arg(allow_hyphen_values = true, default_value_t = 0.0, long)]
    n_sigma_rho: f64,
    /// Shift phi by this many standard deviations.
    #[arg(allow_hyphen_values = true, default_value_t = 0.0, long)]
    n_sigma_phi: f64,
    /// Set the number of fractional digits shown.
    #[arg(default_value_t = 5, long)]
    digits: usize,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let service = helpers::read_service(&self.stem, cfg)?;
        let electron = self.electron.measurement();

        let sigma = service.smearing_sigma(&electron, self.n_sigma_rho, self.n_sigma_phi)?;
        let variations = [SmearingParameter::Rho, SmearingParameter::Phi]
            .into_iter()
            .map(|parameter| {
                Ok::<_, Error>((
                    service.smearing_sigma_shifted(&electron, parameter, -1.0)?,
                    service.smearing_sigma_shifted(&electron, parameter, 1.0)?,
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut table = helpers::create_table();
        table.set_titles(row![c => "sigma", "rho-1", "rho+1", "phi-1", "phi+1"]);

        let row = table.add_empty_row();
        row.add_cell(cell!(r->format!("{:.*}", self.digits, sigma)));
        for (down, up) in variations {
            row.add_cell(cell!(r->format!("{:.*}", self.digits, down)));
            row.add_cell(cell!(r->format!("{:.*}", self.digits, up)));
        }

        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
