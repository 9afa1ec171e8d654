use super::helpers::{self, MeasurementArgs};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use ecalcorr::service::UncertaintyComponents;
use prettytable::{cell, row};
use std::path::PathBuf;
use std::process::ExitCode;

/// Look up the energy-scale correction of an electron.
#[derive(Parser)]
pub struct Opts {
    /// Path and file-name prefix of the `_scales.dat` and `_smearings.dat` tables.
    #[arg(value_hint = ValueHint::AnyPath)]
    stem: PathBuf,
    #[command(flatten)]
    electron: MeasurementArgs,
    /// Set the number of fractional digits shown.
    #[arg(default_value_t = 5, long)]
    digits: usize,
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let service = helpers::read_service(&self.stem, cfg)?;
        let electron = self.electron.measurement();

        let scale = service.scale(&electron)?;
        let stat = service.scale_uncertainty(&electron, UncertaintyComponents::all())?;
        let total = service.scale_uncertainty_combined(&electron, UncertaintyComponents::all())?;

        let mut table = helpers::create_table();
        table.set_titles(row![c => "scale", "stat", "total"]);
        table.add_row(row![
            r->format!("{:.*}", self.digits, scale),
            r->format!("{:.*}", self.digits, stat),
            r->format!("{:.*}", self.digits, total)
        ]);
        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
