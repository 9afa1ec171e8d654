use super::helpers;
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Args, Parser, ValueHint};
use ecalcorr::category::CategoryKey;
use ecalcorr::correction::{CorrectionTable, CorrectionValue};
use prettytable::{cell, Row, Table};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Args)]
#[group(multiple = false, required = false)]
struct Group {
    /// Show only the scale corrections.
    #[arg(long)]
    scales: bool,
    /// Show only the smearing corrections.
    #[arg(long)]
    smearings: bool,
}

/// Show the contents of the correction tables.
#[derive(Parser)]
pub struct Opts {
    /// Path and file-name prefix of the `_scales.dat` and `_smearings.dat` tables.
    #[arg(value_hint = ValueHint::AnyPath)]
    stem: PathBuf,
    #[command(flatten)]
    group: Group,
}

fn category_titles(title: &mut Row) {
    for label in ["runs", "|eta|", "R9", "Et"] {
        let mut cell = cell!(c->label);
        cell.set_hspan(2);
        title.add_cell(cell);
    }
    title.add_cell(cell!(c->"gain"));
}

fn category_cells(row: &mut Row, key: &CategoryKey) {
    let runs = key.runs();
    row.add_cell(cell!(r->format!("{}", runs.min)));
    row.add_cell(cell!(r->format!("{}", runs.max)));

    for interval in [key.position(), key.shape(), key.energy()] {
        row.add_cell(cell!(r->format!("{}", interval.min)));
        row.add_cell(cell!(r->format!("{}", interval.max)));
    }

    row.add_cell(cell!(r->format!("{}", key.gain())));
}

fn table(
    corrections: &CorrectionTable,
    labels: &[&str],
    values: impl Fn(&CorrectionValue) -> Vec<f64>,
) -> Table {
    let mut title = Row::empty();
    title.add_cell(cell!(c->"c"));
    category_titles(&mut title);
    for label in labels {
        title.add_cell(cell!(c->label));
    }

    let mut table = helpers::create_table();
    table.set_titles(title);

    for (index, (key, value)) in corrections.iter().enumerate() {
        let row = table.add_empty_row();

        row.add_cell(cell!(r->format!("{index}")));
        category_cells(row, key);

        for number in values(value) {
            row.add_cell(cell!(r->format!("{number}")));
        }
    }

    table
}

impl Subcommand for Opts {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode> {
        let service = helpers::read_service(&self.stem, cfg)?;
        let all = !self.group.scales && !self.group.smearings;

        if all || self.group.scales {
            table(
                service.scales(),
                &["scale", "stat", "syst", "gain-err"],
                |value| {
                    vec![
                        value.scale,
                        value.scale_err,
                        value.scale_err_syst,
                        value.scale_err_gain,
                    ]
                },
            )
            .printstd();
        }

        if all {
            println!();
        }

        if all || self.group.smearings {
            table(
                service.smearings(),
                &["Emean", "rho", "rho-err", "phi", "phi-err"],
                |value| {
                    vec![
                        value.e_mean,
                        value.rho,
                        value.rho_err,
                        value.phi,
                        value.phi_err,
                    ]
                },
            )
            .printstd();
        }

        Ok(ExitCode::SUCCESS)
    }
}
