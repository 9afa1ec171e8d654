use super::helpers::{self, StatisticArgs};
use super::{GlobalConfiguration, Subcommand};
use anyhow::{bail, Result};
use clap::{Parser, ValueHint};
use ecalcorr::statistic;
use prettytable::{cell, Row};
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute a robust statistic of a distribution.
#[derive(Parser)]
pub struct Opts {
    /// Path to the distribution, with `low high content` on every line.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    #[command(flatten)]
    args: StatisticArgs,
}

impl Subcommand for Opts {
    fn run(&self, _: &GlobalConfiguration) -> Result<ExitCode> {
        let histogram = helpers::read_histogram(&self.input)?;
        let args = &self.args;

        if !(0.0..=100.0).contains(&args.percent) {
            bail!("percentage {} is outside of [0, 100]", args.percent);
        }

        let window = statistic::narrowest_window(&histogram, args.percent);

        let mut title = Row::empty();
        title.add_cell(cell!(c->"left"));
        title.add_cell(cell!(c->"right"));
        title.add_cell(cell!(c->args.statistic));

        let mut table = helpers::create_table();
        let row = table.add_empty_row();
        row.add_cell(cell!(r->format!("{}", window.limits().left())));
        row.add_cell(cell!(r->format!("{}", window.limits().right())));

        if let Some(bootstrap) = args.bootstrap() {
            let Some(estimate) =
                bootstrap.estimate_seeded(&histogram, args.statistic, args.percent, args.seed)
            else {
                bail!("the distribution in '{}' is empty", self.input.display());
            };

            title.add_cell(cell!(c->"-err"));
            title.add_cell(cell!(c->"+err"));

            row.add_cell(cell!(r->format!("{:.*}", args.digits, estimate.value)));
            row.add_cell(cell!(r->format!("{:.*}", args.digits, estimate.err_low)));
            row.add_cell(cell!(r->format!("{:.*}", args.digits, estimate.err_high)));
        } else {
            let Some(value) = args.statistic.evaluate(&window) else {
                bail!("the distribution in '{}' is empty", self.input.display());
            };

            row.add_cell(cell!(r->format!("{:.*}", args.digits, value)));
        }

        table.set_titles(title);
        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
