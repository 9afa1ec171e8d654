use super::helpers::{self, StatisticArgs};
use super::{GlobalConfiguration, Subcommand};
use anyhow::Result;
use clap::{Parser, ValueHint};
use ecalcorr::profile;
use prettytable::{cell, Row};
use std::path::PathBuf;
use std::process::ExitCode;

/// Compute a statistic of y for every x bin of a two-dimensional distribution.
#[derive(Parser)]
pub struct Opts {
    /// Path to the distribution, with `xlow xhigh ylow yhigh content` on every line.
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
    #[command(flatten)]
    args: StatisticArgs,
}

impl Subcommand for Opts {
    fn run(&self, _: &GlobalConfiguration) -> Result<ExitCode> {
        let histogram = helpers::read_histogram2(&self.input)?;
        let args = &self.args;

        let mut table = helpers::create_table();
        let mut title = Row::empty();

        if let Some(bootstrap) = args.bootstrap() {
            let graph = profile::profile_with_errors(
                &histogram,
                args.statistic,
                args.percent,
                &bootstrap,
                args.seed,
            )?;

            for label in ["x", "-dx", "+dx"] {
                title.add_cell(cell!(c->label));
            }
            title.add_cell(cell!(c->args.statistic));
            title.add_cell(cell!(c->"-err"));
            title.add_cell(cell!(c->"+err"));

            for (x, y) in graph.points() {
                let row = table.add_empty_row();

                row.add_cell(cell!(r->format!("{}", x.value)));
                row.add_cell(cell!(r->format!("{}", x.err_low)));
                row.add_cell(cell!(r->format!("{}", x.err_high)));
                row.add_cell(cell!(r->format!("{:.*}", args.digits, y.value)));
                row.add_cell(cell!(r->format!("{:.*}", args.digits, y.err_low)));
                row.add_cell(cell!(r->format!("{:.*}", args.digits, y.err_high)));
            }
        } else {
            let result = profile::profile(&histogram, args.statistic, args.percent)?;
            let limits = result.limits();

            title.add_cell(cell!(c->"b"));
            let mut cell = cell!(c->"x");
            cell.set_hspan(2);
            title.add_cell(cell);
            title.add_cell(cell!(c->args.statistic));

            for (bin, value) in result.contents().iter().enumerate() {
                let row = table.add_empty_row();

                row.add_cell(cell!(r->format!("{bin}")));
                row.add_cell(cell!(r->format!("{}", limits.low_edge(bin))));
                row.add_cell(cell!(r->format!("{}", limits.up_edge(bin))));
                row.add_cell(cell!(r->format!("{:.*}", args.digits, value)));
            }
        }

        table.set_titles(title);
        table.printstd();

        Ok(ExitCode::SUCCESS)
    }
}
