#![allow(missing_docs)]

mod helpers;
mod profile;
mod read;
mod scale;
mod smear;
mod stat;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use ecalcorr::config::{Configuration, ScaleFormat, SmearingFormat};
use enum_dispatch::enum_dispatch;
use git_version::git_version;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
pub struct GlobalConfiguration {
    /// Read the table layouts from a YAML file.
    #[arg(long, value_name = "YAML")]
    pub config: Option<PathBuf>,
    /// Layout of the scale table, overriding the configuration file.
    #[arg(long, value_name = "FORMAT")]
    pub scale_format: Option<ScaleFormat>,
    /// Layout of the smearing table, overriding the configuration file.
    #[arg(long, value_name = "FORMAT")]
    pub smearing_format: Option<SmearingFormat>,
    /// Increase the verbosity of the log messages.
    #[arg(action = ArgAction::Count, long, short)]
    pub verbose: u8,
    /// Only show error messages.
    #[arg(conflicts_with = "verbose", long, short)]
    pub quiet: bool,
}

impl GlobalConfiguration {
    /// Returns the reader configuration from `--config`, with the format options applied on top.
    pub fn reader_configuration(&self) -> Result<Configuration> {
        let mut config = if let Some(path) = &self.config {
            let file = File::open(path)
                .with_context(|| format!("unable to open '{}'", path.display()))?;
            Configuration::from_yaml(file)
                .with_context(|| format!("unable to read '{}'", path.display()))?
        } else {
            Configuration::default()
        };

        if let Some(format) = self.scale_format {
            config.scale_format = format;
        }
        if let Some(format) = self.smearing_format {
            config.smearing_format = format;
        }

        Ok(config)
    }

    /// Default log filter for the requested verbosity.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }

        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[enum_dispatch]
pub trait Subcommand {
    fn run(&self, cfg: &GlobalConfiguration) -> Result<ExitCode>;
}

#[enum_dispatch(Subcommand)]
#[derive(Parser)]
pub enum SubcommandEnum {
    Profile(profile::Opts),
    Read(read::Opts),
    Scale(scale::Opts),
    Smear(smear::Opts),
    Stat(stat::Opts),
}

#[derive(Parser)]
#[command(
    arg_required_else_help = true,
    author,
    about,
    disable_help_subcommand = true,
    name = "ecalcorr",
    version = git_version!(
        args = ["--always", "--dirty", "--long", "--tags"],
        cargo_prefix = "",
        fallback = "unknown"
    )
)]
pub struct Opts {
    #[command(flatten)]
    pub configuration: GlobalConfiguration,
    #[command(subcommand)]
    pub subcommand: SubcommandEnum,
}
