use clap::Parser;
use ecalcorr_cli::{Opts, Subcommand};
use std::io::ErrorKind;
use std::process::{ExitCode, Termination};

fn main() -> ExitCode {
    let opts = Opts::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(opts.configuration.log_filter()),
    )
    .init();

    match opts.subcommand.run(&opts.configuration) {
        Ok(code) => code,
        Err(error) => {
            // a closed pipe, e.g. from `ecalcorr read ... | head`, is not an error
            if error
                .downcast_ref::<std::io::Error>()
                .is_some_and(|err| err.kind() == ErrorKind::BrokenPipe)
            {
                return ExitCode::SUCCESS;
            }

            Err::<(), _>(error).report()
        }
    }
}
