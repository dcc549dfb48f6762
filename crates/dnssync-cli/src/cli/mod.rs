//! CLI argument parsing and check dispatch.

pub mod args;
pub mod check;

use args::{normalize_args, Cli};
use clap::Parser;
use dnssync_core::{CheckReport, Status};
use std::ffi::OsString;
use std::process::ExitCode;

use crate::config::{Config, Settings};
use crate::output;

/// Run the check with the process arguments.
pub async fn run() -> ExitCode {
    run_from(std::env::args_os()).await
}

/// Run the check with the given arguments.
///
/// Usage errors exit UNKNOWN, as monitoring plugins do.
pub async fn run_from<I, T>(args: I) -> ExitCode
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let cli = match Cli::try_parse_from(normalize_args(args)) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                exit_code(Status::Unknown)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    crate::logging::init(cli.verbosity());

    let (report, format, verbosity) = match Config::load(cli.config.as_deref()) {
        Ok(config) => {
            let settings = Settings::resolve(&cli, config);
            (check::execute(&settings).await, settings.output, settings.verbosity)
        }
        Err(e) => (
            CheckReport::failed(format!("{e:#}")),
            cli.output.unwrap_or_default(),
            cli.verbosity(),
        ),
    };

    println!("{}", output::render(&report, format, verbosity));
    exit_code(report.status)
}

fn exit_code(status: Status) -> ExitCode {
    ExitCode::from(u8::try_from(status.exit_code()).unwrap_or(3))
}
