use std::process::ExitCode;

use args::{Cli, ComputeArgs};
use clap::Parser;
use release_track::ReleaseTrack;
use tracing::debug;

mod args;
mod commands;
mod config;
mod csek;
mod dependencies;
mod error;
mod formatting;
mod interaction;
mod logging;
mod models;
mod release_track;
mod request;
mod resources;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::setup_logging(cli.global_args.debug);

    let (track, args): (ReleaseTrack, ComputeArgs) = cli.command.into();
    let command_path = commands::command_path(track, &args);
    debug!(command = %command_path, "running command");

    let result = match commands::command_from_args(track, args, &cli.global_args) {
        Ok(mut command) => command.execute().await,
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!(
                "{} ({command_path}) {err:#}",
                console::style("ERROR:").for_stderr().red().bold()
            );
            ExitCode::FAILURE
        }
    }
}
