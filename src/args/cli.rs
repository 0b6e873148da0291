//! Root command for the CLI.
//!
//! Commands can be run on three release tracks, selected the same way the Cloud SDK does it:
//! `compute instances ...` runs on GA, `compute beta instances ...` and
//! `compute alpha instances ...` run on the pre-release tracks.
//!
//! The commands themselves are defined in the [`ComputeArgs`](super::ComputeArgs) enum.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{formatting::Format, release_track::ReleaseTrack};

use super::ComputeArgs;

/// Manage Compute Engine resources
#[derive(Parser)]
#[command(name = "compute", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global_args: GlobalArgs,

    #[command(subcommand)]
    pub command: TrackSubCommands,
}

#[derive(Args)]
pub struct GlobalArgs {
    /// Enable debug logging.
    ///
    /// Setting this flag will set the log level to debug and only show logs from this crate.
    /// The log level can also be set with the `COMPUTE_CLI_LOG` environment variable.
    #[arg(global = true, hide = true, long, short = 'D', default_value = "false")]
    pub debug: bool,

    /// Output format.
    #[arg(global = true, long = "output", short = 'o')]
    pub format: Option<Format>,

    /// Project ID to use for this invocation.
    #[arg(global = true, long, env = "CLOUDSDK_CORE_PROJECT")]
    pub project: Option<String>,

    /// File containing an OAuth2 access token used to call the Compute API.
    #[arg(global = true, long, env = "CLOUDSDK_AUTH_ACCESS_TOKEN_FILE")]
    pub access_token_file: Option<PathBuf>,

    /// OAuth2 access token used to call the Compute API.
    #[arg(
        global = true,
        hide = true,
        long,
        env = "CLOUDSDK_AUTH_ACCESS_TOKEN",
        hide_env_values = true
    )]
    pub access_token: Option<String>,

    /// Override the Compute API base URL, including the API version.
    #[arg(
        global = true,
        hide = true,
        long,
        env = "CLOUDSDK_API_ENDPOINT_OVERRIDES_COMPUTE"
    )]
    pub api_endpoint: Option<String>,
}

/// Release track prefixes.
///
/// GA commands live at the root; the pre-release tracks nest the same commands below a
/// track name.
#[derive(Subcommand)]
pub enum TrackSubCommands {
    /// Alpha versions of the commands. These may change without notice.
    Alpha {
        #[command(subcommand)]
        command: ComputeArgs,
    },
    /// Beta versions of the commands.
    Beta {
        #[command(subcommand)]
        command: ComputeArgs,
    },
    #[command(flatten)]
    Ga(ComputeArgs),
}

/// Split the parsed command into the track it runs on and the command itself.
impl From<TrackSubCommands> for (ReleaseTrack, ComputeArgs) {
    fn from(command: TrackSubCommands) -> Self {
        match command {
            TrackSubCommands::Alpha { command } => (ReleaseTrack::Alpha, command),
            TrackSubCommands::Beta { command } => (ReleaseTrack::Beta, command),
            TrackSubCommands::Ga(command) => (ReleaseTrack::Ga, command),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;
    use crate::args::Instances;

    fn parse(args: &[&str]) -> (ReleaseTrack, ComputeArgs) {
        let cli = Cli::try_parse_from(args).expect("arguments should parse");
        cli.command.into()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ga_track() {
        let (track, command) = parse(&[
            "compute",
            "instances",
            "attach-disk",
            "vm-1",
            "--disk",
            "d1",
            "--zone",
            "us-central1-a",
        ]);
        assert_eq!(track, ReleaseTrack::Ga);

        let ComputeArgs::Instances(Instances::AttachDisk(args)) = command;
        assert_eq!(args.instance, "vm-1");
        assert_eq!(args.disk.as_deref(), Some("d1"));
        assert_eq!(args.zone.as_deref(), Some("us-central1-a"));
        assert!(!args.force_attach);
        assert!(!args.boot);
    }

    #[test]
    fn test_beta_track() {
        let (track, command) = parse(&[
            "compute",
            "beta",
            "instances",
            "attach-disk",
            "vm-1",
            "--disk",
            "d1",
            "--disk-scope",
            "regional",
            "--force-attach",
        ]);
        assert_eq!(track, ReleaseTrack::Beta);

        let ComputeArgs::Instances(Instances::AttachDisk(args)) = command;
        assert_eq!(args.disk_scope.as_deref(), Some("regional"));
        assert!(args.force_attach);
    }

    #[test]
    fn test_alpha_track_with_global_args_after_subcommand() {
        let cli = Cli::try_parse_from([
            "compute",
            "alpha",
            "instances",
            "attach-disk",
            "vm-1",
            "--disk",
            "d1",
            "--boot",
            "--project",
            "my-project",
            "-o",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.global_args.project.as_deref(), Some("my-project"));
        assert_eq!(cli.global_args.format, Some(Format::Json));

        let (track, command): (ReleaseTrack, ComputeArgs) = cli.command.into();
        assert_eq!(track, ReleaseTrack::Alpha);
        let ComputeArgs::Instances(Instances::AttachDisk(args)) = command;
        assert!(args.boot);
    }

    #[test]
    fn test_instance_is_required() {
        assert!(Cli::try_parse_from(["compute", "instances", "attach-disk"]).is_err());
    }
}
