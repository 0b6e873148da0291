//! This module contains business logic for the commands for the application.
//!
//! The main entry point is the [`command_from_args`] function which converts CLI arguments into a command.
use anyhow::Result;

use crate::{
    args::{ComputeArgs, GlobalArgs, Instances},
    commands::attach_disk::AttachDisk,
    release_track::ReleaseTrack,
};
pub use core::{Command, CommandWithOutput, CommandWithOutputExt};

pub mod attach_disk;
mod core;

/// Convert CLI arguments into a command running on the given release track.
///
/// The output of the command will be formatted using the requested format and printed to stdout.
pub fn command_from_args(
    track: ReleaseTrack,
    args: ComputeArgs,
    global_args: &GlobalArgs,
) -> Result<Box<dyn Command>> {
    let format = global_args.format.unwrap_or_default();

    match args {
        ComputeArgs::Instances(Instances::AttachDisk(attach_disk_args)) => {
            AttachDisk::try_from((track, attach_disk_args, global_args))?
                .with_print_to_stdout(format)
        }
    }
}

/// Dotted command path used to prefix error messages, e.g. `compute.beta.instances.attach-disk`.
pub fn command_path(track: ReleaseTrack, args: &ComputeArgs) -> String {
    let command = match args {
        ComputeArgs::Instances(Instances::AttachDisk(_)) => "instances.attach-disk",
    };

    match track {
        ReleaseTrack::Ga => format!("compute.{command}"),
        ReleaseTrack::Beta => format!("compute.beta.{command}"),
        ReleaseTrack::Alpha => format!("compute.alpha.{command}"),
    }
}
