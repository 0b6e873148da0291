//! CLI argument parsing layer.
//!
//! This module provides the CLI interface using clap derive macros.
//! It only describes the command line; values are validated by [`crate::commands`],
//! which receives these parsed arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod cli;

pub use cli::{Cli, GlobalArgs};

/// Compute Engine command groups, shared by every release track.
#[derive(Subcommand)]
pub enum ComputeArgs {
    #[command(subcommand)]
    Instances(Instances),
}

/// Read and manipulate Compute Engine virtual machine instances.
#[derive(Subcommand)]
pub enum Instances {
    AttachDisk(AttachDisk),
}

/// Attach a disk to an instance.
///
/// For example, `compute instances attach-disk example-instance --disk DISK --zone us-central1-a`
/// attaches the disk named DISK to the instance named example-instance in zone us-central1-a.
///
/// After you create and attach a new disk to an instance, you must format and mount the disk
/// so that the operating system can use the available storage space.
#[derive(Parser)]
pub struct AttachDisk {
    /// Name of the instance to operate on, or its full resource URL.
    #[arg(index = 1, value_name = "INSTANCE")]
    pub instance: String,

    /// The name of the disk to attach to the instance.
    //
    // Kept optional for clap so a missing or empty value is reported like every other
    // invalid option.
    #[arg(long, value_name = "DISK")]
    pub disk: Option<String>,

    /// An optional name that indicates the disk name the guest operating system will see.
    ///
    /// Device name does not correspond to the mounted volume name.
    #[arg(long, value_name = "DEVICE_NAME")]
    pub device_name: Option<String>,

    /// Specifies the mode of the disk.
    ///
    /// `ro` attaches read-only. `rw` attaches read-write; it is an error to attach a disk in
    /// read-write mode to more than one instance. [possible values: ro, rw] [default: rw]
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// The scope of the disk. Only honoured by the alpha and beta tracks.
    ///
    /// [possible values: zonal, regional] [default: zonal]
    #[arg(long, value_name = "SCOPE")]
    pub disk_scope: Option<String>,

    /// Attach the disk even if it is currently attached to another instance.
    ///
    /// The attachment succeeds even if detaching from the previous instance fails at first;
    /// the server keeps trying to detach the disk in the background.
    /// Only honoured by the alpha and beta tracks.
    #[arg(long, default_value = "false")]
    pub force_attach: bool,

    /// Attach the disk to the instance as a boot disk. Only honoured by the alpha track.
    #[arg(long, default_value = "false")]
    pub boot: bool,

    /// Path to a JSON file of customer-supplied encryption keys, or `-` to read from stdin.
    #[arg(long, value_name = "FILE")]
    pub csek_key_file: Option<PathBuf>,

    /// Zone of the instance.
    #[arg(long, env = "CLOUDSDK_COMPUTE_ZONE")]
    pub zone: Option<String>,
}
