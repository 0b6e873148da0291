//! Command to attach a persistent disk to an instance.
//!
//! The command validates its options, resolves the instance, assembles the request for the
//! active release track and sends it, waiting for the resulting operation to finish.
//! All external collaborators are injected so the whole flow can be tested with mocks.

use std::{fmt::Display, path::PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{
    args::{self, GlobalArgs},
    commands::CommandWithOutput,
    config::ComputeConfig,
    csek::CsekKeyStore,
    dependencies::{ComputeClient, FileReader, InstanceDiskAttacher, ResourceResolver, TokioFs},
    error::AttachDiskError,
    interaction::{Interaction, SpinnerInteraction},
    models::{DiskMode, Operation},
    release_track::ReleaseTrack,
    request::{AttachOptions, build_request},
    resources::{DiskScope, ResourceParser},
};

pub struct AttachDisk {
    track: ReleaseTrack,
    instance: String,
    project: Option<String>,
    zone: Option<String>,
    options: AttachOptions,
    csek_key_file: Option<PathBuf>,

    interaction: Box<dyn SpinnerInteraction + Send + Sync>,
    file_reader: Box<dyn FileReader + Send + Sync>,
    resolver: Box<dyn ResourceResolver + Send + Sync>,
    compute: Box<dyn InstanceDiskAttacher + Send + Sync>,
}

/// Convert CLI arguments to the command with the default dependencies injected.
impl<'a> TryFrom<(ReleaseTrack, args::AttachDisk, &'a GlobalArgs)> for AttachDisk {
    type Error = anyhow::Error;

    fn try_from(
        (track, args, global_args): (ReleaseTrack, args::AttachDisk, &'a GlobalArgs),
    ) -> Result<Self> {
        let options = collect_options(&args)?;

        let zone = non_empty(args.zone);
        let project = non_empty(global_args.project.clone());

        // A resource URL carries its own project and zone.
        if !args.instance.contains('/') {
            if zone.is_none() {
                return Err(AttachDiskError::MissingRequiredOption("--zone").into());
            }
            if project.is_none() {
                return Err(AttachDiskError::MissingRequiredOption("--project").into());
            }
        }

        let config = ComputeConfig::for_track(
            track,
            global_args.api_endpoint.as_deref(),
            global_args.access_token.clone(),
            global_args.access_token_file.clone(),
        )
        .map_err(AttachDiskError::from)?;

        Ok(Self {
            track,
            instance: args.instance,
            project,
            zone,
            options,
            csek_key_file: args.csek_key_file,

            interaction: Box::new(Interaction::new()),
            file_reader: Box::new(TokioFs::new()),
            resolver: Box::new(ResourceParser::new()),
            compute: Box::new(ComputeClient::new(config).map_err(AttachDiskError::from)?),
        })
    }
}

/// Validate raw option values into [`AttachOptions`].
fn collect_options(args: &args::AttachDisk) -> Result<AttachOptions, AttachDiskError> {
    let disk = non_empty(args.disk.clone()).ok_or(AttachDiskError::MissingRequiredOption("--disk"))?;

    let mode = match args.mode.as_deref() {
        None => DiskMode::default(),
        Some(value) => {
            DiskMode::from_flag(value).ok_or_else(|| AttachDiskError::InvalidEnumValue {
                option: "--mode",
                value: value.to_string(),
                expected: DiskMode::FLAG_VALUES,
            })?
        }
    };

    let disk_scope = match args.disk_scope.as_deref() {
        None => DiskScope::default(),
        Some(value) => {
            DiskScope::from_flag(value).ok_or_else(|| AttachDiskError::InvalidEnumValue {
                option: "--disk-scope",
                value: value.to_string(),
                expected: DiskScope::FLAG_VALUES,
            })?
        }
    };

    Ok(AttachOptions {
        disk,
        device_name: non_empty(args.device_name.clone()),
        mode,
        disk_scope,
        force_attach: args.force_attach,
        boot: args.boot,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Result of the attach disk command.
///
/// Printed as text it names the updated instance; as JSON it is the finished operation,
/// exactly as the API returned it.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachDiskResult {
    instance_link: String,
    operation: Operation,
}

impl Display for AttachDiskResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Updated [{}].", self.instance_link)
    }
}

impl Serialize for AttachDiskResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.operation.serialize(serializer)
    }
}

#[async_trait]
impl CommandWithOutput for AttachDisk {
    type Output = AttachDiskResult;

    async fn execute(&mut self) -> Result<Self::Output> {
        let keys = match &self.csek_key_file {
            Some(path) => {
                let contents = self
                    .file_reader
                    .read_to_string(path)
                    .await
                    .context("reading [--csek-key-file]")?;
                let keys = CsekKeyStore::from_json(&contents).map_err(AttachDiskError::from)?;
                debug!(keys = keys.len(), "customer-supplied encryption keys loaded");
                Some(keys)
            }
            None => None,
        };

        let instance = self
            .resolver
            .resolve_instance(&self.instance, self.project.as_deref(), self.zone.as_deref())
            .map_err(AttachDiskError::from)?;
        debug!(?instance, track = %self.track, "instance resolved");

        let request = build_request(
            self.track,
            &instance,
            &self.options,
            self.resolver.as_ref(),
            keys.as_ref(),
        )?;
        debug!(
            source = %request.attached_disk.source,
            mode = ?request.attached_disk.mode,
            force_attach = ?request.force_attach,
            boot = ?request.attached_disk.boot,
            encrypted = request.attached_disk.disk_encryption_key.is_some(),
            "attach disk request built"
        );

        // Stopped when `_spinner` goes out of scope, including on errors.
        let _spinner = self.interaction.start_spinner(format!(
            "Attaching disk [{}] to instance [{}]...",
            self.options.disk, instance.name
        ))?;

        let operation = self
            .compute
            .attach_disk(&request)
            .await
            .map_err(AttachDiskError::from)?;
        let operation = self
            .compute
            .wait_for_operation(operation, &instance.project, &instance.zone)
            .await
            .map_err(AttachDiskError::from)?;

        Ok(AttachDiskResult {
            instance_link: instance.self_link(self.track.api_version()),
            operation,
        })
    }
}
