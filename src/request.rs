//! Assembly of the `instances.attachDisk` request.
//!
//! [`build_request`] combines validated options, the active [`ReleaseTrack`] and the
//! optional key store into one [`AttachRequest`]. Fields the track does not expose are
//! dropped with a warning instead of being sent.
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

use crate::{
    csek::{CsekKeyStore, KeyType},
    dependencies::ResourceResolver,
    error::AttachDiskError,
    models::{AttachRequest, AttachedDisk, CustomerEncryptionKey, DiskMode, DiskType},
    release_track::ReleaseTrack,
    resources::{DiskScope, InstanceRef, Location, ResourceResolutionError},
};

/// Validated `attach-disk` options.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct AttachOptions {
    #[builder(setter(into))]
    pub disk: String,
    #[builder(default, setter(into, strip_option))]
    pub device_name: Option<String>,
    #[builder(default)]
    pub mode: DiskMode,
    #[builder(default)]
    pub disk_scope: DiskScope,
    #[builder(default)]
    pub force_attach: bool,
    #[builder(default)]
    pub boot: bool,
}

/// Build the request for `instance` on the given track.
///
/// Pure: identical inputs always produce an identical request.
pub fn build_request(
    track: ReleaseTrack,
    instance: &InstanceRef,
    options: &AttachOptions,
    resolver: &dyn ResourceResolver,
    keys: Option<&CsekKeyStore>,
) -> Result<AttachRequest, AttachDiskError> {
    let capabilities = track.capabilities();

    let scope = if capabilities.disk_scope {
        options.disk_scope
    } else {
        if options.disk_scope != DiskScope::Zone {
            warn!(%track, "--disk-scope is not available on this track, using zonal");
        }
        DiskScope::Zone
    };

    let disk = resolver.resolve_disk(&options.disk, &instance.project, &instance.zone, scope)?;
    if !capabilities.disk_scope && matches!(disk.location, Location::Region(_)) {
        return Err(ResourceResolutionError::UnexpectedCollection {
            value: options.disk.clone(),
            expected: "zonal disk",
        }
        .into());
    }
    debug!(%disk, ?scope, "disk resolved");

    let disk_encryption_key = match keys {
        Some(keys) => {
            if !capabilities.rsa_encrypted_keys && keys.has_rsa_encrypted_keys() {
                return Err(AttachDiskError::UnsupportedKeyType {
                    key_type: KeyType::RsaEncrypted,
                    track,
                });
            }
            keys.lookup(&disk.relative_path())
                .map(CustomerEncryptionKey::from)
        }
        None => None,
    };

    let boot = if !options.boot {
        None
    } else if capabilities.boot {
        Some(true)
    } else {
        warn!(%track, "--boot is not available on this track, ignoring it");
        None
    };

    let force_attach = if capabilities.force_attach {
        Some(options.force_attach)
    } else {
        if options.force_attach {
            warn!(%track, "--force-attach is not available on this track, ignoring it");
        }
        None
    };

    Ok(AttachRequest {
        instance: instance.name.clone(),
        project: instance.project.clone(),
        zone: instance.zone.clone(),
        attached_disk: AttachedDisk {
            device_name: options.device_name.clone(),
            mode: options.mode,
            source: disk.self_link(track.api_version()),
            disk_type: DiskType::Persistent,
            disk_encryption_key,
            boot,
        },
        force_attach,
    })
}
