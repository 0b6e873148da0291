//! Compute resource references.
//!
//! Instances and disks can be given as bare names (scoped by `--project`/`--zone`) or as
//! resource paths, optionally prefixed with the API host and version:
//!
//! ```text
//! my-disk
//! projects/my-project/zones/us-central1-a/disks/my-disk
//! https://www.googleapis.com/compute/v1/projects/my-project/regions/us-central1/disks/my-disk
//! ```
//!
//! [`ResourceParser`] turns those into [`InstanceRef`]s and [`DiskRef`]s.
use std::fmt::Display;

use url::Url;

/// Host used when rendering self links.
const SELF_LINK_BASE: &str = "https://www.googleapis.com/compute";

/// Where a disk is looked up when only its name is known.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DiskScope {
    #[default]
    Zone,
    Region,
}

impl DiskScope {
    /// Literals accepted by `--disk-scope`.
    pub const FLAG_VALUES: &'static [&'static str] = &["zonal", "regional"];

    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            "zonal" => Some(DiskScope::Zone),
            "regional" => Some(DiskScope::Region),
            _ => None,
        }
    }
}

/// Zone or region a resource lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Zone(String),
    Region(String),
}

impl Location {
    fn collection(&self) -> &'static str {
        match self {
            Location::Zone(_) => "zones",
            Location::Region(_) => "regions",
        }
    }

    fn name(&self) -> &str {
        match self {
            Location::Zone(name) | Location::Region(name) => name,
        }
    }
}

/// Fully-qualified reference to a VM instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRef {
    pub project: String,
    pub zone: String,
    pub name: String,
}

impl InstanceRef {
    pub fn relative_path(&self) -> String {
        format!(
            "projects/{}/zones/{}/instances/{}",
            self.project, self.zone, self.name
        )
    }

    pub fn self_link(&self, api_version: &str) -> String {
        format!("{SELF_LINK_BASE}/{api_version}/{}", self.relative_path())
    }
}

/// Fully-qualified reference to a zonal or regional persistent disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskRef {
    pub project: String,
    pub location: Location,
    pub name: String,
}

impl DiskRef {
    pub fn relative_path(&self) -> String {
        format!(
            "projects/{}/{}/{}/disks/{}",
            self.project,
            self.location.collection(),
            self.location.name(),
            self.name
        )
    }

    pub fn self_link(&self, api_version: &str) -> String {
        format!("{SELF_LINK_BASE}/{api_version}/{}", self.relative_path())
    }
}

impl Display for DiskRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.relative_path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceResolutionError {
    #[error(
        "invalid resource name [{0}]: names must be 1-63 characters, start with a lowercase letter and contain only lowercase letters, digits and hyphens"
    )]
    InvalidName(String),
    #[error("could not parse resource [{0}]")]
    MalformedPath(String),
    #[error("resource [{value}] is not a {expected}")]
    UnexpectedCollection {
        value: String,
        expected: &'static str,
    },
    #[error("cannot derive a region from zone [{0}]")]
    InvalidZone(String),
    #[error("resource [{value}] needs a {parameter} to be resolved")]
    MissingScope {
        value: String,
        parameter: &'static str,
    },
}

/// Parser for instance and disk references.
///
/// Pure and stateless: the same input always resolves to the same reference.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResourceParser;

impl ResourceParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse_instance(
        &self,
        value: &str,
        project: Option<&str>,
        zone: Option<&str>,
    ) -> Result<InstanceRef, ResourceResolutionError> {
        if let Some(segments) = resource_path_segments(value)? {
            return match segments.as_slice() {
                [projects, project, zones, zone, instances, name]
                    if projects == "projects" && zones == "zones" && instances == "instances" =>
                {
                    Ok(InstanceRef {
                        project: validate_project(project)?,
                        zone: validate_name(zone)?,
                        name: validate_name(name)?,
                    })
                }
                _ => Err(ResourceResolutionError::UnexpectedCollection {
                    value: value.to_string(),
                    expected: "zonal instance",
                }),
            };
        }

        let project = project.ok_or_else(|| ResourceResolutionError::MissingScope {
            value: value.to_string(),
            parameter: "project",
        })?;
        let zone = zone.ok_or_else(|| ResourceResolutionError::MissingScope {
            value: value.to_string(),
            parameter: "zone",
        })?;

        Ok(InstanceRef {
            project: validate_project(project)?,
            zone: validate_name(zone)?,
            name: validate_name(value)?,
        })
    }

    /// Resolve a disk relative to the instance's project and zone.
    ///
    /// A resource path carries its own scope and wins over `scope`.
    pub fn parse_disk(
        &self,
        value: &str,
        project: &str,
        zone: &str,
        scope: DiskScope,
    ) -> Result<DiskRef, ResourceResolutionError> {
        if let Some(segments) = resource_path_segments(value)? {
            return match segments.as_slice() {
                [projects, project, collection, location, disks, name]
                    if projects == "projects" && disks == "disks" =>
                {
                    let location = match collection.as_str() {
                        "zones" => Location::Zone(validate_name(location)?),
                        "regions" => Location::Region(validate_name(location)?),
                        _ => {
                            return Err(ResourceResolutionError::UnexpectedCollection {
                                value: value.to_string(),
                                expected: "disk",
                            });
                        }
                    };
                    Ok(DiskRef {
                        project: validate_project(project)?,
                        location,
                        name: validate_name(name)?,
                    })
                }
                _ => Err(ResourceResolutionError::UnexpectedCollection {
                    value: value.to_string(),
                    expected: "disk",
                }),
            };
        }

        let zone = validate_name(zone)?;
        let location = match scope {
            DiskScope::Region => Location::Region(zone_to_region(&zone)?),
            DiskScope::Zone => Location::Zone(zone),
        };

        Ok(DiskRef {
            project: validate_project(project)?,
            location,
            name: validate_name(value)?,
        })
    }
}

/// Derive the region containing a zone, e.g. `us-central1-a` -> `us-central1`.
pub fn zone_to_region(zone: &str) -> Result<String, ResourceResolutionError> {
    match zone.rsplit_once('-') {
        Some((region, suffix)) if !region.is_empty() && !suffix.is_empty() => {
            Ok(region.to_string())
        }
        _ => Err(ResourceResolutionError::InvalidZone(zone.to_string())),
    }
}

/// Split a resource path into its segments.
///
/// Returns `None` for bare names. URLs must point below `/compute/<version>/`.
fn resource_path_segments(value: &str) -> Result<Option<Vec<String>>, ResourceResolutionError> {
    let malformed = || ResourceResolutionError::MalformedPath(value.to_string());

    if value.starts_with("https://") || value.starts_with("http://") {
        let url = Url::parse(value).map_err(|_| malformed())?;
        let segments: Vec<String> = url
            .path_segments()
            .ok_or_else(malformed)?
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        // Skip everything up to and including "compute/<version>".
        let start = segments
            .iter()
            .position(|s| s == "compute")
            .ok_or_else(malformed)?;
        let rest = segments.get(start + 2..).ok_or_else(malformed)?;
        if rest.is_empty() {
            return Err(malformed());
        }
        return Ok(Some(rest.to_vec()));
    }

    if !value.contains('/') {
        return Ok(None);
    }

    let segments: Vec<String> = value
        .trim_start_matches('/')
        .split('/')
        .map(str::to_string)
        .collect();
    if segments.iter().any(String::is_empty) {
        return Err(malformed());
    }

    Ok(Some(segments))
}

/// RFC1035 label: lowercase letter first, then lowercase letters, digits or `-`, 1-63 long.
fn is_rfc1035_label(name: &str) -> bool {
    let bytes = name.as_bytes();
    (1..=63).contains(&bytes.len())
        && bytes[0].is_ascii_lowercase()
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes[bytes.len() - 1] != b'-'
}

/// Instance, disk, zone and region names.
fn validate_name(name: &str) -> Result<String, ResourceResolutionError> {
    if is_rfc1035_label(name) {
        Ok(name.to_string())
    } else {
        Err(ResourceResolutionError::InvalidName(name.to_string()))
    }
}

/// Project IDs, optionally domain-scoped as in `example.com:my-project`.
fn validate_project(project: &str) -> Result<String, ResourceResolutionError> {
    let (domain, id) = match project.rsplit_once(':') {
        Some((domain, id)) => (Some(domain), id),
        None => (None, project),
    };

    let domain_valid = domain.is_none_or(|domain| {
        domain.split('.').all(|label| {
            !label.is_empty()
                && label
                    .bytes()
                    .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
        })
    });

    if domain_valid && is_rfc1035_label(id) {
        Ok(project.to_string())
    } else {
        Err(ResourceResolutionError::InvalidName(project.to_string()))
    }
}
