use crate::resources::{DiskRef, DiskScope, InstanceRef, ResourceParser, ResourceResolutionError};

/// Turns user-supplied names into fully-qualified resource references.
pub trait ResourceResolver {
    fn resolve_instance(
        &self,
        value: &str,
        project: Option<&str>,
        zone: Option<&str>,
    ) -> Result<InstanceRef, ResourceResolutionError>;

    fn resolve_disk(
        &self,
        value: &str,
        project: &str,
        zone: &str,
        scope: DiskScope,
    ) -> Result<DiskRef, ResourceResolutionError>;
}

impl ResourceResolver for ResourceParser {
    fn resolve_instance(
        &self,
        value: &str,
        project: Option<&str>,
        zone: Option<&str>,
    ) -> Result<InstanceRef, ResourceResolutionError> {
        self.parse_instance(value, project, zone)
    }

    fn resolve_disk(
        &self,
        value: &str,
        project: &str,
        zone: &str,
        scope: DiskScope,
    ) -> Result<DiskRef, ResourceResolutionError> {
        self.parse_disk(value, project, zone, scope)
    }
}
