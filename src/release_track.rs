//! Release tracks and the fields each one exposes.
//!
//! Every track maps to a fixed [`TrackCapabilities`] row. The request builder consults
//! this table instead of branching on the track itself, so adding a capability means
//! adding a column here and nowhere else.
use std::fmt::Display;

/// Maturity level of the command surface.
///
/// Ordered by feature richness: `Ga < Beta < Alpha`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseTrack {
    Ga,
    Beta,
    Alpha,
}

/// Which optional request fields a release track may populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackCapabilities {
    /// `--disk-scope` is honoured. When unset the disk is always zonal.
    pub disk_scope: bool,
    /// `forceAttach` is sent with the request.
    pub force_attach: bool,
    /// `boot` may be set on the attached disk.
    pub boot: bool,
    /// Customer-supplied keys may be RSA-wrapped, not only raw AES keys.
    pub rsa_encrypted_keys: bool,
}

impl ReleaseTrack {
    pub const fn capabilities(self) -> TrackCapabilities {
        match self {
            ReleaseTrack::Ga => TrackCapabilities {
                disk_scope: false,
                force_attach: false,
                boot: false,
                rsa_encrypted_keys: false,
            },
            ReleaseTrack::Beta => TrackCapabilities {
                disk_scope: true,
                force_attach: true,
                boot: false,
                rsa_encrypted_keys: true,
            },
            ReleaseTrack::Alpha => TrackCapabilities {
                disk_scope: true,
                force_attach: true,
                boot: true,
                rsa_encrypted_keys: true,
            },
        }
    }

    /// Compute API version used for this track.
    pub const fn api_version(self) -> &'static str {
        match self {
            ReleaseTrack::Ga => "v1",
            ReleaseTrack::Beta => "beta",
            ReleaseTrack::Alpha => "alpha",
        }
    }
}

impl Display for ReleaseTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReleaseTrack::Ga => write!(f, "GA"),
            ReleaseTrack::Beta => write!(f, "BETA"),
            ReleaseTrack::Alpha => write!(f, "ALPHA"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_are_ordered_by_feature_richness() {
        assert!(ReleaseTrack::Ga < ReleaseTrack::Beta);
        assert!(ReleaseTrack::Beta < ReleaseTrack::Alpha);
    }

    #[test]
    fn test_capabilities_grow_with_track() {
        let tracks = [ReleaseTrack::Ga, ReleaseTrack::Beta, ReleaseTrack::Alpha];

        // Anything a lower track supports, every higher track supports too.
        for pair in tracks.windows(2) {
            let lower = pair[0].capabilities();
            let higher = pair[1].capabilities();
            assert!(!lower.disk_scope || higher.disk_scope);
            assert!(!lower.force_attach || higher.force_attach);
            assert!(!lower.boot || higher.boot);
            assert!(!lower.rsa_encrypted_keys || higher.rsa_encrypted_keys);
        }
    }

    #[test]
    fn test_only_alpha_supports_boot() {
        assert!(!ReleaseTrack::Ga.capabilities().boot);
        assert!(!ReleaseTrack::Beta.capabilities().boot);
        assert!(ReleaseTrack::Alpha.capabilities().boot);
    }

    #[test]
    fn test_ga_capabilities() {
        let caps = ReleaseTrack::Ga.capabilities();
        assert!(!caps.disk_scope);
        assert!(!caps.force_attach);
        assert!(!caps.rsa_encrypted_keys);
    }

    #[test]
    fn test_api_version() {
        assert_eq!(ReleaseTrack::Ga.api_version(), "v1");
        assert_eq!(ReleaseTrack::Beta.api_version(), "beta");
        assert_eq!(ReleaseTrack::Alpha.api_version(), "alpha");
    }
}
