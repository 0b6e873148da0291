//! Connection settings for the Compute API.
//!
//! Values come from global flags, which fall back to the usual `CLOUDSDK_*` environment
//! variables (see [`crate::args::GlobalArgs`]).
use std::path::PathBuf;

use url::Url;

use crate::{error::TransportError, release_track::ReleaseTrack};

const DEFAULT_API_ROOT: &str = "https://compute.googleapis.com/compute";

/// Where the bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    AccessToken(String),
    /// Read when the first request is sent, not at startup.
    AccessTokenFile(PathBuf),
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeConfig {
    /// Base URL, always ending in `/`, e.g. `https://compute.googleapis.com/compute/v1/`.
    pub base_url: Url,
    pub credentials: Credentials,
}

impl ComputeConfig {
    /// Build the config for a release track.
    ///
    /// An endpoint override replaces the whole base URL, version included. A token given
    /// directly takes precedence over a token file.
    pub fn for_track(
        track: ReleaseTrack,
        endpoint_override: Option<&str>,
        access_token: Option<String>,
        access_token_file: Option<PathBuf>,
    ) -> Result<Self, TransportError> {
        let base_url = match endpoint_override {
            Some(endpoint) => parse_base_url(endpoint)?,
            None => parse_base_url(&format!("{DEFAULT_API_ROOT}/{}/", track.api_version()))?,
        };

        let credentials = match (access_token, access_token_file) {
            (Some(token), _) if !token.trim().is_empty() => {
                Credentials::AccessToken(token.trim().to_string())
            }
            (_, Some(path)) => Credentials::AccessTokenFile(path),
            _ => Credentials::None,
        };

        Ok(Self {
            base_url,
            credentials,
        })
    }
}

fn parse_base_url(endpoint: &str) -> Result<Url, TransportError> {
    let with_slash = if endpoint.ends_with('/') {
        endpoint.to_string()
    } else {
        format!("{endpoint}/")
    };

    let url = Url::parse(&with_slash)
        .map_err(|_| TransportError::InvalidEndpoint(endpoint.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(TransportError::InvalidEndpoint(endpoint.to_string()));
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_base_url_follows_track() {
        let ga = ComputeConfig::for_track(ReleaseTrack::Ga, None, None, None).unwrap();
        let alpha = ComputeConfig::for_track(ReleaseTrack::Alpha, None, None, None).unwrap();

        assert_eq!(
            ga.base_url.as_str(),
            "https://compute.googleapis.com/compute/v1/"
        );
        assert_eq!(
            alpha.base_url.as_str(),
            "https://compute.googleapis.com/compute/alpha/"
        );
        assert_eq!(ga.credentials, Credentials::None);
    }

    #[test]
    fn test_endpoint_override_gets_trailing_slash() {
        let config = ComputeConfig::for_track(
            ReleaseTrack::Beta,
            Some("http://localhost:8080/compute/beta"),
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            config.base_url.as_str(),
            "http://localhost:8080/compute/beta/"
        );
    }

    #[test]
    fn test_invalid_endpoint_override() {
        for endpoint in ["not a url", "ftp://example.com/compute/v1"] {
            let err =
                ComputeConfig::for_track(ReleaseTrack::Ga, Some(endpoint), None, None).unwrap_err();
            assert!(matches!(err, TransportError::InvalidEndpoint(e) if e == endpoint));
        }
    }

    #[test]
    fn test_token_precedence() {
        let config = ComputeConfig::for_track(
            ReleaseTrack::Ga,
            None,
            Some(" token \n".to_string()),
            Some(PathBuf::from("/tmp/token")),
        )
        .unwrap();
        assert_eq!(
            config.credentials,
            Credentials::AccessToken("token".to_string())
        );

        let config = ComputeConfig::for_track(
            ReleaseTrack::Ga,
            None,
            Some(String::new()),
            Some(PathBuf::from("/tmp/token")),
        )
        .unwrap();
        assert_eq!(
            config.credentials,
            Credentials::AccessTokenFile(PathBuf::from("/tmp/token"))
        );
    }
}
