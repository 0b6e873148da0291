//! Errors surfaced by the `attach-disk` command.
//!
//! Every variant is terminal for the invocation: no request is sent after any of them.
//! Wrapped errors are exposed as sources, so print them with `{:#}` to get the whole chain.
use crate::{
    csek::{KeyFileError, KeyType},
    release_track::ReleaseTrack,
    resources::ResourceResolutionError,
};

#[derive(Debug, thiserror::Error)]
pub enum AttachDiskError {
    #[error("missing required option [{0}]")]
    MissingRequiredOption(&'static str),
    #[error("invalid value [{value}] for [{option}]: expected one of [{}]", .expected.join(", "))]
    InvalidEnumValue {
        option: &'static str,
        value: String,
        expected: &'static [&'static str],
    },
    #[error(transparent)]
    ResourceResolution(#[from] ResourceResolutionError),
    #[error(
        "invalid key type [{key_type}]: this key type is only allowed in the alpha and beta versions of this command (current track: {track})"
    )]
    UnsupportedKeyType {
        key_type: KeyType,
        track: ReleaseTrack,
    },
    #[error("reading [--csek-key-file]")]
    KeyFile(#[from] KeyFileError),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failures talking to the Compute API.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error(
        "no access token: set CLOUDSDK_AUTH_ACCESS_TOKEN or pass --access-token-file"
    )]
    MissingCredentials,
    #[error("reading access token file")]
    Credentials(#[source] std::io::Error),
    #[error("invalid API endpoint [{0}]")]
    InvalidEndpoint(String),
    #[error("request to the Compute API failed")]
    Http(#[from] reqwest::Error),
    #[error("Compute API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("operation [{name}] failed:\n - {}", .errors.join("\n - "))]
    OperationFailed { name: String, errors: Vec<String> },
}
