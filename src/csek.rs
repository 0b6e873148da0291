//! Customer-supplied encryption keys (CSEK).
//!
//! A key file is a JSON array of entries, one per resource:
//!
//! ```json
//! [
//!   {
//!     "uri": "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/disks/d1",
//!     "key": "acXTX3rxrKAFTF0tYVLvydU1riRZTvUNC4g5I11NY+c=",
//!     "key-type": "raw"
//!   }
//! ]
//! ```
//!
//! Raw keys are base64-encoded 256-bit AES keys. RSA-encrypted keys are the same key
//! wrapped with the Compute Engine public key (2048-bit RSA, so 256 bytes once decoded).
use std::collections::BTreeMap;

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::Deserialize;

const RAW_KEY_LENGTH: usize = 32;
const RSA_ENCRYPTED_KEY_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    Raw,
    RsaEncrypted,
}

impl KeyType {
    fn from_file_value(value: &str) -> Option<Self> {
        match value {
            "raw" => Some(KeyType::Raw),
            "rsa-encrypted" => Some(KeyType::RsaEncrypted),
            _ => None,
        }
    }

    fn expected_length(self) -> usize {
        match self {
            KeyType::Raw => RAW_KEY_LENGTH,
            KeyType::RsaEncrypted => RSA_ENCRYPTED_KEY_LENGTH,
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Raw => write!(f, "raw"),
            KeyType::RsaEncrypted => write!(f, "rsa-encrypted"),
        }
    }
}

/// Key material for one resource, still base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsekKey {
    pub key_type: KeyType,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyFileError {
    #[error("malformed key file: {0}")]
    Malformed(String),
    #[error("invalid key type [{key_type}] for [{uri}]: expected one of [raw, rsa-encrypted]")]
    InvalidKeyType { uri: String, key_type: String },
    #[error("invalid {key_type} key for [{uri}]: {reason}")]
    InvalidKey {
        uri: String,
        key_type: KeyType,
        reason: String,
    },
    #[error("key file contains two keys for the same resource [{0}]")]
    DuplicateUri(String),
}

#[derive(Deserialize)]
struct KeyFileEntry {
    uri: String,
    key: String,
    #[serde(rename = "key-type")]
    key_type: String,
}

/// Keys loaded from a CSEK key file, indexed by relative resource path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsekKeyStore {
    keys: BTreeMap<String, CsekKey>,
}

impl CsekKeyStore {
    /// Parse and validate a key file.
    pub fn from_json(contents: &str) -> Result<Self, KeyFileError> {
        let entries: Vec<KeyFileEntry> =
            serde_json::from_str(contents).map_err(|e| KeyFileError::Malformed(e.to_string()))?;

        let mut keys = BTreeMap::new();
        for entry in entries {
            let key_type =
                KeyType::from_file_value(&entry.key_type).ok_or_else(|| {
                    KeyFileError::InvalidKeyType {
                        uri: entry.uri.clone(),
                        key_type: entry.key_type.clone(),
                    }
                })?;
            validate_key(&entry.uri, key_type, &entry.key)?;

            let path = normalize_uri(&entry.uri);
            if keys.contains_key(&path) {
                return Err(KeyFileError::DuplicateUri(entry.uri));
            }
            keys.insert(
                path,
                CsekKey {
                    key_type,
                    key: entry.key,
                },
            );
        }

        Ok(Self { keys })
    }

    /// Key for the resource at `relative_path`, if the file has one.
    pub fn lookup(&self, relative_path: &str) -> Option<&CsekKey> {
        self.keys.get(relative_path)
    }

    /// Whether any entry is RSA-wrapped.
    pub fn has_rsa_encrypted_keys(&self) -> bool {
        self.keys
            .values()
            .any(|key| key.key_type == KeyType::RsaEncrypted)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

fn validate_key(uri: &str, key_type: KeyType, key: &str) -> Result<(), KeyFileError> {
    let invalid = |reason: String| KeyFileError::InvalidKey {
        uri: uri.to_string(),
        key_type,
        reason,
    };

    let decoded = STANDARD
        .decode(key)
        .map_err(|e| invalid(format!("not valid base64 ({e})")))?;

    if decoded.len() != key_type.expected_length() {
        return Err(invalid(format!(
            "expected {} bytes, got {}",
            key_type.expected_length(),
            decoded.len()
        )));
    }

    Ok(())
}

/// Reduce a resource URI to its path starting at `projects/`.
///
/// Keys are matched regardless of which API host or version the file was written for.
fn normalize_uri(uri: &str) -> String {
    let path = uri
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map_or("", |(_, path)| path))
        .unwrap_or(uri);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let start = segments
        .iter()
        .position(|s| *s == "projects")
        .unwrap_or_default();

    segments[start..].join("/")
}
