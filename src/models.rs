//! Compute API wire model for `instances.attachDisk`.
//!
//! Field names follow the REST resource (`camelCase`). Optional fields are omitted from
//! the JSON body entirely rather than sent as `null`.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::csek::{CsekKey, KeyType};

/// Access mode of an attached disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiskMode {
    ReadOnly,
    #[default]
    ReadWrite,
}

impl DiskMode {
    /// Literals accepted by `--mode`.
    pub const FLAG_VALUES: &'static [&'static str] = &["ro", "rw"];

    pub fn from_flag(value: &str) -> Option<Self> {
        match value {
            "ro" => Some(DiskMode::ReadOnly),
            "rw" => Some(DiskMode::ReadWrite),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiskType {
    #[default]
    Persistent,
}

/// `diskEncryptionKey` of an attached disk. Exactly one field is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerEncryptionKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsa_encrypted_key: Option<String>,
}

impl From<&CsekKey> for CustomerEncryptionKey {
    fn from(key: &CsekKey) -> Self {
        match key.key_type {
            KeyType::Raw => CustomerEncryptionKey {
                raw_key: Some(key.key.clone()),
                rsa_encrypted_key: None,
            },
            KeyType::RsaEncrypted => CustomerEncryptionKey {
                raw_key: None,
                rsa_encrypted_key: Some(key.key.clone()),
            },
        }
    }
}

/// Request body of `instances.attachDisk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDisk {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    pub mode: DiskMode,
    /// Self link of the disk.
    pub source: String,
    #[serde(rename = "type")]
    pub disk_type: DiskType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disk_encryption_key: Option<CustomerEncryptionKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boot: Option<bool>,
}

/// Everything needed to issue one `instances.attachDisk` call.
///
/// `instance`, `project` and `zone` become path parameters and `force_attach` a query
/// parameter; only `attached_disk` is sent as the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachRequest {
    pub instance: String,
    pub project: String,
    pub zone: String,
    pub attached_disk: AttachedDisk,
    pub force_attach: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    Pending,
    Running,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationErrorItem {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    #[serde(default)]
    pub errors: Vec<OperationErrorItem>,
}

/// A zonal operation as returned by the API.
///
/// Only the fields needed to follow the operation are typed; everything else is kept
/// in `other` so the resource can be printed back exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub name: String,
    pub status: OperationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Operation {
    pub fn is_done(&self) -> bool {
        self.status == OperationStatus::Done
    }

    /// Error messages of a finished operation, empty on success.
    pub fn error_messages(&self) -> Vec<String> {
        self.error
            .iter()
            .flat_map(|e| e.errors.iter())
            .map(|item| {
                if item.code.is_empty() {
                    item.message.clone()
                } else {
                    format!("{}: {}", item.code, item.message)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_disk_mode_from_flag() {
        assert_eq!(DiskMode::from_flag("ro"), Some(DiskMode::ReadOnly));
        assert_eq!(DiskMode::from_flag("rw"), Some(DiskMode::ReadWrite));
        assert_eq!(DiskMode::from_flag("RW"), None);
        assert_eq!(DiskMode::default(), DiskMode::ReadWrite);
    }

    #[test]
    fn test_attached_disk_omits_absent_fields() {
        let disk = AttachedDisk {
            device_name: None,
            mode: DiskMode::ReadWrite,
            source: "https://www.googleapis.com/compute/v1/projects/p/zones/z-a/disks/d1"
                .to_string(),
            disk_type: DiskType::Persistent,
            disk_encryption_key: None,
            boot: None,
        };

        assert_eq!(
            serde_json::to_value(&disk).unwrap(),
            json!({
                "mode": "READ_WRITE",
                "source": "https://www.googleapis.com/compute/v1/projects/p/zones/z-a/disks/d1",
                "type": "PERSISTENT",
            })
        );
    }

    #[test]
    fn test_attached_disk_with_all_fields() {
        let disk = AttachedDisk {
            device_name: Some("data".to_string()),
            mode: DiskMode::ReadOnly,
            source: "projects/p/zones/z-a/disks/d1".to_string(),
            disk_type: DiskType::Persistent,
            disk_encryption_key: Some(CustomerEncryptionKey::from(&CsekKey {
                key_type: KeyType::RsaEncrypted,
                key: "wrapped".to_string(),
            })),
            boot: Some(true),
        };

        assert_eq!(
            serde_json::to_value(&disk).unwrap(),
            json!({
                "deviceName": "data",
                "mode": "READ_ONLY",
                "source": "projects/p/zones/z-a/disks/d1",
                "type": "PERSISTENT",
                "diskEncryptionKey": { "rsaEncryptedKey": "wrapped" },
                "boot": true,
            })
        );
    }

    #[test]
    fn test_operation_keeps_unknown_fields() {
        let raw = json!({
            "kind": "compute#operation",
            "id": "123",
            "name": "operation-1",
            "zone": "https://www.googleapis.com/compute/v1/projects/p/zones/z-a",
            "operationType": "attachDisk",
            "targetLink": "https://www.googleapis.com/compute/v1/projects/p/zones/z-a/instances/vm-1",
            "status": "DONE",
            "progress": 100,
        });

        let operation: Operation = serde_json::from_value(raw.clone()).unwrap();
        assert!(operation.is_done());
        assert!(operation.error_messages().is_empty());
        assert_eq!(serde_json::to_value(&operation).unwrap(), raw);
    }

    #[test]
    fn test_operation_error_messages() {
        let operation: Operation = serde_json::from_value(json!({
            "name": "operation-2",
            "status": "DONE",
            "error": {
                "errors": [
                    { "code": "RESOURCE_IN_USE_BY_ANOTHER_RESOURCE", "message": "disk d1 is in use" },
                    { "message": "second" },
                ]
            }
        }))
        .unwrap();

        assert_eq!(
            operation.error_messages(),
            vec![
                "RESOURCE_IN_USE_BY_ANOTHER_RESOURCE: disk d1 is in use".to_string(),
                "second".to_string(),
            ]
        );
    }
}
