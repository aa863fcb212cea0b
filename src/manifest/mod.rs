//! Provisioning manifest loading
//!
//! A manifest is a JSON object that may carry a `models` array (artifact
//! entries) and a `nodes` array (extension entries). Array elements are
//! decoded one at a time so that a malformed element only fails its own
//! entry; a document that cannot be read as an object fails the whole batch.

pub mod entry;

pub use entry::{ArtifactEntry, Category, ExtensionEntry, InstallKind};

use crate::core::{ProvisionError, ProvisionResult};
use entry::{RawArtifactEntry, RawExtensionEntry};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// An entry that could not be decoded, kept at its manifest position.
#[derive(Debug)]
pub struct InvalidEntry {
    pub label: String,
    pub error: ProvisionError,
}

/// One manifest position: a usable entry or the reason it is unusable.
pub type EntrySlot<E> = Result<E, InvalidEntry>;

#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    models: Vec<Value>,
    #[serde(default)]
    nodes: Vec<Value>,
}

impl Manifest {
    /// Load a manifest from disk. A missing file yields `None`.
    pub fn load(path: &Path) -> ProvisionResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ProvisionError::Manifest(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::decode(&content)
            .map(Some)
            .map_err(|e| ProvisionError::Manifest(format!("Invalid {}: {}", path.display(), e)))
    }

    pub fn parse(content: &str) -> ProvisionResult<Self> {
        Self::decode(content)
            .map_err(|e| ProvisionError::Manifest(format!("Invalid manifest: {}", e)))
    }

    fn decode(content: &str) -> Result<Self, String> {
        let value: Value = serde_json::from_str(content).map_err(|e| e.to_string())?;
        if !value.is_object() {
            return Err("top level must be a JSON object".to_string());
        }
        serde_json::from_value(value).map_err(|e| e.to_string())
    }

    /// Artifact entries in declared order.
    pub fn artifacts(&self) -> Vec<EntrySlot<ArtifactEntry>> {
        self.models
            .iter()
            .map(|value| {
                let label = value
                    .get("filename")
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or("unknown")
                    .to_string();
                serde_json::from_value::<RawArtifactEntry>(value.clone())
                    .map_err(ProvisionError::from)
                    .and_then(ArtifactEntry::try_from)
                    .map_err(|error| InvalidEntry { label, error })
            })
            .collect()
    }

    /// Extension entries in declared order.
    pub fn extensions(&self) -> Vec<EntrySlot<ExtensionEntry>> {
        self.nodes
            .iter()
            .map(|value| match serde_json::from_value::<RawExtensionEntry>(value.clone()) {
                Ok(raw) => {
                    let label = raw.label();
                    ExtensionEntry::try_from(raw).map_err(|error| InvalidEntry { label, error })
                }
                Err(e) => Err(InvalidEntry {
                    label: "Unknown".to_string(),
                    error: e.into(),
                }),
            })
            .collect()
    }
}
